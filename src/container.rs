//! Service-locator facade over an [`Engine`].

use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::defaults;
use crate::di::Autowire;
use crate::engine::{Definition, DefinitionEngine, Engine, Service};
use crate::error::ContainerError;
use crate::settings::Settings;

/// The container handed to the framework.
///
/// Cloning is cheap and every clone shares the same engine. Resolution
/// errors come back as [`ContainerError`]; the engine's not-found signal is
/// translated to [`ContainerError::NotFound`].
#[derive(Clone)]
pub struct Container {
    engine: Arc<dyn Engine>,
}

impl Container {
    pub fn new(engine: impl Engine + 'static) -> Self {
        Self::from_engine(Arc::new(engine))
    }

    pub fn from_engine(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Resolves `name` as a `T`.
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContainerError> {
        self.get_service(name)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Resolves `name` without a type check.
    pub fn get_service(&self, name: &str) -> Result<Service, ContainerError> {
        self.engine.get(name, self).map_err(ContainerError::from)
    }

    /// Registers or overwrites a definition.
    pub fn set(&self, name: impl AsRef<str>, definition: Definition) {
        self.engine.set(name.as_ref(), definition);
    }

    pub fn has(&self, name: &str) -> bool {
        self.engine.has(name)
    }

    /// Does nothing: definitions cannot be purged once registered.
    pub fn remove(&self, name: &str) {
        debug!(service = name, "Ignoring removal; definitions cannot be purged");
    }

    /// Registers the framework's default services.
    pub fn register_defaults(&self, settings: Settings) {
        defaults::register(self, settings);
    }

    /// Resolves `T` through autowiring, registering it under its type name on first use.
    ///
    /// Fails with [`ContainerError::NotFound`] when the type is not registered and
    /// autowiring is disabled.
    pub fn autowired<T: Autowire>(&self) -> Result<Arc<T>, ContainerError> {
        let name = type_name::<T>();
        if !self.has(name) && self.engine.options().autowiring {
            self.set(name, Definition::autowire::<T>());
        }
        self.get::<T>(name)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.engine.is_resolved(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.engine.names()
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Reference that does not keep the container alive.
    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            engine: Arc::downgrade(&self.engine),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(DefinitionEngine::default())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.engine.names())
            .field("options", self.engine.options())
            .finish()
    }
}

/// Weak handle for services that need the container without owning it.
#[derive(Clone)]
pub struct WeakContainer {
    engine: Weak<dyn Engine>,
}

impl WeakContainer {
    pub fn upgrade(&self) -> Option<Container> {
        self.engine.upgrade().map(Container::from_engine)
    }
}

impl fmt::Debug for WeakContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakContainer")
            .field("alive", &(self.engine.strong_count() > 0))
            .finish()
    }
}
