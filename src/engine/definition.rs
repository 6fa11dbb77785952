//! Definitions: the recipes the engine turns into services.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::container::Container;
use crate::di::Autowire;

/// A resolved service instance.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Factory signature shared by every callable definition.
pub type FactoryFn = dyn Fn(&Container) -> anyhow::Result<Service> + Send + Sync;

/// Recipe used to produce a service on first request.
#[derive(Clone)]
pub enum Definition {
    /// A ready-made value, returned as-is.
    Value(Service),
    /// A factory invoked once with the container.
    Factory(Arc<FactoryFn>),
    /// Resolves another entry by name.
    Alias(String),
    /// Built through [`Autowire`]; only resolvable while autowiring is enabled.
    Autowire {
        type_name: &'static str,
        build: Arc<FactoryFn>,
    },
}

impl Definition {
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Definition::Value(Arc::new(value))
    }

    /// Registers an already shared instance without re-wrapping it.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Definition::Value(value)
    }

    /// One-argument factory: receives the container to resolve its own dependencies.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Definition::Factory(Arc::new(move |container| {
            Ok(Arc::new(factory(container)?) as Service)
        }))
    }

    /// Zero-argument factory.
    pub fn lazy<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Definition::Factory(Arc::new(move |_| Ok(Arc::new(factory()) as Service)))
    }

    pub fn alias(target: impl Into<String>) -> Self {
        Definition::Alias(target.into())
    }

    pub fn autowire<T: Autowire>() -> Self {
        Definition::Autowire {
            type_name: type_name::<T>(),
            build: Arc::new(|container| Ok(Arc::new(T::autowire(container)?) as Service)),
        }
    }

    /// Short label used in logs and the CLI.
    pub fn kind(&self) -> &'static str {
        match self {
            Definition::Value(_) => "value",
            Definition::Factory(_) => "factory",
            Definition::Alias(_) => "alias",
            Definition::Autowire { .. } => "autowire",
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Alias(target) => write!(f, "Alias({target})"),
            Definition::Autowire { type_name, .. } => write!(f, "Autowire({type_name})"),
            other => f.write_str(other.kind()),
        }
    }
}

/// Ordered definition set. Later entries win over earlier ones with the same name.
#[derive(Clone, Debug, Default)]
pub struct Definitions {
    entries: Vec<(String, Definition)>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns a JSON object into value definitions, one per key.
    pub fn from_values(values: Map<String, Value>) -> Self {
        values
            .into_iter()
            .map(|(name, value)| (name, Definition::value(value)))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: Definition) {
        self.entries.push((name.into(), definition));
    }

    pub fn define(mut self, name: impl Into<String>, definition: Definition) -> Self {
        self.insert(name, definition);
        self
    }

    pub fn value<T: Any + Send + Sync>(self, name: impl Into<String>, value: T) -> Self {
        self.define(name, Definition::value(value))
    }

    pub fn factory<T, F>(self, name: impl Into<String>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.define(name, Definition::factory(factory))
    }

    pub fn alias(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.define(name, Definition::alias(target))
    }

    pub fn autowire<T: Autowire>(self, name: impl Into<String>) -> Self {
        self.define(name, Definition::autowire::<T>())
    }

    pub fn extend(&mut self, other: Definitions) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.entries
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }
}

impl FromIterator<(String, Definition)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (String, Definition)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Definitions {
    type Item = (String, Definition);
    type IntoIter = std::vec::IntoIter<(String, Definition)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
