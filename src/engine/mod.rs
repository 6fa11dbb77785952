//! The DI engine wrapped by [`crate::Container`].
//!
//! The container never resolves anything itself: every `get`/`set`/`has`
//! goes through an [`Engine`]. [`DefinitionEngine`] is the bundled
//! implementation (definition registry plus memoization cache);
//! [`TracedEngine`] decorates any engine with trace-level events.

mod cache;
mod definition;
mod registry;
mod traced;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub use cache::{DefinitionCache, FileCache, MemoryCache};
pub use definition::{Definition, Definitions, FactoryFn, Service};
pub use registry::DefinitionEngine;
pub use traced::TracedEngine;

use crate::container::Container;
use crate::error::EngineError;

/// Operations the container delegates to.
pub trait Engine: Send + Sync {
    /// Resolves `name`, building and memoizing it on first request.
    fn get(&self, name: &str, container: &Container) -> Result<Service, EngineError>;

    /// Registers or overwrites a definition.
    fn set(&self, name: &str, definition: Definition);

    fn has(&self, name: &str) -> bool;

    /// Whether `name` has already been built.
    fn is_resolved(&self, name: &str) -> bool;

    /// Names of all registered definitions, sorted.
    fn names(&self) -> Vec<String>;

    fn options(&self) -> &EngineOptions;
}

/// Engine-level options applied by the builder.
#[derive(Clone, Default)]
pub struct EngineOptions {
    pub autowiring: bool,
    pub proxy_directory: Option<PathBuf>,
    pub definition_cache: Option<Arc<dyn DefinitionCache>>,
}

impl fmt::Debug for EngineOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineOptions")
            .field("autowiring", &self.autowiring)
            .field("proxy_directory", &self.proxy_directory)
            .field("definition_cache", &self.definition_cache.is_some())
            .finish()
    }
}
