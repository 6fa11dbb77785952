//! Engine decorator emitting a trace event for every call.

use tracing::trace;

use super::{Definition, Engine, EngineOptions, Service};
use crate::container::Container;
use crate::error::EngineError;

/// Wraps another engine; selected with the `TracedContainer` container class.
pub struct TracedEngine<E> {
    inner: E,
}

impl<E: Engine> TracedEngine<E> {
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: Engine> Engine for TracedEngine<E> {
    fn get(&self, name: &str, container: &Container) -> Result<Service, EngineError> {
        let cached = self.inner.is_resolved(name);
        let result = self.inner.get(name, container);
        match &result {
            Ok(_) => trace!(service = name, cached, "get"),
            Err(err) => trace!(service = name, error = %err, "get failed"),
        }
        result
    }

    fn set(&self, name: &str, definition: Definition) {
        trace!(service = name, kind = definition.kind(), "set");
        self.inner.set(name, definition);
    }

    fn has(&self, name: &str) -> bool {
        let found = self.inner.has(name);
        trace!(service = name, found, "has");
        found
    }

    fn is_resolved(&self, name: &str) -> bool {
        self.inner.is_resolved(name)
    }

    fn names(&self) -> Vec<String> {
        self.inner.names()
    }

    fn options(&self) -> &EngineOptions {
        self.inner.options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::DefinitionEngine;

    #[test]
    fn test_traced_engine_delegates() {
        let container = Container::new(TracedEngine::new(DefinitionEngine::default()));
        container.set("name", Definition::value("tether"));

        assert!(container.has("name"));
        assert!(!container.is_resolved("name"));
        assert_eq!(*container.get::<&'static str>("name").unwrap(), "tether");
        assert!(container.is_resolved("name"));
        assert!(container.get_service("missing").unwrap_err().is_not_found());
    }
}
