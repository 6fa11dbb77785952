//! Definition registry with a memoization cache.

use std::collections::HashMap;
use std::thread::{self, ThreadId};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::{Definition, Engine, EngineOptions, Service};
use crate::container::Container;
use crate::error::EngineError;

/// Resolves definitions lazily and builds each entry at most once.
///
/// Locks are released before a factory runs, so factories may resolve their
/// own dependencies through the container. A per-thread resolution stack
/// catches cycles before they overflow the call stack.
pub struct DefinitionEngine {
    options: EngineOptions,
    definitions: RwLock<HashMap<String, Definition>>,
    resolved: RwLock<HashMap<String, Service>>,
    resolving: Mutex<HashMap<ThreadId, Vec<String>>>,
}

impl DefinitionEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self {
            options,
            definitions: RwLock::new(HashMap::new()),
            resolved: RwLock::new(HashMap::new()),
            resolving: Mutex::new(HashMap::new()),
        }
    }

    /// Pushes `name` on the calling thread's stack; the guard pops it, also on unwind.
    fn enter<'a>(&'a self, name: &'a str) -> Result<Resolving<'a>, EngineError> {
        let mut stacks = self.resolving.lock();
        let stack = stacks.entry(thread::current().id()).or_default();
        if stack.iter().any(|entry| entry == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(EngineError::CircularDependency(chain));
        }
        stack.push(name.to_string());
        Ok(Resolving { engine: self, name })
    }

    fn leave(&self, name: &str) {
        let mut stacks = self.resolving.lock();
        let id = thread::current().id();
        if let Some(stack) = stacks.get_mut(&id) {
            if let Some(pos) = stack.iter().rposition(|entry| entry == name) {
                stack.remove(pos);
            }
            if stack.is_empty() {
                stacks.remove(&id);
            }
        }
    }

    fn build(
        &self,
        name: &str,
        definition: Definition,
        container: &Container,
    ) -> Result<Service, EngineError> {
        match definition {
            Definition::Value(value) => Ok(value),
            Definition::Factory(factory) => {
                factory(container).map_err(|source| EngineError::Factory {
                    name: name.to_string(),
                    source,
                })
            }
            Definition::Alias(target) => self.get(&target, container),
            Definition::Autowire { type_name, build } => {
                if !self.options.autowiring {
                    return Err(EngineError::AutowiringDisabled {
                        name: type_name.to_string(),
                    });
                }
                build(container).map_err(|source| EngineError::Factory {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }
}

struct Resolving<'a> {
    engine: &'a DefinitionEngine,
    name: &'a str,
}

impl Drop for Resolving<'_> {
    fn drop(&mut self) {
        self.engine.leave(self.name);
    }
}

impl Default for DefinitionEngine {
    fn default() -> Self {
        Self::new(EngineOptions {
            autowiring: true,
            ..EngineOptions::default()
        })
    }
}

impl Engine for DefinitionEngine {
    fn get(&self, name: &str, container: &Container) -> Result<Service, EngineError> {
        if let Some(service) = self.resolved.read().get(name) {
            return Ok(service.clone());
        }

        let definition = self
            .definitions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                name: name.to_string(),
            })?;

        let guard = self.enter(name)?;
        let built = self.build(name, definition, container);
        drop(guard);
        let service = built?;

        debug!(service = name, "Resolved service");

        // A recursive resolution may have stored the entry meanwhile; keep the first instance.
        let mut resolved = self.resolved.write();
        Ok(resolved
            .entry(name.to_string())
            .or_insert(service)
            .clone())
    }

    fn set(&self, name: &str, definition: Definition) {
        debug!(service = name, kind = definition.kind(), "Registering definition");
        self.definitions.write().insert(name.to_string(), definition);
        self.resolved.write().remove(name);
    }

    fn has(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name) || self.resolved.read().contains_key(name)
    }

    fn is_resolved(&self, name: &str) -> bool {
        self.resolved.read().contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.read().keys().cloned().collect();
        names.sort();
        names
    }

    fn options(&self) -> &EngineOptions {
        &self.options
    }
}
