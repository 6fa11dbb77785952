//! Resolves route callables named by string.

use crate::container::{Container, WeakContainer};
use crate::engine::Service;
use crate::error::ContainerError;

/// A resolved `service` or `service:method` target.
#[derive(Debug, Clone)]
pub struct ResolvedCallable {
    pub service: Service,
    pub method: Option<String>,
}

/// Turns `"service"` or `"service:method"` strings into container services.
///
/// Holds a weak reference: the resolver is itself a service of the
/// container it resolves from.
#[derive(Debug, Clone)]
pub struct CallableResolver {
    container: WeakContainer,
}

impl CallableResolver {
    pub fn new(container: &Container) -> Self {
        Self {
            container: container.downgrade(),
        }
    }

    pub fn resolve(&self, target: &str) -> Result<ResolvedCallable, ContainerError> {
        let (id, method) = split_target(target);
        let container = self.container.upgrade().ok_or(ContainerError::Detached)?;
        let service = container.get_service(id)?;

        Ok(ResolvedCallable {
            service,
            method: method.map(str::to_string),
        })
    }
}

/// Splits `service:method`; anything without a valid method name is a plain id.
fn split_target(target: &str) -> (&str, Option<&str>) {
    match target.split_once(':') {
        Some((id, method)) if !id.is_empty() && is_identifier(method) => (id, Some(method)),
        _ => (target, None),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
