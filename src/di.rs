//! Autowiring support.
//!
//! A type implementing [`Autowire`] knows how to build itself from the
//! container. It can be registered explicitly with
//! [`Definition::autowire`](crate::engine::Definition::autowire) or built on
//! demand with [`Container::autowired`]; both paths only work while the
//! engine has autowiring enabled.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether::{Autowire, Container, Settings};
//! use tether::framework::Router;
//!
//! #[derive(Autowire)]
//! pub struct HomeController {
//!     settings: Arc<Settings>,
//!     #[inject("router")]
//!     routes: Arc<Router>,
//! }
//!
//! let controller = container.autowired::<HomeController>()?;
//! ```

use crate::container::Container;
use crate::error::ContainerError;

/// Trait for types that can be constructed from a container.
pub trait Autowire: Sized + Send + Sync + 'static {
    fn autowire(container: &Container) -> Result<Self, ContainerError>;
}

// Re-export derive macro
pub use di_macros::Autowire;
