//! Tether - service container adapter for a web micro-framework
//!
//! Wires a DI engine into the framework's service-locator conventions:
//! merges settings, registers the framework's default services as lazy
//! singletons and translates the engine's not-found error.
//!
//! ```ignore
//! use serde_json::json;
//! use tether::{Builder, Definitions};
//!
//! let settings = json!({"settings": {"displayErrorDetails": true}});
//! let container = Builder::build(
//!     settings.as_object().cloned().unwrap_or_default(),
//!     Definitions::new().value("foo", "bar"),
//! )?;
//! let router = container.get::<tether::framework::Router>("router")?;
//! ```

// Lets `#[derive(Autowire)]` output (which names `::tether`) compile inside this crate.
extern crate self as tether;

pub mod builder;
pub mod cli;
pub mod config;
pub mod container;
pub mod defaults;
pub mod di;
pub mod engine;
pub mod error;
pub mod framework;
pub mod settings;

pub use builder::Builder;
pub use config::{CacheBackend, Configuration, ContainerClass, DefinitionSource};
pub use container::{Container, WeakContainer};
pub use di::Autowire;
pub use engine::{Definition, Definitions, Engine, Service};
pub use error::{ConfigError, ContainerError, EngineError, Error};
pub use settings::Settings;
