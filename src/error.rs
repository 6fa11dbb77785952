//! Error types for configuration, the engine and the container facade.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors, raised by setters as soon as a value is rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid container class '{name}': expected Container or a subtype of it ({known})")]
    InvalidContainerClass { name: String, known: String },

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Directory is not writable: {}", .0.display())]
    DirectoryNotWritable(PathBuf),

    #[error("Invalid definition source '{source_ref}': {reason}")]
    InvalidDefinitionSource { source_ref: String, reason: String },

    #[error("Invalid option '{key}': expected {expected}")]
    InvalidOption { key: String, expected: &'static str },

    #[error("Invalid setting '{key}': expected {expected}")]
    InvalidSetting { key: String, expected: &'static str },

    #[error("Definition cache backend 'file' requires a compilation path")]
    MissingCompilationPath,

    #[error("Failed to load configuration: {0}")]
    Load(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Errors signalled by the DI engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No entry or class found for '{name}'")]
    NotFound { name: String },

    #[error("Circular dependency detected while resolving '{}'", .0.join(" -> "))]
    CircularDependency(Vec<String>),

    #[error("Factory for '{name}' failed: {source}")]
    Factory {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Cannot autowire '{name}': autowiring is disabled")]
    AutowiringDisabled { name: String },

    #[error("Definition cache error: {0}")]
    Cache(String),
}

/// Errors surfaced to the framework through [`crate::Container`].
#[derive(Error, Debug)]
pub enum ContainerError {
    /// No entry with this name; carries the engine's message unchanged.
    #[error("{message}")]
    NotFound { name: String, message: String },

    #[error("Service '{name}' is not a {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("Container has been dropped")]
    Detached,

    #[error(transparent)]
    Engine(EngineError),
}

impl From<EngineError> for ContainerError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound { ref name } => ContainerError::NotFound {
                name: name.clone(),
                message: err.to_string(),
            },
            other => ContainerError::Engine(other),
        }
    }
}

impl ContainerError {
    /// Returns true for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContainerError::NotFound { .. })
    }
}

/// Crate-level error returned by the builder.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
}

impl From<EngineError> for Error {
    fn from(err: EngineError) -> Self {
        Error::Container(err.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
