//! Builder options with per-field validation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::engine::{Definitions, DefinitionEngine, Engine, EngineOptions, TracedEngine};
use crate::error::ConfigError;

/// Engine implementation behind the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerClass {
    /// Plain [`DefinitionEngine`].
    #[default]
    Container,
    /// [`DefinitionEngine`] wrapped in a [`TracedEngine`].
    Traced,
}

impl ContainerClass {
    pub const ALL: [ContainerClass; 2] = [ContainerClass::Container, ContainerClass::Traced];

    pub fn name(&self) -> &'static str {
        match self {
            ContainerClass::Container => "Container",
            ContainerClass::Traced => "TracedContainer",
        }
    }

    /// Creates the engine this class stands for.
    pub fn instantiate(&self, options: EngineOptions) -> Arc<dyn Engine> {
        let engine = DefinitionEngine::new(options);
        match self {
            ContainerClass::Container => Arc::new(engine),
            ContainerClass::Traced => Arc::new(TracedEngine::new(engine)),
        }
    }
}

impl FromStr for ContainerClass {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name() == name)
            .ok_or_else(|| ConfigError::InvalidContainerClass {
                name: name.to_string(),
                known: Self::ALL
                    .iter()
                    .map(ContainerClass::name)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for ContainerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend caching parsed definition files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheBackend {
    #[default]
    None,
    Memory,
    /// JSON files under the compilation path.
    File,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "none" => Ok(CacheBackend::None),
            "memory" => Ok(CacheBackend::Memory),
            "file" => Ok(CacheBackend::File),
            _ => Err(ConfigError::InvalidOption {
                key: "definition_cache".to_string(),
                expected: "\"none\", \"memory\" or \"file\"",
            }),
        }
    }
}

/// Where extra definitions come from.
#[derive(Debug, Clone)]
pub enum DefinitionSource {
    /// A `.toml` or `.json` file of value definitions.
    File(PathBuf),
    Inline(Definitions),
}

/// Options consumed by [`crate::Builder`].
#[derive(Debug, Clone)]
pub struct Configuration {
    container_class: ContainerClass,
    autowiring: bool,
    proxy_directory: Option<PathBuf>,
    compilation_path: Option<PathBuf>,
    definition_cache: CacheBackend,
    definitions: Vec<DefinitionSource>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            container_class: ContainerClass::default(),
            autowiring: true,
            proxy_directory: None,
            compilation_path: None,
            definition_cache: CacheBackend::default(),
            definitions: Vec::new(),
        }
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from named options, in order.
    ///
    /// Unrecognised keys are ignored.
    pub fn from_options<I, K>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut configuration = Self::default();
        configuration.apply_options(options)?;
        Ok(configuration)
    }

    /// Applies named options through their setters.
    pub fn apply_options<I, K>(&mut self, options: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (key, value) in options {
            self.apply_option(key.as_ref(), value)?;
        }
        Ok(())
    }

    fn apply_option(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        let invalid = |expected| ConfigError::InvalidOption {
            key: key.to_string(),
            expected,
        };

        match key {
            "container_class" => {
                let name = value.as_str().ok_or_else(|| invalid("a string"))?;
                self.set_container_class(name)
            }
            "autowiring" => {
                let enabled = value.as_bool().ok_or_else(|| invalid("a boolean"))?;
                self.set_autowiring(enabled);
                Ok(())
            }
            "proxy_directory" => {
                let path = value.as_str().ok_or_else(|| invalid("a directory path"))?;
                self.set_proxy_directory(path)
            }
            "compilation_path" => {
                let path = value.as_str().ok_or_else(|| invalid("a directory path"))?;
                self.set_compilation_path(path)
            }
            "definition_cache" => {
                let backend = match value {
                    Value::Bool(false) | Value::Null => CacheBackend::None,
                    Value::String(name) => name.parse()?,
                    _ => return Err(invalid("\"none\", \"memory\" or \"file\"")),
                };
                self.set_definition_cache(backend);
                Ok(())
            }
            "definitions" => {
                let Value::Array(items) = value else {
                    return Err(invalid("an array of file paths or objects"));
                };
                let sources = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(path) => Ok(DefinitionSource::File(path.into())),
                        Value::Object(values) => {
                            Ok(DefinitionSource::Inline(Definitions::from_values(values)))
                        }
                        _ => Err(invalid("an array of file paths or objects")),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.set_definitions(sources)
            }
            _ => {
                debug!(option = key, "Ignoring unrecognised container option");
                Ok(())
            }
        }
    }

    pub fn container_class(&self) -> ContainerClass {
        self.container_class
    }

    /// Accepts `Container` or one of its subtypes.
    pub fn set_container_class(&mut self, name: &str) -> Result<(), ConfigError> {
        self.container_class = name.parse()?;
        Ok(())
    }

    pub fn autowiring(&self) -> bool {
        self.autowiring
    }

    pub fn set_autowiring(&mut self, enabled: bool) {
        self.autowiring = enabled;
    }

    pub fn proxy_directory(&self) -> Option<&Path> {
        self.proxy_directory.as_deref()
    }

    /// The directory must exist and be writable.
    pub fn set_proxy_directory(&mut self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        self.proxy_directory = Some(writable_directory(path.into())?);
        Ok(())
    }

    pub fn compilation_path(&self) -> Option<&Path> {
        self.compilation_path.as_deref()
    }

    /// The directory must exist and be writable.
    pub fn set_compilation_path(&mut self, path: impl Into<PathBuf>) -> Result<(), ConfigError> {
        self.compilation_path = Some(writable_directory(path.into())?);
        Ok(())
    }

    pub fn definition_cache(&self) -> CacheBackend {
        self.definition_cache
    }

    pub fn set_definition_cache(&mut self, backend: CacheBackend) {
        self.definition_cache = backend;
    }

    pub fn definitions(&self) -> &[DefinitionSource] {
        &self.definitions
    }

    /// Replaces the definition sources; every file source is checked first.
    pub fn set_definitions(&mut self, sources: Vec<DefinitionSource>) -> Result<(), ConfigError> {
        sources.iter().try_for_each(validate_source)?;
        self.definitions = sources;
        Ok(())
    }

    pub fn add_definitions(&mut self, source: DefinitionSource) -> Result<(), ConfigError> {
        validate_source(&source)?;
        self.definitions.push(source);
        Ok(())
    }
}

fn writable_directory(path: PathBuf) -> Result<PathBuf, ConfigError> {
    let metadata = match fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(_) => return Err(ConfigError::DirectoryNotFound(path)),
    };
    if !metadata.is_dir() {
        return Err(ConfigError::NotADirectory(path));
    }
    // Permission bits ignore ownership and ACLs; creating a file is the real test.
    if tempfile::tempfile_in(&path).is_err() {
        return Err(ConfigError::DirectoryNotWritable(path));
    }
    Ok(path)
}

fn validate_source(source: &DefinitionSource) -> Result<(), ConfigError> {
    let DefinitionSource::File(path) = source else {
        return Ok(());
    };
    let invalid = |reason: &str| ConfigError::InvalidDefinitionSource {
        source_ref: path.display().to_string(),
        reason: reason.to_string(),
    };

    if !path.is_file() {
        return Err(invalid("file does not exist"));
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") | Some("json") => Ok(()),
        _ => Err(invalid("unsupported format, expected .toml or .json")),
    }
}
