//! Builds a ready [`Container`] from user settings and definitions.
//!
//! Precedence, lowest to highest:
//!
//! ```text
//! built-in settings < default services < definition sources < user settings < explicit definitions
//! ```

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::{read_definition_file, CacheBackend, Configuration, DefinitionSource};
use crate::container::Container;
use crate::engine::{
    Definition, DefinitionCache, Definitions, EngineOptions, FileCache, MemoryCache,
};
use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Reserved key holding the framework settings.
pub const SETTINGS_KEY: &str = "settings";

/// Reserved key holding engine options (see [`Configuration::from_options`]).
pub const ENGINE_KEY: &str = "di";

/// Container factory.
#[derive(Default)]
pub struct Builder {
    configuration: Configuration,
    cache: Option<Arc<dyn DefinitionCache>>,
}

impl Builder {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            cache: None,
        }
    }

    /// Uses `cache` instead of the backend named by the configuration.
    pub fn with_definition_cache(mut self, cache: Arc<dyn DefinitionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Builds a container with the default configuration.
    pub fn build(settings: Map<String, Value>, definitions: Definitions) -> Result<Container> {
        Builder::default().build_with(settings, definitions)
    }

    /// Builds a container; options under the `di` key are layered over this
    /// builder's configuration.
    pub fn build_with(
        self,
        mut settings: Map<String, Value>,
        definitions: Definitions,
    ) -> Result<Container> {
        let framework_settings = take_object(&mut settings, SETTINGS_KEY)?;

        let mut configuration = self.configuration;
        configuration.apply_options(take_object(&mut settings, ENGINE_KEY)?)?;

        let definition_cache = match self.cache {
            Some(cache) => Some(cache),
            None => open_cache(&configuration)?,
        };
        let options = EngineOptions {
            autowiring: configuration.autowiring(),
            proxy_directory: configuration.proxy_directory().map(Path::to_path_buf),
            definition_cache,
        };
        info!(
            "Building {} (autowiring: {}, cache: {:?})",
            configuration.container_class(),
            options.autowiring,
            configuration.definition_cache()
        );
        let engine = configuration.container_class().instantiate(options);
        let container = Container::from_engine(engine);

        container.register_defaults(Settings::merged(framework_settings)?);

        for source in configuration.definitions() {
            load_source(&container, source)?;
        }

        for (name, value) in settings {
            container.set(name, Definition::value(value));
        }

        let explicit = definitions.len();
        for (name, definition) in definitions {
            container.set(name, definition);
        }

        info!(
            "Container ready with {} definitions ({} explicit)",
            container.names().len(),
            explicit
        );
        Ok(container)
    }
}

/// Removes `key` from `settings`; it must be an object when present.
fn take_object(
    settings: &mut Map<String, Value>,
    key: &str,
) -> Result<Map<String, Value>, ConfigError> {
    match settings.remove(key) {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ConfigError::InvalidOption {
            key: key.to_string(),
            expected: "an object",
        }),
    }
}

fn open_cache(
    configuration: &Configuration,
) -> Result<Option<Arc<dyn DefinitionCache>>, ConfigError> {
    match configuration.definition_cache() {
        CacheBackend::None => Ok(None),
        CacheBackend::Memory => Ok(Some(Arc::new(MemoryCache::new()))),
        CacheBackend::File => {
            let directory = configuration
                .compilation_path()
                .ok_or(ConfigError::MissingCompilationPath)?;
            Ok(Some(Arc::new(FileCache::new(directory))))
        }
    }
}

fn load_source(container: &Container, source: &DefinitionSource) -> Result<()> {
    match source {
        DefinitionSource::Inline(definitions) => {
            for (name, definition) in definitions.iter() {
                container.set(name, definition.clone());
            }
        }
        DefinitionSource::File(path) => {
            let values = match container.engine().options().definition_cache.clone() {
                Some(cache) => {
                    let key = format!("definitions:{}", path.display());
                    match cache.fetch(&key)? {
                        Some(values) => {
                            debug!(path = %path.display(), "Definition file served from cache");
                            values
                        }
                        None => {
                            let values = read_definition_file(path)?;
                            cache.save(&key, &values)?;
                            values
                        }
                    }
                }
                None => read_definition_file(path)?,
            };
            debug!(path = %path.display(), count = values.len(), "Loaded definition file");
            for (name, value) in values {
                container.set(name, Definition::value(value));
            }
        }
    }
    Ok(())
}
