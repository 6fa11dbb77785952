//! Configuration with layered resolution using figment.
//!
//! User settings (the dictionary handed to [`crate::Builder::build`]) are
//! resolved in this order, highest priority last:
//! 1. User config: `~/.config/tether/config.toml` (XDG) or platform config dir
//! 2. Project config: `tether.toml`, or an explicit `.toml`/`.json` path
//! 3. Environment variables: `TETHER_*`, `__` separating nested keys
//!
//! # Example
//!
//! ```toml
//! [settings]
//! displayErrorDetails = true
//! routerCacheFile = "/var/cache/app/routes.cache"
//!
//! [di]
//! autowiring = false
//! compilation_path = "/var/cache/app"
//! definition_cache = "file"
//! definitions = ["config/services.toml"]
//!
//! # any other key becomes a plain value definition
//! mailer_host = "smtp.local"
//! ```
//!
//! `TETHER_settings__outputBuffering=prepend` overrides the same key from
//! the environment; key case is preserved.

mod configuration;

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use serde_json::{Map, Value};

pub use configuration::{CacheBackend, Configuration, ContainerClass, DefinitionSource};

use crate::error::ConfigError;

/// Project config file looked up in the working directory.
pub const PROJECT_CONFIG: &str = "tether.toml";

/// Load the user settings dictionary (user → project → env).
pub fn load_settings(path: Option<&Path>) -> Result<Map<String, Value>, ConfigError> {
    let project = path.unwrap_or_else(|| Path::new(PROJECT_CONFIG));

    // Layer 1: User config (lowest priority)
    let figment = Figment::new().merge(Toml::file(user_config_path()));
    // Layer 2: Project config
    let figment = merge_file(figment, project);
    // Layer 3: Environment variables (highest priority)
    figment
        .merge(Env::prefixed("TETHER_").split("__").lowercase(false))
        .extract()
        .map_err(ConfigError::from)
}

/// Reads a definition file into value definitions.
pub fn read_definition_file(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    merge_file(Figment::new(), path)
        .extract()
        .map_err(ConfigError::from)
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}

/// User config path: ~/.config/tether/config.toml (XDG) or platform config dir.
fn user_config_path() -> PathBuf {
    // Prefer XDG config location (~/.config) on all platforms
    if let Some(home) = dirs::home_dir() {
        let xdg_path = home.join(".config").join("tether").join("config.toml");
        if xdg_path.exists() {
            return xdg_path;
        }
    }
    // Fall back to platform-specific config dir
    dirs::config_dir()
        .map(|p| p.join("tether").join("config.toml"))
        .unwrap_or_default()
}
