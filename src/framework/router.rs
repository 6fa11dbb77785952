use std::path::{Path, PathBuf};

/// Router placeholder registered as the `router` service.
///
/// Route matching belongs to the framework; the container only decides
/// where the router caches its compiled routes and which base path it
/// prefixes to generated URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Router {
    base_path: String,
    cache_file: Option<PathBuf>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_file(mut self, cache_file: Option<PathBuf>) -> Self {
        self.cache_file = cache_file;
        self
    }

    /// Stores `base_path` without a trailing slash.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        self.base_path = base_path.trim_end_matches('/').to_string();
        self
    }

    pub fn cache_file(&self) -> Option<&Path> {
        self.cache_file.as_deref()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Prefixes `path` with the base path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path.trim_start_matches('/'))
    }
}
