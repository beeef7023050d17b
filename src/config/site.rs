//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while reading `_config.yml`
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in config {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Document extension must not be empty")]
    EmptyExtension,
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Collection
    /// Directory holding the content documents, relative to the site root
    pub collection_dir: String,
    /// File extension (without the dot) that marks a content document
    pub extension: String,

    // URL
    /// Public path under which documents are linked (`/blog/<identifier>`)
    pub route_prefix: String,

    // Writing
    pub new_post_name: String,
    pub author: String,
    #[serde(default)]
    pub default_tags: Vec<String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            collection_dir: "public/blogs".to_string(),
            extension: "mdx".to_string(),

            route_prefix: "/blog".to_string(),

            new_post_name: ":year-:month-:day-:title".to_string(),
            author: "Kielo Finnish".to_string(),
            default_tags: Vec::new(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.normalize()?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Strip a leading dot from the extension and the trailing slash from the route prefix
    fn normalize(&mut self) -> Result<(), ConfigError> {
        self.extension = self.extension.trim().trim_start_matches('.').to_string();
        if self.extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }

        let prefix = self.route_prefix.trim().trim_end_matches('/');
        self.route_prefix = if prefix.starts_with('/') || prefix.is_empty() {
            prefix.to_string()
        } else {
            format!("/{}", prefix)
        };
        Ok(())
    }

    /// Public link for a document identifier
    pub fn href_for(&self, identifier: &str) -> String {
        format!("{}/{}", self.route_prefix, identifier)
    }
}
