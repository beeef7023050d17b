//! kielo-content: the file-backed blog collection behind the Kielo website
//!
//! Documents are MDX files with a front-matter header. The crate lists them
//! newest first and resolves single documents by identifier; rendering the
//! body is left to the presentation layer.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{Collection, ContentDocument, NotFound, Summary};

/// A site checkout and its configuration
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the content documents
    pub collection_dir: PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let collection_dir = base_dir.join(&config.collection_dir);
        Self {
            config,
            base_dir,
            collection_dir,
        }
    }

    /// The blog collection of this site
    pub fn collection(&self) -> Collection {
        Collection::from_site(self)
    }
}
