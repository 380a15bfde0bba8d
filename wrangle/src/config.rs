//! Configuration management for wrangle

use crate::cli::Cli;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wrangle_adapter_http::HttpSourceConfig;
use wrangle_core::errors::CoreError;
use wrangle_core::sink::TreeLayout;
use wrangle_core::types::Iri;
use wrangle_core::vocab;

/// Configuration for the wrangle CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WrangleConfig {
    /// Collection root the document tree is written under
    pub collection_dir: PathBuf,
    /// Directory under the collection root for metadata documents
    pub metadata_dir: String,
    /// File extension of written documents
    pub document_extension: String,
    /// Type identifying activities in a listing graph
    pub activity_type: String,
    /// Fetch timeout in seconds
    pub timeout: u64,
    /// Accept header for graph fetches
    pub accept: String,
}

impl Default for WrangleConfig {
    fn default() -> Self {
        let layout = TreeLayout::default();
        let http = HttpSourceConfig::default();
        Self {
            collection_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("annalist_site/c/CALMA_data"),
            metadata_dir: layout.metadata_dir,
            document_extension: layout.extension,
            activity_type: vocab::PROV_ACTIVITY.to_string(),
            timeout: http.timeout_secs,
            accept: http.accept,
        }
    }
}

impl WrangleConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: &Option<PathBuf>) -> Result<Self, CoreError> {
        let mut figment = Figment::new();

        let default_config_paths = ["wrangle.yaml", "wrangle.yml", ".wrangle.yaml", ".wrangle.yml"];
        for path in &default_config_paths {
            if Path::new(path).exists() {
                figment = figment.merge(Yaml::file(path));
                break;
            }
        }

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Yaml::file(path));
            } else {
                return Err(CoreError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }

        // Environment variables prefixed with WRANGLE_
        figment = figment.merge(Env::prefixed("WRANGLE_"));

        figment
            .extract()
            .map_err(|e| CoreError::Configuration(format!("Failed to parse configuration: {}", e)))
    }

    /// Apply CLI argument overrides to the configuration
    pub fn with_overrides(mut self, args: &Cli) -> Self {
        if let Some(ref collection) = args.collection {
            self.collection_dir = collection.clone();
        }
        self
    }

    pub fn layout(&self) -> TreeLayout {
        TreeLayout {
            metadata_dir: self.metadata_dir.clone(),
            extension: self.document_extension.clone(),
        }
    }

    pub fn source_config(&self) -> HttpSourceConfig {
        HttpSourceConfig::default()
            .with_timeout(self.timeout)
            .with_accept(self.accept.clone())
    }

    pub fn activity_type(&self) -> Iri {
        Iri::new(self.activity_type.clone())
    }
}
