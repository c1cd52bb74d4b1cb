// WHY: On-disk description of a recognizer so the CLI and callers share one format
// JSON keeps grounding maps editable by hand and produced by other tools

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::candidates::DEFAULT_WINDOW;
use crate::trie::GroundingMap;

fn default_window() -> usize {
    DEFAULT_WINDOW
}

/// Shortform, search parameters and grounding map for one recognizer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RecognizerConfig {
    /// Shortform whose defining patterns are recognized
    pub shortform: String,
    /// Characters of context scanned backward from each defining pattern
    #[serde(default = "default_window")]
    pub window: usize,
    /// Tokens that end candidate extraction, e.g. stopwords or punctuation
    #[serde(default)]
    pub exclude: BTreeSet<String>,
    /// Longform text to grounding identifier
    pub grounding_map: GroundingMap,
}

impl RecognizerConfig {
    pub fn new(shortform: impl Into<String>, grounding_map: GroundingMap) -> Self {
        Self {
            shortform: shortform.into(),
            window: DEFAULT_WINDOW,
            exclude: BTreeSet::new(),
            grounding_map,
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Invalid recognizer config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading recognizer config from {}", path.display());
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read config {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Cannot load config {}", path.display()))?;

        info!(
            shortform = %config.shortform,
            longforms = config.grounding_map.len(),
            "Loaded recognizer config"
        );
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, content)
            .await
            .with_context(|| format!("Cannot write config {}", path.display()))?;
        Ok(())
    }

    /// Reject configs that can never recognize anything
    pub fn validate(&self) -> Result<()> {
        if self.shortform.trim().is_empty() {
            anyhow::bail!("Shortform must not be empty");
        }
        if self.window == 0 {
            anyhow::bail!("Window must be at least one character");
        }
        Ok(())
    }
}
