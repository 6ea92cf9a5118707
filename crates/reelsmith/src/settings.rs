//! Application settings.
//!
//! Settings load with a precedence chain: bundled defaults, then
//! `~/.config/reelsmith/reelsmith.toml`, then `./reelsmith.toml` in the
//! working directory. The Gemini API key is deliberately not part of the
//! settings document; it comes from the `GEMINI_API_KEY` environment
//! variable (or a `.env` file) at the binary edge.

use std::path::PathBuf;

use config::{Config, File, FileFormat};
use reelsmith_error::{ConfigError, ReelsmithResult};
use reelsmith_pipeline::{AgentConfig, AgentConfigBuilder};
use serde::{Deserialize, Serialize};

/// Model selection and sampling settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelSettings {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub name: String,
    /// Sampling temperature for creative stages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gemini-2.5-flash".to_string(),
            temperature: Some(0.7),
        }
    }
}

/// Funnel URLs the marketer and logic validator work with.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MarketingSettings {
    /// Destination URL for early-funnel slots
    pub lead_magnet_url: String,
    /// Destination URL for later-funnel slots
    pub core_offer_url: String,
    /// Number of slots (from slot 1) that point at the lead magnet
    pub lead_magnet_slots: u32,
}

impl Default for MarketingSettings {
    fn default() -> Self {
        let config = AgentConfig::default();
        Self {
            lead_magnet_url: config.lead_magnet_url,
            core_offer_url: config.core_offer_url,
            lead_magnet_slots: config.lead_magnet_slots,
        }
    }
}

/// Top-level Reelsmith settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Directory for the ledger and saved blueprints
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Model selection
    #[serde(default)]
    pub model: ModelSettings,
    /// Funnel configuration
    #[serde(default)]
    pub marketing: MarketingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            model: ModelSettings::default(),
            marketing: MarketingSettings::default(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("./reelsmith-state")
}

/// Defaults bundled into the binary, the bottom of the precedence chain.
const DEFAULT_SETTINGS: &str = include_str!("../../../reelsmith.toml");

impl Settings {
    /// Load settings with precedence: current dir > home dir > bundled
    /// defaults. User files are optional.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be parsed.
    #[tracing::instrument]
    pub fn load() -> ReelsmithResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_settings = home.join(".config/reelsmith/reelsmith.toml");
            builder = builder.add_source(File::from(home_settings).required(false));
        }

        builder = builder.add_source(File::with_name("reelsmith").required(false));

        builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {e}")))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")).into())
    }

    /// Load settings from one explicit file, without the precedence chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ReelsmithResult<Self> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {e}")).into())
    }

    /// Path of the ledger document inside the state directory.
    pub fn ledger_path(&self) -> PathBuf {
        self.state_dir.join("ledger.json")
    }

    /// Directory for saved blueprint documents.
    pub fn blueprint_dir(&self) -> PathBuf {
        self.state_dir.join("blueprints")
    }

    /// Translate settings into the per-call agent configuration.
    pub fn agent_config(&self) -> AgentConfig {
        AgentConfigBuilder::default()
            .model(Some(self.model.name.clone()))
            .temperature(self.model.temperature)
            .lead_magnet_url(self.marketing.lead_magnet_url.clone())
            .core_offer_url(self.marketing.core_offer_url.clone())
            .lead_magnet_slots(self.marketing.lead_magnet_slots)
            .build()
            .unwrap_or_default()
    }
}
