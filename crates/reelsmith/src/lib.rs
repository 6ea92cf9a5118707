//! Reelsmith - AI production studio for short-form video blueprints.
//!
//! Reelsmith orchestrates a fixed sequence of specialised agents against
//! the Gemini API to turn a planned topic into a complete production
//! blueprint: SEO research, a scene-by-scene script, a visual plan, and a
//! validated marketing funnel step. A persistent topic ledger tracks the
//! production schedule in phases of five videos.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reelsmith::{AgentConfig, GeminiClient, LedgerStore, Studio};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let driver = GeminiClient::new(std::env::var("GEMINI_API_KEY")?);
//!     let store = LedgerStore::new("./reelsmith-state/ledger.json");
//!     let studio = Studio::new(driver, AgentConfig::default(), store)?;
//!
//!     let slot = studio.add_topic("Tutorial / Five-minute sourdough starter")?;
//!     let outcome = studio.run_protocol(slot).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Reelsmith is organized as a workspace with focused crates:
//!
//! - `reelsmith_core` - Request/response envelope types
//! - `reelsmith_interface` - The `ReelsmithDriver` trait
//! - `reelsmith_error` - Error types
//! - `reelsmith_models` - Gemini driver with transient-failure retry
//! - `reelsmith_pipeline` - Agents, orchestrator, ledger, and export
//!
//! This crate (`reelsmith`) re-exports everything and carries the CLI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;

pub use settings::{MarketingSettings, ModelSettings, Settings};

pub use reelsmith_core::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, Input, Message, Output, Role,
};
pub use reelsmith_error::{
    ConfigError, ExtractionError, GeminiError, GeminiErrorKind, PipelineError, PipelineErrorKind,
    ReelsmithError, ReelsmithErrorKind, ReelsmithResult, StorageError, StorageErrorKind,
    TransientError,
};
pub use reelsmith_interface::{ModelMetadata, ReelsmithDriver};
pub use reelsmith_models::{retry_transient, GeminiClient, INITIAL_BACKOFF_MS, MAX_RETRIES};
pub use reelsmith_pipeline::{
    director, edit_image, extract_json, generate_image, logic_validator, marketer, parse_json,
    render_blueprint, researcher, strategist, visual_designer, AgentConfig, AgentConfigBuilder,
    AgentLog, Blueprint, GeneratedImage, LedgerStore, LogEntry, LogLevel, MarketingData,
    ProductionLedger, RunOutcome, Scene, ScriptContent, SeoData, Studio, Validation,
    ValidationStatus, VisualPlan, PHASE_SIZE,
};
