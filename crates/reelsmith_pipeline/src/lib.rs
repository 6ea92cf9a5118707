//! Production-blueprint pipeline for short-form video planning.
//!
//! This crate orchestrates a fixed sequence of agent calls against a
//! generative AI driver to assemble a per-video "production blueprint":
//! research, script, visual plan, and marketing plan. The orchestrator
//! threads each stage's output into the next, merges results incrementally
//! into the shared blueprint, and records a structured agent log.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelsmith_pipeline::{AgentConfig, LedgerStore, Studio};
//! use reelsmith_models::GeminiClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = GeminiClient::new("api-key".to_string());
//! let store = LedgerStore::new("./state/ledger.json");
//! let studio = Studio::new(driver, AgentConfig::default(), store)?;
//!
//! studio.add_topic("Tutorial / Five-minute sourdough starter")?;
//! let outcome = studio.run_protocol(1).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod agents;
mod blueprint;
mod export;
mod extraction;
mod ledger;
mod log;
mod orchestrator;
mod studio;

pub use agents::{
    director, logic_validator, marketer, researcher, strategist, visual_designer, AgentConfig,
    AgentConfigBuilder, Validation, RESEARCH_FALLBACK_TITLE,
};
pub use blueprint::{
    Blueprint, MarketingData, Scene, ScriptContent, SeoData, ValidationStatus, VisualPlan,
};
pub use export::render_blueprint;
pub use extraction::{extract_json, parse_json};
pub use ledger::{LedgerStore, ProductionLedger, PHASE_SIZE};
pub use log::{AgentLog, LogEntry, LogLevel};
pub use orchestrator::{RunOutcome, Studio};
pub use studio::{edit_image, generate_image, GeneratedImage};
