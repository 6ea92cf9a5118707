//! Production run and phase-unlock command handlers.

use std::path::{Path, PathBuf};

use reelsmith_error::{
    GeminiError, GeminiErrorKind, ReelsmithResult, StorageError, StorageErrorKind,
};
use reelsmith_models::GeminiClient;
use reelsmith_pipeline::{render_blueprint, Blueprint, LedgerStore, RunOutcome, Studio};

use reelsmith::Settings;

/// Build a studio over the live Gemini driver.
///
/// # Errors
///
/// Returns an error when `GEMINI_API_KEY` is unset or the ledger cannot be
/// loaded.
pub fn build_studio(settings: &Settings) -> ReelsmithResult<Studio<GeminiClient>> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| GeminiError::new(GeminiErrorKind::MissingApiKey))?;
    let driver = GeminiClient::with_default_model(api_key, &settings.model.name);
    let store = LedgerStore::new(settings.ledger_path());
    Studio::new(driver, settings.agent_config(), store)
}

/// Run the full protocol for one slot, print the agent log, and save the
/// blueprint document.
pub async fn run_protocol(
    settings: &Settings,
    slot: u32,
    export: Option<PathBuf>,
) -> ReelsmithResult<()> {
    let studio = build_studio(settings)?;
    let outcome = studio.run_protocol(slot).await?;

    for entry in studio.log().entries() {
        println!("{entry}");
    }

    match outcome {
        RunOutcome::Completed => {
            let blueprint = studio.blueprint();
            let path = save_blueprint(settings, &blueprint)?;
            println!("Blueprint saved to {}", path.display());

            if let Some(export_path) = export {
                write_text(&export_path, &render_blueprint(&blueprint))?;
                println!("Export written to {}", export_path.display());
            }
            if studio.can_unlock() {
                println!("Phase complete. Run `reelsmith unlock` to plan the next five topics.");
            }
        }
        RunOutcome::Halted => {
            // Partial blueprint is still worth keeping for inspection
            let blueprint = studio.blueprint();
            let path = save_blueprint(settings, &blueprint)?;
            println!("Run halted; partial blueprint saved to {}", path.display());
        }
        RunOutcome::Busy => println!("Another run is already in progress."),
    }
    Ok(())
}

/// Run the strategist and extend the ledger by one phase.
pub async fn unlock_next_phase(settings: &Settings) -> ReelsmithResult<()> {
    let studio = build_studio(settings)?;
    let outcome = studio.unlock_next_phase().await?;

    for entry in studio.log().entries() {
        println!("{entry}");
    }

    if outcome == RunOutcome::Completed {
        let ledger = studio.ledger();
        let start = ledger.last_slot().saturating_sub(reelsmith_pipeline::PHASE_SIZE - 1);
        for slot in start..=ledger.last_slot() {
            if let Some(label) = ledger.label(slot) {
                println!("  {slot}. {label}");
            }
        }
    }
    Ok(())
}

/// Serialize the blueprint into the state directory.
fn save_blueprint(settings: &Settings, blueprint: &Blueprint) -> ReelsmithResult<PathBuf> {
    let dir = settings.blueprint_dir();
    std::fs::create_dir_all(&dir).map_err(|e| {
        StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "{}: {}",
            dir.display(),
            e
        )))
    })?;

    let path = dir.join(format!("video-{}.json", blueprint.video_number));
    let json = serde_json::to_string_pretty(blueprint).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "serialize blueprint: {e}"
        )))
    })?;
    write_text(&path, &json)?;
    Ok(path)
}

pub(crate) fn write_text(path: &Path, contents: &str) -> ReelsmithResult<()> {
    std::fs::write(path, contents).map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
        .into()
    })
}
