//! Blueprint export command handler.

use std::path::PathBuf;

use reelsmith_error::{ReelsmithResult, StorageError, StorageErrorKind};
use reelsmith_pipeline::{render_blueprint, Blueprint};

use super::run::write_text;
use reelsmith::Settings;

/// Render a previously saved blueprint as flat text.
pub fn export_blueprint(
    settings: &Settings,
    slot: u32,
    output: Option<PathBuf>,
) -> ReelsmithResult<()> {
    let path = settings.blueprint_dir().join(format!("video-{slot}.json"));
    let json = std::fs::read_to_string(&path).map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {} (run `reelsmith run {slot}` first)",
            path.display(),
            e
        )))
    })?;
    let blueprint: Blueprint = serde_json::from_str(&json).map_err(|e| {
        StorageError::new(StorageErrorKind::Corrupt(format!("{}: {}", path.display(), e)))
    })?;

    let document = render_blueprint(&blueprint);
    match output {
        Some(output_path) => {
            write_text(&output_path, &document)?;
            println!("Export written to {}", output_path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}
