//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reelsmith - AI production studio for short-form video blueprints
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(about = "Plan, script, and package short-form videos with a team of AI agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use an explicit settings file instead of the default lookup chain
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full production protocol for one video slot
    Run {
        /// Slot number from the topic ledger
        slot: u32,

        /// Also write the flat-text blueprint to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Plan the next phase: the strategist adds five topics to the ledger
    Unlock,

    /// Append one topic to the ledger as "<type> / <title>"
    AddTopic {
        /// Topic label, e.g. "Tutorial / Five-minute sourdough starter"
        label: String,
    },

    /// Show the topic ledger and completion status
    Topics,

    /// Render a saved blueprint as a flat text document
    Export {
        /// Slot number of the saved blueprint
        slot: u32,

        /// Output path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate or edit an image with the studio model
    Image {
        /// Image prompt (or edit instruction with --edit)
        prompt: String,

        /// Existing image to edit instead of generating from scratch
        #[arg(long)]
        edit: Option<PathBuf>,

        /// Output path for the image bytes
        #[arg(long, default_value = "reelsmith-image.png")]
        output: PathBuf,
    },
}
