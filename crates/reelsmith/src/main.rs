//! Reelsmith CLI binary.
//!
//! This binary provides command-line access to the production pipeline:
//! - Run the full protocol for a planned video slot
//! - Extend the topic ledger (strategist batch or manual add)
//! - Export blueprints and drive the image studio

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        add_topic, export_blueprint, image_command, list_topics, run_protocol,
        unlock_next_phase, Cli, Commands,
    };
    use reelsmith::Settings;

    // Pick up GEMINI_API_KEY from a .env file when present
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let settings = match &cli.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };

    // Execute the requested command
    match cli.command {
        Commands::Run { slot, export } => {
            run_protocol(&settings, slot, export).await?;
        }

        Commands::Unlock => {
            unlock_next_phase(&settings).await?;
        }

        Commands::AddTopic { label } => {
            add_topic(&settings, &label)?;
        }

        Commands::Topics => {
            list_topics(&settings)?;
        }

        Commands::Export { slot, output } => {
            export_blueprint(&settings, slot, output)?;
        }

        Commands::Image {
            prompt,
            edit,
            output,
        } => {
            image_command(&settings, &prompt, edit, &output).await?;
        }
    }

    Ok(())
}
