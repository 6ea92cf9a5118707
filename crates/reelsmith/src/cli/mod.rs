//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! reelsmith binary.

mod commands;
mod export;
mod image;
mod run;
mod topics;

pub use commands::{Cli, Commands};
pub use export::export_blueprint;
pub use image::image_command;
pub use run::{run_protocol, unlock_next_phase};
pub use topics::{add_topic, list_topics};
