//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, settings resolution,
//! and subcommand handlers.

mod args;
mod commands;
mod enums;
mod settings;

pub use args::{Args, Command, ConfigAction, PlayArgs};
pub use commands::{handle_config_action, probe};
pub use enums::{Mode, Protocol};
pub use settings::PlaySettings;
