//! console-mosaic library crate.
//!
//! Plays a video in the terminal by sampling frames down to a small grid and
//! writing each frame as an inline image or as background-coloured text cells.

pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod event_loop;
pub mod input;
pub mod mosaic;
pub mod render;
pub mod scheduler;
pub mod source;
