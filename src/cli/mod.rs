//! Command-line surface: one-shot conversions plus the interactive popup.

mod commands;
mod output;

pub use commands::{Cli, Commands, run};
