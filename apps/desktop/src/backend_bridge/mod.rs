//! Worker thread that performs HTTP calls on behalf of the terminal UI.

pub mod commands;
pub mod runtime;
