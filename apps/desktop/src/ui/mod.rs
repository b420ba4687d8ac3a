//! Terminal presentation: text rendering and the interactive session loop.

pub mod render;
pub mod terminal;
