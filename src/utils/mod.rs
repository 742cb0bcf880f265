//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Process execution with error handling
//! - `shell` - Shell quoting for command display

pub mod command;
pub mod shell;
