//! Command-line interface for kobj.

mod commands;

pub use commands::{is_verbose, run};
