//! Shared data model for textcmd command schemas.
//!
//! This crate intentionally does **not** know about handlers or parsing.
//! The types here describe what a command accepts, and are used for:
//! - declaring commands in code (through the builders in `textcmd-argparse`)
//! - loading command schemas from JSON (`AppConfig::from_json`)
//! - overriding the user-facing strings (`StringCatalog`)

mod config;
mod strings;
mod value;

pub use config::{AppConfig, ArgumentConfig, CommandConfig, DEFAULT_SEPARATOR, FlagConfig};
pub use strings::{StringCatalog, render};
pub use value::{Value, ValueType};
