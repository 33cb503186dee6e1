//! Tokenizing, binding, coercion and validation for single-line commands.
//!
//! This crate holds the schema-aware half of textcmd:
//! - `tokens` strips the invocation prefix and splits the rest of a line
//! - `params` declares arguments and flags and checks them eagerly
//! - `bind` maps tokens onto a `Params` signature, coercing each value
//! - `validate` runs the declared predicates over the bound values
//!
//! Handlers and dispatch live in the `textcmd` crate.

pub mod bind;
pub mod coerce;
mod error;
pub mod params;
pub mod tokens;
pub mod validate;

pub use bind::{Argv, BindIssue, Binding, bind};
pub use coerce::{CoerceError, coerce};
pub use error::SchemaError;
pub use params::{Argument, ArgumentBuilder, Flag, FlagBuilder, Params, Validation};
pub use validate::{ValidationFailure, validate};

pub use textcmd_schema::{Value, ValueType};
