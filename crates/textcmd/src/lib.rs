//! Schema-driven parser and dispatcher for single-line text commands.
//!
//! An [`App`] owns a prefix, a set of [`Command`]s and a reply sink. Each
//! call to [`App::parse_input`] takes one line, strips the prefix, resolves
//! the command, binds and validates its arguments and flags, runs the
//! handler and hands the reply to the sink.
//!
//! ```rust,ignore
//! use textcmd::prelude::*;
//!
//! let app = App::builder("bot", "a chat bot", "!")
//!     .separator("")
//!     .on_reply(|message, _ctx: ()| println!("{message}"))
//!     .command(
//!         Command::builder("greet", "say hello")
//!             .arg(Argument::builder("who", "who to greet", ValueType::String).default("world"))
//!             .run(|argv, _| Some(format!("hello {}", argv.arg_str("who")?).into()))
//!             .build()?,
//!     )
//!     .build()?;
//!
//! app.parse_input("!greet there", ()).await?;
//! ```

mod app;
mod command;
mod dispatch;
mod error;
mod handler;
pub mod help;
mod reply;
mod report;

pub use app::{App, AppBuilder};
pub use command::{Command, CommandBuilder};
pub use error::InputError;
pub use handler::{AsyncFn, CallbackFn, Done, Handler, SyncFn};
pub use help::{AppInfo, CommandInfo, HelpRenderer, PlainHelp};
pub use reply::{Reply, ReplySink};

pub use textcmd_argparse::{
    Argument, ArgumentBuilder, Argv, Flag, FlagBuilder, Params, SchemaError, Validation, Value,
    ValueType,
};
pub use textcmd_schema::{AppConfig, ArgumentConfig, CommandConfig, FlagConfig, StringCatalog};

/// The types most handlers and hosts need.
pub mod prelude {
    pub use crate::{
        App, Argument, Argv, Command, Done, Flag, Handler, InputError, Reply, SchemaError,
        Validation, Value, ValueType,
    };
}
