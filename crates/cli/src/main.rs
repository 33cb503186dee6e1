mod commands;
mod strings;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use textcmd::{App, StringCatalog};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

use crate::commands::Counter;
use crate::strings::load_strings;

#[derive(Parser)]
#[command(name = "textcmd-repl")]
#[command(version, about = "Read commands from stdin and print the replies", long_about = None)]
struct Cli {
    /// Text every command line must start with
    #[arg(short, long, default_value = "/demo")]
    prefix: String,

    /// Text between the prefix and the command name
    #[arg(short, long, default_value = " ")]
    separator: String,

    /// Match the prefix regardless of case
    #[arg(long)]
    case_insensitive: bool,

    /// JSON file overriding the built-in reply strings
    #[arg(long, value_name = "FILE")]
    strings: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let strings = match &cli.strings {
        Some(path) => load_strings(path)?,
        None => StringCatalog::default(),
    };

    let session = Arc::new(AtomicU64::new(0));
    let app = build_app(&cli, strings, Arc::clone(&session))?;
    tracing::debug!(prefix = %app.prefix(), commands = app.commands().count(), "ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let counter: Counter = session.load(Ordering::SeqCst);
        if let Err(err) = app.parse_input(line, counter).await {
            eprintln!("{err}");
        }
    }

    Ok(())
}

fn build_app(cli: &Cli, strings: StringCatalog, session: Arc<AtomicU64>) -> Result<App<Counter>> {
    let mut builder = App::builder("textcmd-repl", "Demo commands for textcmd", &cli.prefix)
        .version(env!("CARGO_PKG_VERSION"))
        .separator(&cli.separator)
        .case_sensitive(!cli.case_insensitive)
        .strings(strings)
        .on_reply(move |message: String, counter: Counter| {
            session.store(counter, Ordering::SeqCst);
            if !message.is_empty() {
                println!("{message}");
            }
        });
    for command in commands::all()? {
        builder = builder.command(command);
    }
    Ok(builder.build()?)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
