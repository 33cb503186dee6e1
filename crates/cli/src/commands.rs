//! The demo commands served by the REPL.
//!
//! The context threaded through every command is the session counter.

use anyhow::Result;
use std::time::Duration;
use textcmd::prelude::*;

pub type Counter = u64;

pub fn all() -> Result<Vec<Command<Counter>>> {
    Ok(vec![echo()?, add()?, count()?, sleep()?, legacy_echo()?])
}

fn echo() -> Result<Command<Counter>, SchemaError> {
    Command::builder("echo", "Repeat the given text")
        .alias("say")
        .arg(Argument::builder("text", "Text to repeat", ValueType::String))
        .flag(
            Flag::builder("upper", "Shout it", ValueType::Boolean)
                .alias("u")
                .default(false),
        )
        .run(|argv, _| {
            let text = argv.arg_str("text")?;
            let reply = if argv.flag_bool("upper").unwrap_or(false) {
                text.to_uppercase()
            } else {
                text.to_string()
            };
            Some(reply.into())
        })
        .build()
}

fn within_range(value: &Value) -> bool {
    value.as_f64().is_some_and(|n| n.abs() <= 1e9)
}

fn add() -> Result<Command<Counter>, SchemaError> {
    Command::builder("add", "Add two numbers")
        .arg(
            Argument::builder("a", "First operand", ValueType::Number)
                .validation(Validation::new("a must be between -1e9 and 1e9", within_range)),
        )
        .arg(
            Argument::builder("b", "Second operand", ValueType::Number)
                .validation(Validation::new("b must be between -1e9 and 1e9", within_range)),
        )
        .run(|argv, _| {
            let sum = argv.arg_f64("a")? + argv.arg_f64("b")?;
            Some(Value::Number(sum).to_string().into())
        })
        .build()
}

fn count() -> Result<Command<Counter>, SchemaError> {
    Command::builder("count", "Bump the session counter")
        .flag(
            Flag::builder("by", "Step size", ValueType::Number)
                .alias("b")
                .default(1)
                .validation(Validation::new("by must be a whole number from 1 to 100", |v| {
                    v.as_f64()
                        .is_some_and(|n| n.fract() == 0.0 && (1.0..=100.0).contains(&n))
                })),
        )
        .run(|argv, counter: &Counter| {
            let step = argv.flag_f64("by")? as Counter;
            let next = counter.saturating_add(step);
            Some(Reply::message(format!("count: {next}")).with_context(next))
        })
        .build()
}

fn sleep() -> Result<Command<Counter>, SchemaError> {
    Command::builder("sleep", "Wait, then report back")
        .arg(
            Argument::builder("ms", "Milliseconds to wait", ValueType::Number)
                .default(100)
                .validation(Validation::new("ms must be between 0 and 5000", |v| {
                    v.as_f64().is_some_and(|n| (0.0..=5000.0).contains(&n))
                })),
        )
        .run_async(|argv, _| async move {
            let ms = argv.arg_f64("ms").unwrap_or_default() as u64;
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok(Some(Reply::message(format!("slept {ms} ms"))))
        })
        .build()
}

fn legacy_echo() -> Result<Command<Counter>, SchemaError> {
    Command::builder("legacy-echo", "Repeat the given text through a completion callback")
        .arg(Argument::builder("text", "Text to repeat", ValueType::String))
        .run_callback(|argv, _, done| {
            let text = argv.arg_str("text").unwrap_or_default().to_string();
            done.reply(text, None);
        })
        .build()
}
