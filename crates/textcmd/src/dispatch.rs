//! Running one resolved command: bind, validate, invoke, reply.

use std::sync::Arc;
use textcmd_argparse::{BindIssue, ValidationFailure, bind, validate};
use textcmd_schema::StringCatalog;

use crate::command::Command;
use crate::handler::{Done, Handler};
use crate::help::{AppInfo, HelpRenderer};
use crate::reply::{Reply, ReplySink};
use crate::report::render_report;

/// Where an invocation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Idle,
    Bound,
    Validated,
    Invoking,
    Replied,
    Failed,
}

pub(crate) struct Dispatcher<'a, C> {
    pub(crate) app: AppInfo<'a>,
    pub(crate) strings: &'a StringCatalog,
    pub(crate) help: &'a dyn HelpRenderer,
    pub(crate) sink: &'a Arc<dyn ReplySink<C>>,
}

impl<C: Clone + Send + 'static> Dispatcher<'_, C> {
    pub(crate) async fn dispatch(&self, command: &Command<C>, tokens: &[String], context: C) -> Stage {
        let name = command.name();
        let params = command.params();

        if wants_help(command, tokens) {
            let text = self
                .help
                .command_help(&self.app, &command.info(), self.strings);
            self.sink.reply(text, context);
            return Stage::Replied;
        }

        let binding = bind(params, tokens);
        if binding.has_missing_required() {
            let missing: Vec<BindIssue> = binding
                .issues
                .into_iter()
                .filter(BindIssue::is_missing_required)
                .collect();
            return self.fail(name, Stage::Idle, &missing, &[], context);
        }
        let stage = advance(name, Stage::Idle, Stage::Bound);

        let failures = validate(params, &binding.argv);
        if !binding.is_clean() || !failures.is_empty() {
            return self.fail(name, stage, &binding.issues, &failures, context);
        }
        let stage = advance(name, stage, Stage::Validated);
        let stage = advance(name, stage, Stage::Invoking);

        match command.handler() {
            Handler::Sync(f) => {
                let reply = f(&binding.argv, &context);
                self.deliver(name, stage, reply, context)
            }
            Handler::Async(f) => match f(binding.argv, context.clone()).await {
                Ok(reply) => self.deliver(name, stage, reply, context),
                Err(err) => {
                    tracing::warn!(command = name, error = %err, "async handler failed");
                    self.sink.reply(self.strings.err_internal.clone(), context);
                    advance(name, stage, Stage::Replied)
                }
            },
            Handler::Callback(f) => {
                let done = Done::new(name.to_string(), context.clone(), Arc::clone(self.sink));
                f(&binding.argv, &context, done);
                // The reply, if any, arrives through `Done`.
                stage
            }
        }
    }

    fn fail(
        &self,
        name: &str,
        from: Stage,
        issues: &[BindIssue],
        failures: &[ValidationFailure],
        context: C,
    ) -> Stage {
        let text = render_report(issues, failures, self.strings);
        self.sink.reply(text, context);
        advance(name, from, Stage::Failed)
    }

    fn deliver(&self, name: &str, from: Stage, reply: Option<Reply<C>>, context: C) -> Stage {
        match reply {
            Some(reply) if !reply.is_empty() => {
                let message = reply.message.unwrap_or_default();
                self.sink.reply(message, reply.context.unwrap_or(context));
                advance(name, from, Stage::Replied)
            }
            _ => {
                tracing::debug!(command = name, "handler produced no reply");
                from
            }
        }
    }
}

fn advance(command: &str, from: Stage, to: Stage) -> Stage {
    tracing::trace!(command, ?from, ?to, "dispatch stage");
    to
}

/// `--help` before any `--`, unless the command declares its own `help` flag.
fn wants_help<C>(command: &Command<C>, tokens: &[String]) -> bool {
    command.params().find_long("help").is_none()
        && tokens
            .iter()
            .take_while(|t| t.as_str() != "--")
            .any(|t| t == "--help")
}
