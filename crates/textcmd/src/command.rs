use std::fmt;
use std::future::Future;
use textcmd_argparse::tokens::names_match;
use textcmd_argparse::{
    Argument, ArgumentBuilder, Argv, Flag, FlagBuilder, Params, SchemaError,
};
use textcmd_schema::CommandConfig;

use crate::handler::{Done, Handler};
use crate::help::CommandInfo;
use crate::reply::Reply;

/// A named command: what it accepts and how it runs.
pub struct Command<C> {
    name: String,
    desc: String,
    case_sensitive: bool,
    aliases: Vec<String>,
    params: Params,
    handler: Handler<C>,
}

impl<C> Command<C> {
    pub fn builder(name: impl Into<String>, desc: impl Into<String>) -> CommandBuilder<C> {
        CommandBuilder {
            name: name.into(),
            desc: desc.into(),
            case_sensitive: true,
            aliases: Vec::new(),
            args: Vec::new(),
            flags: Vec::new(),
            handler: None,
            suppress_deprecation_warnings: false,
        }
    }

    /// Start a builder from a JSON-loaded schema. The handler still has to be set.
    pub fn from_config(config: CommandConfig) -> CommandBuilder<C> {
        let mut builder = Self::builder(config.name, config.desc)
            .case_sensitive(config.case_sensitive.unwrap_or(true))
            .suppress_deprecation_warnings(config.suppress_deprecation_warnings);
        builder.aliases = config.aliases;
        builder.args = config.args.into_iter().map(ArgumentBuilder::from).collect();
        builder.flags = config.flags.into_iter().map(FlagBuilder::from).collect();
        builder
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn handler(&self) -> &Handler<C> {
        &self.handler
    }

    /// The parts of this command a help renderer needs.
    pub fn info(&self) -> CommandInfo<'_> {
        CommandInfo {
            name: &self.name,
            desc: &self.desc,
            aliases: &self.aliases,
            params: &self.params,
        }
    }

    /// Whether `token` names this command, by name or alias, under its case rule.
    pub fn matches(&self, token: &str) -> bool {
        self.matches_name(token) || self.matches_alias(token)
    }

    pub fn matches_name(&self, token: &str) -> bool {
        names_match(&self.name, token, self.case_sensitive)
    }

    pub fn matches_alias(&self, token: &str) -> bool {
        self.aliases
            .iter()
            .any(|alias| names_match(alias, token, self.case_sensitive))
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("case_sensitive", &self.case_sensitive)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .field("handler", &self.handler)
            .finish()
    }
}

pub struct CommandBuilder<C> {
    name: String,
    desc: String,
    case_sensitive: bool,
    aliases: Vec<String>,
    args: Vec<ArgumentBuilder>,
    flags: Vec<FlagBuilder>,
    handler: Option<Handler<C>>,
    suppress_deprecation_warnings: bool,
}

impl<C> CommandBuilder<C> {
    /// Add a positional argument. Declaration order is positional order.
    pub fn arg(mut self, arg: ArgumentBuilder) -> Self {
        self.args.push(arg);
        self
    }

    pub fn flag(mut self, flag: FlagBuilder) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Defaults to `true`.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn suppress_deprecation_warnings(mut self, suppress: bool) -> Self {
        self.suppress_deprecation_warnings = suppress;
        self
    }

    pub fn handler(mut self, handler: Handler<C>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Run `f` synchronously; its return value is the reply.
    pub fn run<F>(self, f: F) -> Self
    where
        F: Fn(&Argv, &C) -> Option<Reply<C>> + Send + Sync + 'static,
    {
        self.handler(Handler::sync(f))
    }

    /// Run `f` and await the returned future.
    pub fn run_async<F, Fut>(self, f: F) -> Self
    where
        F: Fn(Argv, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<Reply<C>>>> + Send + 'static,
    {
        self.handler(Handler::future(f))
    }

    /// Deprecated completion-callback protocol; prefer [`CommandBuilder::run_async`].
    pub fn run_callback<F>(self, f: F) -> Self
    where
        F: Fn(&Argv, &C, Done<C>) + Send + Sync + 'static,
    {
        self.handler(Handler::callback(f))
    }

    pub fn build(self) -> Result<Command<C>, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::MissingName { kind: "command" });
        }
        if self.desc.trim().is_empty() {
            return Err(SchemaError::MissingDescription {
                kind: "command",
                name: self.name,
            });
        }

        let mut aliases: Vec<String> = Vec::with_capacity(self.aliases.len());
        for alias in self.aliases {
            if alias.trim().is_empty() {
                return Err(SchemaError::MissingName { kind: "alias" });
            }
            let clash = names_match(&alias, &self.name, self.case_sensitive)
                || aliases
                    .iter()
                    .any(|prev| names_match(prev, &alias, self.case_sensitive));
            if clash {
                return Err(SchemaError::Duplicate {
                    kind: "alias",
                    name: alias,
                });
            }
            aliases.push(alias);
        }

        let args = self
            .args
            .into_iter()
            .map(ArgumentBuilder::build)
            .collect::<Result<Vec<Argument>, _>>()?;
        let flags = self
            .flags
            .into_iter()
            .map(FlagBuilder::build)
            .collect::<Result<Vec<Flag>, _>>()?;
        let params = Params::new(args, flags)?;

        let Some(handler) = self.handler else {
            return Err(SchemaError::MissingHandler { name: self.name });
        };
        if matches!(handler, Handler::Callback(_)) && !self.suppress_deprecation_warnings {
            tracing::warn!(
                command = %self.name,
                "callback handlers are deprecated; use run_async instead"
            );
        }

        Ok(Command {
            name: self.name,
            desc: self.desc,
            case_sensitive: self.case_sensitive,
            aliases,
            params,
            handler,
        })
    }
}
