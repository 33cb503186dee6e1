use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use textcmd_argparse::SchemaError;
use textcmd_argparse::tokens::{names_match, split, strip_prefix};
use textcmd_schema::{AppConfig, DEFAULT_SEPARATOR, StringCatalog, render};

use crate::command::Command;
use crate::dispatch::Dispatcher;
use crate::error::InputError;
use crate::handler::Handler;
use crate::help::{AppInfo, CommandInfo, HelpRenderer, PlainHelp};
use crate::reply::ReplySink;

/// A registry of commands sharing one prefix and one reply sink.
pub struct App<C> {
    name: String,
    desc: String,
    prefix: String,
    version: Option<String>,
    separator: String,
    case_sensitive: bool,
    commands: IndexMap<String, Command<C>>,
    sink: Arc<dyn ReplySink<C>>,
    strings: StringCatalog,
    help: Arc<dyn HelpRenderer>,
}

/// What the first token after the prefix selects.
enum Resolution<'a, C> {
    AppHelp,
    Version(&'a str),
    Unknown(&'a str),
    Command(&'a Command<C>, &'a [String]),
}

impl<C> App<C> {
    pub fn builder(
        name: impl Into<String>,
        desc: impl Into<String>,
        prefix: impl Into<String>,
    ) -> AppBuilder<C> {
        AppBuilder {
            name: name.into(),
            desc: desc.into(),
            prefix: prefix.into(),
            version: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            case_sensitive: true,
            commands: Vec::new(),
            sink: None,
            strings: StringCatalog::default(),
            help: None,
        }
    }

    /// Start a builder from a JSON-loaded schema, wiring handlers by command name.
    ///
    /// Every configured command needs an entry in `handlers`. The reply sink
    /// still has to be set on the returned builder.
    pub fn from_config(
        config: AppConfig,
        mut handlers: HashMap<String, Handler<C>>,
    ) -> Result<AppBuilder<C>, SchemaError> {
        let separator = config.separator().to_string();
        let mut builder = Self::builder(config.name, config.desc, config.prefix)
            .separator(separator)
            .case_sensitive(config.case_sensitive.unwrap_or(true))
            .strings(config.strings);
        if let Some(version) = config.version {
            builder = builder.version(version);
        }

        for command in config.commands {
            let handler = handlers.remove(&command.name);
            let mut command_builder = Command::from_config(command);
            if let Some(handler) = handler {
                command_builder = command_builder.handler(handler);
            }
            builder = builder.command(command_builder.build()?);
        }

        for name in handlers.keys() {
            tracing::warn!(command = %name, "handler has no matching command in config");
        }
        Ok(builder)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn strings(&self) -> &StringCatalog {
        &self.strings
    }

    /// Registered commands, in registration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command<C>> {
        self.commands.values()
    }

    /// Look a command up the way input lines do: by name first, then by alias.
    pub fn command(&self, token: &str) -> Option<&Command<C>> {
        self.commands
            .values()
            .find(|c| c.matches_name(token))
            .or_else(|| self.commands.values().find(|c| c.matches_alias(token)))
    }

    /// Register a command after construction.
    ///
    /// Rejected when its name or one of its aliases is already taken. Two
    /// names collide case-insensitively if the app or either command is
    /// case insensitive.
    pub fn add_command(&mut self, command: Command<C>) -> Result<(), SchemaError> {
        for existing in self.commands.values() {
            let case_sensitive =
                self.case_sensitive && existing.case_sensitive() && command.case_sensitive();
            let taken = |token: &str| {
                names_match(existing.name(), token, case_sensitive)
                    || existing
                        .aliases()
                        .iter()
                        .any(|alias| names_match(alias, token, case_sensitive))
            };

            if taken(command.name()) {
                return Err(SchemaError::Duplicate {
                    kind: "command",
                    name: command.name().to_string(),
                });
            }
            if let Some(alias) = command.aliases().iter().find(|alias| taken(alias.as_str())) {
                return Err(SchemaError::AliasConflict {
                    alias: alias.clone(),
                    existing: existing.name().to_string(),
                });
            }
        }

        tracing::debug!(app = %self.name, command = %command.name(), "registered command");
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    /// The app-level help text, as `--help` would reply it.
    pub fn app_help(&self) -> String {
        let commands: Vec<CommandInfo<'_>> = self.commands.values().map(Command::info).collect();
        self.help.app_help(&self.info(), &commands, &self.strings)
    }

    /// Help for one command, looked up by name or alias.
    pub fn command_help(&self, token: &str) -> Option<String> {
        let command = self.command(token)?;
        Some(
            self.help
                .command_help(&self.info(), &command.info(), &self.strings),
        )
    }

    fn info(&self) -> AppInfo<'_> {
        AppInfo {
            name: &self.name,
            desc: &self.desc,
            prefix: &self.prefix,
            separator: &self.separator,
            version: self.version.as_deref(),
        }
    }

    fn resolve<'a>(&'a self, tokens: &'a [String]) -> Resolution<'a, C> {
        let Some((first, rest)) = tokens.split_first() else {
            return Resolution::AppHelp;
        };

        if names_match(first, "--version", self.case_sensitive) {
            return match self.version.as_deref() {
                Some(version) => Resolution::Version(version),
                None => Resolution::AppHelp,
            };
        }
        if names_match(first, "--help", self.case_sensitive) {
            return Resolution::AppHelp;
        }

        match self.command(first) {
            Some(command) => Resolution::Command(command, rest),
            None => Resolution::Unknown(first),
        }
    }
}

impl<C: Clone + Send + 'static> App<C> {
    /// Parse one line and reply through the sink.
    ///
    /// The only error is a line that does not start with the prefix; every
    /// other problem is replied to the user. The sink is called at most once
    /// per call, except that a callback handler may reply later.
    pub async fn parse_input(&self, line: &str, context: C) -> Result<(), InputError> {
        let Some(rest) = strip_prefix(line, &self.prefix, &self.separator, self.case_sensitive)
        else {
            return Err(InputError::MissingPrefix {
                prefix: self.prefix.clone(),
            });
        };

        let tokens = split(rest);
        match self.resolve(&tokens) {
            Resolution::AppHelp => {
                tracing::debug!(app = %self.name, "replying with app help");
                self.sink.reply(self.app_help(), context);
            }
            Resolution::Version(version) => {
                self.sink.reply(format!("v{version}"), context);
            }
            Resolution::Unknown(token) => {
                tracing::debug!(app = %self.name, command = token, "unknown command");
                let text = render(
                    &self.strings.err_unknown_command,
                    &[("command", token), ("prefix", self.prefix.as_str())],
                );
                self.sink.reply(text, context);
            }
            Resolution::Command(command, rest) => {
                tracing::debug!(app = %self.name, command = %command.name(), "dispatching");
                let stage = self.dispatcher().dispatch(command, rest, context).await;
                tracing::debug!(command = %command.name(), ?stage, "dispatch finished");
            }
        }
        Ok(())
    }

    fn dispatcher(&self) -> Dispatcher<'_, C> {
        Dispatcher {
            app: self.info(),
            strings: &self.strings,
            help: self.help.as_ref(),
            sink: &self.sink,
        }
    }
}

impl<C> fmt::Debug for App<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("version", &self.version)
            .field("separator", &self.separator)
            .field("case_sensitive", &self.case_sensitive)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

pub struct AppBuilder<C> {
    name: String,
    desc: String,
    prefix: String,
    version: Option<String>,
    separator: String,
    case_sensitive: bool,
    commands: Vec<Command<C>>,
    sink: Option<Arc<dyn ReplySink<C>>>,
    strings: StringCatalog,
    help: Option<Arc<dyn HelpRenderer>>,
}

impl<C> fmt::Debug for AppBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppBuilder")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("version", &self.version)
            .field("separator", &self.separator)
            .field("case_sensitive", &self.case_sensitive)
            .field("commands", &self.commands.len())
            .field("has_sink", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<C> AppBuilder<C> {
    /// Shorthand for [`AppBuilder::reply_sink`] with a closure.
    pub fn on_reply<F>(self, f: F) -> Self
    where
        F: Fn(String, C) + Send + Sync + 'static,
    {
        self.reply_sink(f)
    }

    pub fn reply_sink(mut self, sink: impl ReplySink<C> + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// An empty version counts as none.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Text between the prefix and the command. Defaults to a single space.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Applies to prefix matching and to command-name collisions. Defaults to `true`.
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn command(mut self, command: Command<C>) -> Self {
        self.commands.push(command);
        self
    }

    pub fn strings(mut self, strings: StringCatalog) -> Self {
        self.strings = strings;
        self
    }

    pub fn help(mut self, help: impl HelpRenderer + 'static) -> Self {
        self.help = Some(Arc::new(help));
        self
    }

    pub fn build(self) -> Result<App<C>, SchemaError> {
        if self.name.trim().is_empty() {
            return Err(SchemaError::MissingName { kind: "app" });
        }
        if self.desc.trim().is_empty() {
            return Err(SchemaError::MissingDescription {
                kind: "app",
                name: self.name,
            });
        }
        if self.prefix.trim().is_empty() {
            return Err(SchemaError::MissingPrefix { name: self.name });
        }
        let Some(sink) = self.sink else {
            return Err(SchemaError::MissingReplySink { name: self.name });
        };

        let mut app = App {
            name: self.name,
            desc: self.desc,
            prefix: self.prefix,
            version: self.version.filter(|v| !v.trim().is_empty()),
            separator: self.separator,
            case_sensitive: self.case_sensitive,
            commands: IndexMap::new(),
            sink,
            strings: self.strings,
            help: self.help.unwrap_or_else(|| Arc::new(PlainHelp)),
        };
        for command in self.commands {
            app.add_command(command)?;
        }
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    fn builder(log: &Log) -> AppBuilder<()> {
        let log = Arc::clone(log);
        App::builder("testapp", "desc", "/app")
            .on_reply(move |message, _| log.lock().unwrap().push(message))
    }

    fn cmd(name: &str) -> Command<()> {
        Command::builder(name, "desc").run(|_, _| None).build().unwrap()
    }

    #[test]
    fn build_requires_prefix_and_sink() {
        let err = App::<()>::builder("a", "b", "").on_reply(|_, _| {}).build().unwrap_err();
        assert!(matches!(err, SchemaError::MissingPrefix { .. }));

        let err = App::<()>::builder("a", "b", "/a").build().unwrap_err();
        assert!(matches!(err, SchemaError::MissingReplySink { .. }));
    }

    #[test]
    fn duplicate_commands_are_rejected() {
        let log = Log::default();
        let err = builder(&log).command(cmd("foo")).command(cmd("foo")).build().unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { kind: "command", .. }));

        let mut app = builder(&log).command(cmd("foo")).build().unwrap();
        let aliased = Command::builder("bar", "desc")
            .alias("foo")
            .run(|_, _| None)
            .build()
            .unwrap();
        let err = app.add_command(aliased).unwrap_err();
        assert!(matches!(err, SchemaError::AliasConflict { .. }));
        app.add_command(cmd("baz")).unwrap();
        assert_eq!(app.commands().count(), 2);
    }

    #[test]
    fn case_insensitive_app_rejects_case_variants() {
        let log = Log::default();
        let err = builder(&log)
            .case_sensitive(false)
            .command(cmd("foo"))
            .command(cmd("FOO"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { .. }));

        let app = builder(&log).command(cmd("foo")).command(cmd("FOO")).build().unwrap();
        assert_eq!(app.commands().count(), 2);
    }

    #[test]
    fn names_win_over_aliases() {
        let log = Log::default();
        let app = builder(&log)
            .command(
                Command::builder("first", "desc")
                    .alias("second")
                    .run(|_, _| None)
                    .build()
                    .unwrap(),
            )
            .build();
        let mut app = app.unwrap();
        assert!(app.add_command(cmd("second")).is_err());
        assert_eq!(app.command("second").map(Command::name), Some("first"));
    }

    #[test]
    fn app_and_parse_future_are_send() {
        fn assert_send_sync<T: Send + Sync>(_: &T) {}
        fn assert_send<T: Send>(_: &T) {}

        let log = Log::default();
        let app = builder(&log).command(cmd("foo")).build().unwrap();
        assert_send_sync(&app);
        let fut = app.parse_input("/app foo", ());
        assert_send(&fut);
    }

    #[test]
    fn empty_version_counts_as_none() {
        let log = Log::default();
        let app = builder(&log).version("  ").build().unwrap();
        assert_eq!(app.version(), None);
    }

    #[test]
    fn from_config_wires_handlers_by_name() {
        let config = AppConfig::from_json(
            r#"{
                "name": "bot",
                "desc": "a bot",
                "prefix": "!",
                "separator": "",
                "version": "0.1.0",
                "commands": [{ "name": "ping", "desc": "pong back" }]
            }"#,
        )
        .unwrap();

        let mut handlers = HashMap::new();
        handlers.insert("ping".to_string(), Handler::<()>::sync(|_, _| Some("pong".into())));
        let app = App::from_config(config.clone(), handlers)
            .unwrap()
            .on_reply(|_, _| {})
            .build()
            .unwrap();
        assert_eq!(app.separator(), "");
        assert_eq!(app.version(), Some("0.1.0"));
        assert!(app.command("ping").is_some());

        let err = App::<()>::from_config(config, HashMap::new()).unwrap_err();
        assert!(matches!(err, SchemaError::MissingHandler { .. }));
    }

    #[test]
    fn command_help_looks_up_aliases() {
        let log = Log::default();
        let app = builder(&log)
            .command(
                Command::builder("foo", "does foo")
                    .alias("f")
                    .run(|_, _| None)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let text = app.command_help("f").unwrap();
        assert!(text.starts_with("Usage: /app foo"));
        assert!(app.command_help("nope").is_none());
        assert!(app.app_help().contains("foo"));
    }
}
