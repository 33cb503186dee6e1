//! Help rendering.
//!
//! `App` never formats help itself; it calls a [`HelpRenderer`], which can be
//! swapped through `AppBuilder::help`. [`PlainHelp`] is the default.

use textcmd_argparse::{Argument, Flag, Params};
use textcmd_schema::{StringCatalog, render};

/// App-level facts a renderer may show.
#[derive(Debug, Clone, Copy)]
pub struct AppInfo<'a> {
    pub name: &'a str,
    pub desc: &'a str,
    pub prefix: &'a str,
    pub separator: &'a str,
    pub version: Option<&'a str>,
}

impl AppInfo<'_> {
    /// `prefix` followed by the separator and `rest`.
    pub fn invocation(&self, rest: &str) -> String {
        format!("{}{}{}", self.prefix, self.separator, rest)
    }
}

/// Command-level facts a renderer may show.
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo<'a> {
    pub name: &'a str,
    pub desc: &'a str,
    pub aliases: &'a [String],
    pub params: &'a Params,
}

pub trait HelpRenderer: Send + Sync {
    fn app_help(
        &self,
        app: &AppInfo<'_>,
        commands: &[CommandInfo<'_>],
        strings: &StringCatalog,
    ) -> String;

    fn command_help(
        &self,
        app: &AppInfo<'_>,
        command: &CommandInfo<'_>,
        strings: &StringCatalog,
    ) -> String;
}

/// Plain-text help with aligned two-column tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHelp;

fn push_table(out: &mut String, rows: &[(String, String)]) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

fn arg_usage(arg: &Argument) -> String {
    if arg.required() {
        format!("({})", arg.name())
    } else {
        format!("[{}]", arg.name())
    }
}

fn arg_row(arg: &Argument, strings: &StringCatalog) -> (String, String) {
    let mut help = arg.desc().trim().to_string();
    if let Some(default) = arg.default_value() {
        help.push_str(&format!(" [{}: {default}]", strings.help_default));
    }
    (format!("{} <{}>", arg.name(), arg.value_type()), help)
}

fn flag_row(flag: &Flag, strings: &StringCatalog) -> (String, String) {
    let mut left = String::new();
    if let Some(alias) = flag.alias() {
        left.push_str(&format!("-{alias}, "));
    }
    left.push_str(&format!("--{}", flag.name()));
    if flag.value_type() != textcmd_schema::ValueType::Boolean {
        left.push_str(&format!("=<{}>", flag.value_type()));
    }
    let help = format!(
        "{} [{}: {}]",
        flag.desc().trim(),
        strings.help_default,
        flag.default_value()
    );
    (left, help)
}

impl HelpRenderer for PlainHelp {
    fn app_help(
        &self,
        app: &AppInfo<'_>,
        commands: &[CommandInfo<'_>],
        strings: &StringCatalog,
    ) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} - {}\n", app.name, app.desc.trim()));
        if let Some(version) = app.version {
            out.push_str(&format!("{} {version}\n", strings.help_version));
        }
        out.push_str(&format!(
            "\n{} {}\n",
            strings.help_usage,
            app.invocation("<command> [arguments] [options]")
        ));

        if !commands.is_empty() {
            out.push_str(&format!("\n{}:\n", strings.help_av_commands));
            let rows: Vec<(String, String)> = commands
                .iter()
                .map(|c| {
                    let mut help = c.desc.trim().to_string();
                    if !c.aliases.is_empty() {
                        help.push_str(&format!(" ({} {})", strings.help_aliases, c.aliases.join(", ")));
                    }
                    (c.name.to_string(), help)
                })
                .collect();
            push_table(&mut out, &rows);
        }

        out.push('\n');
        out.push_str(&render(&strings.help_further_help, &[("prefix", app.prefix)]));
        out
    }

    fn command_help(
        &self,
        app: &AppInfo<'_>,
        command: &CommandInfo<'_>,
        strings: &StringCatalog,
    ) -> String {
        let params = command.params;

        let mut usage = app.invocation(command.name);
        for arg in params.args() {
            usage.push(' ');
            usage.push_str(&arg_usage(arg));
        }
        let mut out = format!("{} {usage}\n", strings.help_usage);

        if !command.aliases.is_empty() {
            out.push_str(&format!("{} {}\n", strings.help_aliases, command.aliases.join(", ")));
        }

        out.push('\n');
        out.push_str(command.desc.trim_end());
        out.push('\n');

        if params.has_args() {
            out.push_str(&format!("\n{}:\n", strings.help_av_args));
            let rows: Vec<(String, String)> = params.args().map(|a| arg_row(a, strings)).collect();
            push_table(&mut out, &rows);
        }

        if params.has_flags() {
            out.push_str(&format!("\n{}:\n", strings.help_av_options));
            let rows: Vec<(String, String)> =
                params.flags().map(|f| flag_row(f, strings)).collect();
            push_table(&mut out, &rows);
        }

        if params.has_args() {
            out.push('\n');
            out.push_str(&strings.help_args_required_optional);
        }

        out.trim_end().to_string()
    }
}
