use serde::{Deserialize, Serialize};

/// Every built-in user-facing string, looked up by key.
///
/// Deserializing a partial JSON object keeps the defaults for missing keys,
/// so a catalog override only needs to name the strings it changes.
///
/// Templates may contain `{command}`, `{prefix}`, `{name}`, `{value}` and
/// `{type}` placeholders; see [`render`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringCatalog {
    pub help_usage: String,
    pub help_version: String,
    pub help_av_commands: String,
    pub help_av_args: String,
    pub help_av_options: String,
    pub help_aliases: String,
    pub help_default: String,
    pub help_further_help: String,
    pub help_args_required_optional: String,
    pub err_header: String,
    pub err_unknown_command: String,
    pub err_missing_argument: String,
    pub err_type_mismatch: String,
    pub err_missing_flag_value: String,
    pub err_validation_crashed: String,
    pub err_internal: String,
}

impl Default for StringCatalog {
    fn default() -> Self {
        Self {
            help_usage: "Usage:".to_string(),
            help_version: "Version:".to_string(),
            help_av_commands: "Available commands".to_string(),
            help_av_args: "Available arguments".to_string(),
            help_av_options: "Available options".to_string(),
            help_aliases: "Aliases:".to_string(),
            help_default: "default".to_string(),
            help_further_help: "Type {prefix} <command> --help for more information about a command."
                .to_string(),
            help_args_required_optional:
                "Arguments between () are required; arguments between [] are optional."
                    .to_string(),
            err_header: "Error: the command could not be executed:".to_string(),
            err_unknown_command:
                "Error: unknown command \"{command}\". Type {prefix} --help for a list of commands."
                    .to_string(),
            err_missing_argument: "missing required argument \"{name}\"".to_string(),
            err_type_mismatch: "\"{value}\" is not a valid {type} for \"{name}\"".to_string(),
            err_missing_flag_value: "missing value for flag \"{name}\"".to_string(),
            err_validation_crashed: "\"{name}\" could not be validated".to_string(),
            err_internal: "Error: an internal error occurred while running the command."
                .to_string(),
        }
    }
}

/// Substitute `{key}` placeholders in `template`.
///
/// The template is scanned once, so substituted values are never themselves
/// expanded. Unknown placeholders are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
