use serde::{Deserialize, Serialize};

use crate::strings::StringCatalog;
use crate::value::{Value, ValueType};

/// Separator used between the prefix and the command when none is configured.
pub const DEFAULT_SEPARATOR: &str = " ";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentConfig {
    pub name: String,
    pub desc: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// When absent, an argument with a default is optional and one without is required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagConfig {
    pub name: String,
    pub desc: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandConfig {
    pub name: String,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagConfig>,
    #[serde(default)]
    pub suppress_deprecation_warnings: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub name: String,
    pub desc: String,
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandConfig>,
    #[serde(default)]
    pub strings: StringCatalog,
}

impl AppConfig {
    /// Parse an app schema from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn separator(&self) -> &str {
        self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_config_reads_camel_case_json() {
        let config = AppConfig::from_json(
            r#"{
                "name": "bot",
                "desc": "a chat bot",
                "prefix": "!",
                "separator": "",
                "caseSensitive": false,
                "commands": [
                    {
                        "name": "roll",
                        "desc": "roll dice",
                        "aliases": ["r"],
                        "args": [
                            { "name": "sides", "desc": "faces", "type": "number", "default": 6 }
                        ],
                        "flags": [
                            { "name": "verbose", "desc": "talk more", "type": "boolean",
                              "default": false, "alias": "v", "caseSensitive": false }
                        ]
                    }
                ],
                "strings": { "help_usage": "Uso:" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.separator(), "");
        assert_eq!(config.case_sensitive, Some(false));
        let roll = &config.commands[0];
        assert_eq!(roll.aliases, vec!["r".to_string()]);
        assert_eq!(roll.args[0].value_type, ValueType::Number);
        assert_eq!(roll.args[0].default, Some(Value::Number(6.0)));
        assert_eq!(roll.args[0].required, None);
        assert_eq!(roll.flags[0].alias.as_deref(), Some("v"));
        assert_eq!(config.strings.help_usage, "Uso:");
        assert_eq!(
            config.strings.help_av_options,
            StringCatalog::default().help_av_options
        );
    }

    #[test]
    fn separator_defaults_to_a_space() {
        let config =
            AppConfig::from_json(r#"{ "name": "a", "desc": "b", "prefix": "/app" }"#).unwrap();
        assert_eq!(config.separator(), " ");
        assert!(config.commands.is_empty());
    }
}
