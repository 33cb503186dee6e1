//! Mapping tokens onto a command's arguments and flags.

use indexmap::IndexMap;
use textcmd_schema::{Value, ValueType};

use crate::coerce::coerce;
use crate::params::Params;

/// Bound values handed to a command handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Argv {
    pub args: IndexMap<String, Value>,
    pub flags: IndexMap<String, Value>,
}

impl Argv {
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }

    pub fn flag(&self, name: &str) -> Option<&Value> {
        self.flags.get(name)
    }

    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(Value::as_str)
    }

    pub fn arg_f64(&self, name: &str) -> Option<f64> {
        self.arg(name).and_then(Value::as_f64)
    }

    pub fn arg_bool(&self, name: &str) -> Option<bool> {
        self.arg(name).and_then(Value::as_bool)
    }

    pub fn flag_str(&self, name: &str) -> Option<&str> {
        self.flag(name).and_then(Value::as_str)
    }

    pub fn flag_f64(&self, name: &str) -> Option<f64> {
        self.flag(name).and_then(Value::as_f64)
    }

    pub fn flag_bool(&self, name: &str) -> Option<bool> {
        self.flag(name).and_then(Value::as_bool)
    }
}

/// A problem found while binding one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindIssue {
    MissingRequired {
        name: String,
    },
    InvalidValue {
        name: String,
        raw: String,
        expected: ValueType,
    },
    MissingFlagValue {
        name: String,
    },
}

impl BindIssue {
    pub fn is_missing_required(&self) -> bool {
        matches!(self, Self::MissingRequired { .. })
    }
}

/// Outcome of binding: every value that could be bound, plus every issue.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    pub argv: Argv,
    pub issues: Vec<BindIssue>,
}

impl Binding {
    pub fn has_missing_required(&self) -> bool {
        self.issues.iter().any(BindIssue::is_missing_required)
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Bind `tokens` (everything after the command name) to `params`.
///
/// - tokens starting with `-` are flags, everything else is positional
/// - a lone `--` ends flag parsing; a lone `-` is positional
/// - positionals bind in declaration order; extras are ignored
/// - `--name[=value]` / `-a[=value]`; the last occurrence of a flag wins
/// - unrecognized flags are ignored
/// - anything unsupplied takes its declared default
///
/// Problems are collected in `Binding::issues` instead of stopping early.
pub fn bind(params: &Params, tokens: &[String]) -> Binding {
    let mut positionals: Vec<&str> = Vec::new();
    let mut seen_flags: IndexMap<String, Option<&str>> = IndexMap::new();
    let mut after_separator = false;

    for token in tokens {
        let token = token.as_str();

        if after_separator || token == "-" || !token.starts_with('-') {
            positionals.push(token);
            continue;
        }
        if token == "--" {
            after_separator = true;
            continue;
        }

        let (body, inline) = match token.split_once('=') {
            Some((body, value)) => (body, Some(value)),
            None => (token, None),
        };
        let flag = match body.strip_prefix("--") {
            Some(long) => params.find_long(long),
            None => params.find_short(&body[1..]),
        };
        match flag {
            Some(flag) => {
                seen_flags.insert(flag.name().to_string(), inline);
            }
            None => tracing::debug!(token, "ignoring unrecognized flag"),
        }
    }

    let mut binding = Binding::default();

    let mut pos_iter = positionals.into_iter();
    for arg in params.args() {
        match pos_iter.next() {
            Some(raw) => match coerce(raw, arg.value_type()) {
                Ok(value) => {
                    binding.argv.args.insert(arg.name().to_string(), value);
                }
                Err(err) => binding.issues.push(BindIssue::InvalidValue {
                    name: arg.name().to_string(),
                    raw: err.raw,
                    expected: err.expected,
                }),
            },
            None => match arg.default_value() {
                Some(default) if !arg.required() => {
                    binding
                        .argv
                        .args
                        .insert(arg.name().to_string(), default.clone());
                }
                _ => binding.issues.push(BindIssue::MissingRequired {
                    name: arg.name().to_string(),
                }),
            },
        }
    }
    let extra = pos_iter.count();
    if extra > 0 {
        tracing::debug!(extra, "ignoring extra positional tokens");
    }

    for flag in params.flags() {
        let value = match seen_flags.get(flag.name()) {
            None => Ok(flag.default_value().clone()),
            Some(Some(raw)) => coerce(raw, flag.value_type()).map_err(|err| {
                BindIssue::InvalidValue {
                    name: flag.name().to_string(),
                    raw: err.raw,
                    expected: err.expected,
                }
            }),
            Some(None) if flag.value_type() == ValueType::Boolean => Ok(Value::Boolean(true)),
            Some(None) => Err(BindIssue::MissingFlagValue {
                name: flag.name().to_string(),
            }),
        };
        match value {
            Ok(value) => {
                binding.argv.flags.insert(flag.name().to_string(), value);
            }
            Err(issue) => binding.issues.push(issue),
        }
    }

    binding
}
