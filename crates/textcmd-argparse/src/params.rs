//! Argument and flag declarations.
//!
//! Everything here is validated when built and immutable afterwards.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use textcmd_schema::{ArgumentConfig, FlagConfig, Value, ValueType};

use crate::error::SchemaError;
use crate::tokens::names_match;

type Predicate = dyn Fn(&Value) -> anyhow::Result<bool> + Send + Sync;

/// An error message paired with a predicate over a bound value.
#[derive(Clone)]
pub struct Validation {
    error_message: String,
    predicate: Arc<Predicate>,
}

impl Validation {
    pub fn new<F>(error_message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::fallible(error_message, move |value| Ok(predicate(value)))
    }

    /// A predicate that may itself fail.
    ///
    /// An `Err` is reported as a validation failure of its own, distinct from
    /// the predicate rejecting the value.
    pub fn fallible<F>(error_message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            error_message: error_message.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn check(&self, value: &Value) -> anyhow::Result<bool> {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validation")
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

fn check_common(
    kind: &'static str,
    name: &str,
    desc: &str,
    value_type: ValueType,
    default: Option<&Value>,
    validations: &[Validation],
) -> Result<(), SchemaError> {
    if name.trim().is_empty() {
        return Err(SchemaError::MissingName { kind });
    }
    if desc.trim().is_empty() {
        return Err(SchemaError::MissingDescription {
            kind,
            name: name.to_string(),
        });
    }
    if let Some(default) = default {
        if default.value_type() != value_type {
            return Err(SchemaError::DefaultTypeMismatch {
                kind,
                name: name.to_string(),
                expected: value_type,
                default: format!("{default:?}"),
            });
        }
    }
    if let Some(index) = validations
        .iter()
        .position(|v| v.error_message().trim().is_empty())
    {
        return Err(SchemaError::InvalidValidation {
            kind,
            name: name.to_string(),
            index,
        });
    }
    Ok(())
}

/// A positional argument.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    desc: String,
    value_type: ValueType,
    required: bool,
    default: Option<Value>,
    validations: Vec<Validation>,
}

impl Argument {
    pub fn builder(
        name: impl Into<String>,
        desc: impl Into<String>,
        value_type: ValueType,
    ) -> ArgumentBuilder {
        ArgumentBuilder {
            name: name.into(),
            desc: desc.into(),
            value_type,
            required: None,
            default: None,
            validations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentBuilder {
    name: String,
    desc: String,
    value_type: ValueType,
    required: Option<bool>,
    default: Option<Value>,
    validations: Vec<Validation>,
}

impl ArgumentBuilder {
    /// Whether the argument must be supplied.
    ///
    /// Defaults to `true` unless a default value is declared.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn build(self) -> Result<Argument, SchemaError> {
        check_common(
            "argument",
            &self.name,
            &self.desc,
            self.value_type,
            self.default.as_ref(),
            &self.validations,
        )?;

        let required = self.required.unwrap_or(self.default.is_none());
        match (required, &self.default) {
            (false, None) => {
                return Err(SchemaError::MissingDefault {
                    kind: "optional argument",
                    name: self.name,
                });
            }
            (true, Some(_)) => return Err(SchemaError::RequiredWithDefault { name: self.name }),
            _ => {}
        }

        Ok(Argument {
            name: self.name,
            desc: self.desc,
            value_type: self.value_type,
            required,
            default: self.default,
            validations: self.validations,
        })
    }
}

impl From<ArgumentConfig> for ArgumentBuilder {
    fn from(config: ArgumentConfig) -> Self {
        Self {
            name: config.name,
            desc: config.desc,
            value_type: config.value_type,
            required: config.required,
            default: config.default,
            validations: Vec::new(),
        }
    }
}

/// A named flag (`--name`, `-a`). Flags always resolve to a value.
#[derive(Debug, Clone)]
pub struct Flag {
    name: String,
    desc: String,
    value_type: ValueType,
    default: Value,
    alias: Option<char>,
    case_sensitive: bool,
    validations: Vec<Validation>,
}

impl Flag {
    pub fn builder(
        name: impl Into<String>,
        desc: impl Into<String>,
        value_type: ValueType,
    ) -> FlagBuilder {
        FlagBuilder {
            name: name.into(),
            desc: desc.into(),
            value_type,
            default: None,
            alias: None,
            case_sensitive: true,
            validations: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn alias(&self) -> Option<char> {
        self.alias
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }

    /// Whether `--{long}` names this flag.
    pub fn matches_long(&self, long: &str) -> bool {
        names_match(&self.name, long, self.case_sensitive)
    }

    /// Whether `-{short}` names this flag. Aliases always match exactly.
    pub fn matches_short(&self, short: &str) -> bool {
        let mut chars = short.chars();
        match (self.alias, chars.next(), chars.next()) {
            (Some(alias), Some(c), None) => alias == c,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlagBuilder {
    name: String,
    desc: String,
    value_type: ValueType,
    default: Option<Value>,
    alias: Option<String>,
    case_sensitive: bool,
    validations: Vec<Validation>,
}

impl FlagBuilder {
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn build(self) -> Result<Flag, SchemaError> {
        check_common(
            "flag",
            &self.name,
            &self.desc,
            self.value_type,
            self.default.as_ref(),
            &self.validations,
        )?;

        if self.name.starts_with('-')
            || self.name.contains('=')
            || self.name.chars().any(char::is_whitespace)
        {
            return Err(SchemaError::InvalidName {
                kind: "flag",
                name: self.name,
            });
        }

        let Some(default) = self.default else {
            return Err(SchemaError::MissingDefault {
                kind: "flag",
                name: self.name,
            });
        };

        let alias = match self.alias.as_deref() {
            None => None,
            Some(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' && c != '=' && !c.is_whitespace() => Some(c),
                    _ => {
                        return Err(SchemaError::InvalidAlias {
                            name: self.name,
                            alias: raw.to_string(),
                        });
                    }
                }
            }
        };

        Ok(Flag {
            name: self.name,
            desc: self.desc,
            value_type: self.value_type,
            default,
            alias,
            case_sensitive: self.case_sensitive,
            validations: self.validations,
        })
    }
}

impl From<FlagConfig> for FlagBuilder {
    fn from(config: FlagConfig) -> Self {
        Self {
            name: config.name,
            desc: config.desc,
            value_type: config.value_type,
            default: config.default,
            alias: config.alias,
            case_sensitive: config.case_sensitive.unwrap_or(true),
            validations: Vec::new(),
        }
    }
}

/// The arguments and flags a command accepts.
///
/// Arguments keep declaration order, which is their positional order.
#[derive(Debug, Clone, Default)]
pub struct Params {
    args: IndexMap<String, Argument>,
    flags: IndexMap<String, Flag>,
}

impl Params {
    pub fn new(args: Vec<Argument>, flags: Vec<Flag>) -> Result<Self, SchemaError> {
        let mut params = Self::default();

        for arg in args {
            if params.args.contains_key(arg.name()) {
                return Err(SchemaError::Duplicate {
                    kind: "argument",
                    name: arg.name,
                });
            }
            params.args.insert(arg.name.clone(), arg);
        }

        for flag in flags {
            let name_clash = params.flags.values().any(|prev| {
                let case_sensitive = prev.case_sensitive && flag.case_sensitive;
                names_match(&prev.name, &flag.name, case_sensitive)
            });
            if name_clash {
                return Err(SchemaError::Duplicate {
                    kind: "flag",
                    name: flag.name,
                });
            }
            if let Some(alias) = flag.alias {
                if let Some(prev) = params.flags.values().find(|f| f.alias == Some(alias)) {
                    return Err(SchemaError::DuplicateFlagAlias {
                        alias,
                        first: prev.name.clone(),
                        second: flag.name,
                    });
                }
            }
            params.flags.insert(flag.name.clone(), flag);
        }

        Ok(params)
    }

    pub fn args(&self) -> impl Iterator<Item = &Argument> {
        self.args.values()
    }

    pub fn flags(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    pub fn arg(&self, name: &str) -> Option<&Argument> {
        self.args.get(name)
    }

    pub fn flag(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Find the flag named by `--{long}`.
    pub fn find_long(&self, long: &str) -> Option<&Flag> {
        self.flags.values().find(|f| f.matches_long(long))
    }

    /// Find the flag named by `-{short}`.
    pub fn find_short(&self, short: &str) -> Option<&Flag> {
        self.flags.values().find(|f| f.matches_short(short))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_arg(name: &str) -> ArgumentBuilder {
        Argument::builder(name, "desc", ValueType::String)
    }

    #[test]
    fn argument_without_default_is_required() {
        let arg = string_arg("testarg").build().unwrap();
        assert!(arg.required());
        assert!(arg.default_value().is_none());
    }

    #[test]
    fn argument_with_default_is_optional() {
        let arg = string_arg("testarg").default("abc").build().unwrap();
        assert!(!arg.required());

        let arg = string_arg("testarg2").required(false).default("abc").build().unwrap();
        assert!(!arg.required());
    }

    #[test]
    fn optional_argument_needs_default() {
        let err = string_arg("testarg").required(false).build().unwrap_err();
        assert!(matches!(err, SchemaError::MissingDefault { .. }));
    }

    #[test]
    fn required_argument_rejects_default() {
        let err = string_arg("testarg")
            .required(true)
            .default("abc")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::RequiredWithDefault { .. }));
    }

    #[test]
    fn default_must_match_declared_type() {
        let err = string_arg("testarg").default(123).build().unwrap_err();
        assert!(matches!(err, SchemaError::DefaultTypeMismatch { .. }));

        let err = Argument::builder("testarg", "desc", ValueType::Number)
            .default("abc")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultTypeMismatch { .. }));

        let err = Flag::builder("testflag", "desc", ValueType::String)
            .default(123)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DefaultTypeMismatch { .. }));
    }

    #[test]
    fn name_and_description_are_required() {
        let err = string_arg("").build().unwrap_err();
        assert_eq!(err, SchemaError::MissingName { kind: "argument" });

        let err = Flag::builder("flag", " ", ValueType::Boolean)
            .default(false)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingDescription { kind: "flag", .. }));
    }

    #[test]
    fn flag_needs_default() {
        let err = Flag::builder("testflag", "desc", ValueType::String)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingDefault { kind: "flag", .. }));
    }

    #[test]
    fn flag_names_must_be_bindable() {
        for name in ["--x", "-x", "a=b", "a b", "tab\tname"] {
            let err = Flag::builder(name, "desc", ValueType::Boolean)
                .default(false)
                .build()
                .unwrap_err();
            assert_eq!(
                err,
                SchemaError::InvalidName {
                    kind: "flag",
                    name: name.to_string(),
                }
            );
        }

        let flag = Flag::builder("dry-run", "desc", ValueType::Boolean)
            .default(false)
            .build()
            .unwrap();
        assert_eq!(flag.name(), "dry-run");
    }

    #[test]
    fn flag_alias_must_be_one_character() {
        let err = Flag::builder("testflag", "desc", ValueType::Boolean)
            .default(false)
            .alias("tf")
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidAlias { .. }));

        let flag = Flag::builder("testflag", "desc", ValueType::Boolean)
            .default(false)
            .alias("t")
            .build()
            .unwrap();
        assert_eq!(flag.alias(), Some('t'));
        assert!(flag.matches_short("t"));
        assert!(!flag.matches_short("T"));
    }

    #[test]
    fn validations_need_a_message() {
        let err = Flag::builder("testflag", "desc", ValueType::Boolean)
            .default(false)
            .validation(Validation::new("error", |_| true))
            .validation(Validation::new("", |_| true))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::InvalidValidation {
                kind: "flag",
                name: "testflag".to_string(),
                index: 1,
            }
        );
    }

    #[test]
    fn params_reject_duplicates() {
        let a = string_arg("x").build().unwrap();
        let err = Params::new(vec![a.clone(), a], vec![]).unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { kind: "argument", .. }));

        let f1 = Flag::builder("flag", "d", ValueType::Boolean)
            .default(false)
            .alias("f")
            .build()
            .unwrap();
        let f2 = Flag::builder("other", "d", ValueType::Boolean)
            .default(false)
            .alias("f")
            .build()
            .unwrap();
        let err = Params::new(vec![], vec![f1.clone(), f2]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFlagAlias { alias: 'f', .. }));

        let f3 = Flag::builder("FLAG", "d", ValueType::Boolean)
            .default(false)
            .case_sensitive(false)
            .build()
            .unwrap();
        let err = Params::new(vec![], vec![f1, f3]).unwrap_err();
        assert!(matches!(err, SchemaError::Duplicate { kind: "flag", .. }));
    }

    #[test]
    fn builders_accept_json_configs() {
        let arg: ArgumentConfig = serde_json::from_str(
            r#"{ "name": "testarg", "desc": "d", "type": "string", "default": "x" }"#,
        )
        .unwrap();
        let arg = ArgumentBuilder::from(arg).build().unwrap();
        assert!(!arg.required());

        let flag: FlagConfig = serde_json::from_str(
            r#"{ "name": "testflag", "desc": "d", "type": "number", "default": "abc" }"#,
        )
        .unwrap();
        assert!(FlagBuilder::from(flag).build().is_err());
    }
}
