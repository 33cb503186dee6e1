use textcmd_schema::ValueType;

/// A malformed schema declaration.
///
/// Raised while building arguments, flags, commands or apps; never while
/// parsing user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{kind} is missing a name")]
    MissingName { kind: &'static str },

    #[error("{kind} name '{name}' cannot start with '-' or contain '=' or whitespace")]
    InvalidName { kind: &'static str, name: String },

    #[error("{kind} '{name}' is missing a description")]
    MissingDescription { kind: &'static str, name: String },

    #[error("{kind} '{name}': default value {default} is not a {expected}")]
    DefaultTypeMismatch {
        kind: &'static str,
        name: String,
        expected: ValueType,
        default: String,
    },

    #[error("{kind} '{name}' must declare a default value")]
    MissingDefault { kind: &'static str, name: String },

    #[error("required argument '{name}' cannot declare a default value")]
    RequiredWithDefault { name: String },

    #[error("flag '{name}': alias '{alias}' must be a single character other than '-' or '='")]
    InvalidAlias { name: String, alias: String },

    #[error("{kind} '{name}': validation #{index} has an empty error message")]
    InvalidValidation {
        kind: &'static str,
        name: String,
        index: usize,
    },

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("flag alias '-{alias}' maps to both '{first}' and '{second}'")]
    DuplicateFlagAlias {
        alias: char,
        first: String,
        second: String,
    },

    #[error("alias conflict: '{alias}' is already used by command '{existing}'")]
    AliasConflict { alias: String, existing: String },

    #[error("command '{name}' has no handler")]
    MissingHandler { name: String },

    #[error("app '{name}' must declare a prefix")]
    MissingPrefix { name: String },

    #[error("app '{name}' has no reply sink")]
    MissingReplySink { name: String },
}
