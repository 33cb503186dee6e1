/// A line that cannot be handed to the parser at all.
///
/// Returned to the caller of `App::parse_input` rather than replied, since it
/// means the line was not meant for this app.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("input does not start with the prefix '{prefix}'")]
    MissingPrefix { prefix: String },
}
