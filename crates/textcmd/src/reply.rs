/// What a handler hands back.
///
/// `message` becomes the reply text. `context`, when set, replaces the
/// context that was threaded into the handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<C> {
    pub message: Option<String>,
    pub context: Option<C>,
}

impl<C> Reply<C> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            context: None,
        }
    }

    /// Replace the context without sending any text.
    pub fn context(context: C) -> Self {
        Self {
            message: None,
            context: Some(context),
        }
    }

    pub fn with_context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_none() && self.context.is_none()
    }
}

impl<C> From<String> for Reply<C> {
    fn from(message: String) -> Self {
        Self::message(message)
    }
}

impl<C> From<&str> for Reply<C> {
    fn from(message: &str) -> Self {
        Self::message(message)
    }
}

/// Receives every reply an `App` produces.
pub trait ReplySink<C>: Send + Sync {
    fn reply(&self, message: String, context: C);
}

impl<C, F> ReplySink<C> for F
where
    F: Fn(String, C) + Send + Sync,
{
    fn reply(&self, message: String, context: C) {
        self(message, context)
    }
}
