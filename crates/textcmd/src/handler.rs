use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use textcmd_argparse::Argv;

use crate::reply::{Reply, ReplySink};

pub type SyncFn<C> = dyn Fn(&Argv, &C) -> Option<Reply<C>> + Send + Sync;
pub type AsyncFn<C> =
    dyn Fn(Argv, C) -> BoxFuture<'static, anyhow::Result<Option<Reply<C>>>> + Send + Sync;
pub type CallbackFn<C> = dyn Fn(&Argv, &C, Done<C>) + Send + Sync;

/// How a command's handler is invoked. Fixed when the command is built.
pub enum Handler<C> {
    /// Returns its reply directly.
    Sync(Arc<SyncFn<C>>),
    /// Returns a future; an `Err` becomes a generic error reply.
    Async(Arc<AsyncFn<C>>),
    /// Deprecated: reports through a [`Done`] completion.
    Callback(Arc<CallbackFn<C>>),
}

impl<C> Handler<C> {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&Argv, &C) -> Option<Reply<C>> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(Argv, C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<Reply<C>>>> + Send + 'static,
    {
        Self::Async(Arc::new(
            move |argv: Argv, context: C| -> BoxFuture<'static, anyhow::Result<Option<Reply<C>>>> {
                f(argv, context).boxed()
            },
        ))
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Argv, &C, Done<C>) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sync(_) => "sync",
            Self::Async(_) => "async",
            Self::Callback(_) => "callback",
        }
    }
}

impl<C> Clone for Handler<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(f) => Self::Sync(Arc::clone(f)),
            Self::Async(f) => Self::Async(Arc::clone(f)),
            Self::Callback(f) => Self::Callback(Arc::clone(f)),
        }
    }
}

impl<C> fmt::Debug for Handler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler::{}", self.kind())
    }
}

/// Completion handed to callback handlers.
///
/// Consumed by [`Done::reply`], so it fires at most once. Dropping it without
/// replying sends nothing.
pub struct Done<C> {
    command: String,
    context: C,
    sink: Arc<dyn ReplySink<C>>,
}

impl<C> Done<C> {
    pub(crate) fn new(command: String, context: C, sink: Arc<dyn ReplySink<C>>) -> Self {
        Self {
            command,
            context,
            sink,
        }
    }

    /// Reply with `message`, replacing the context when `context` is `Some`.
    pub fn reply(self, message: impl Into<String>, context: Option<C>) {
        tracing::debug!(command = %self.command, "callback handler completed");
        self.sink
            .reply(message.into(), context.unwrap_or(self.context));
    }
}

impl<C> fmt::Debug for Done<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}
