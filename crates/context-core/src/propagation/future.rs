use super::context::CapturedContext;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that runs every poll under the context captured when it was
/// created, whichever runtime worker polls it.
#[must_use = "futures do nothing unless polled"]
pub struct Propagated<F> {
    context: CapturedContext,
    inner: Pin<Box<F>>,
}

impl<F: Future> Propagated<F> {
    pub fn new(future: F) -> Self {
        Self::with_context(future, CapturedContext::capture())
    }

    pub fn with_context(future: F, context: CapturedContext) -> Self {
        Self {
            context,
            inner: Box::pin(future),
        }
    }

    pub fn context(&self) -> &CapturedContext {
        &self.context
    }
}

impl<F: Future> Future for Propagated<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.context.is_empty() {
            return this.inner.as_mut().poll(cx);
        }
        let _guard = this.context.transmit();
        this.inner.as_mut().poll(cx)
    }
}

/// Attach the caller's trace context to a future
pub trait FutureExt: Future + Sized {
    fn in_current_context(self) -> Propagated<Self> {
        Propagated::new(self)
    }
}

impl<F: Future> FutureExt for F {}

/// `tokio::spawn` carrying the caller's trace context into the task
#[cfg(feature = "tokio")]
pub fn spawn_async<F>(future: F) -> tokio::task::JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(Propagated::new(future))
}
