//! Future over a background JWT operation

use crate::error::{JwtError, JwtResult};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Resolves to the result of a spawned sign or verify
#[must_use = "the operation result is only observed by awaiting it"]
pub struct AsyncJwtResult<T> {
    receiver: oneshot::Receiver<JwtResult<T>>,
}

impl<T: Send + 'static> AsyncJwtResult<T> {
    /// Run `operation` on the blocking pool and resolve to its result
    ///
    /// Outside a Tokio runtime nothing is spawned and the result is
    /// [`JwtError::Internal`].
    pub(crate) fn spawn<F>(operation: F) -> Self
    where
        F: FnOnce() -> JwtResult<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    let _ = tx.send(operation());
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "JWT operation requested outside a Tokio runtime");
                let _ = tx.send(Err(JwtError::internal(format!("no Tokio runtime: {e}"))));
            }
        }
        Self { receiver: rx }
    }
}

impl<T> Future for AsyncJwtResult<T> {
    type Output = JwtResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::internal("JWT task dropped its result"))),
            Poll::Pending => Poll::Pending,
        }
    }
}
