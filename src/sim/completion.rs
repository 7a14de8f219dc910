//! One-shot completion signals
//!
//! An animation owner keeps the [`Completion`] and resolves it when the
//! animation has fully run; callers hold a [`CompletionFuture`] they can
//! `.await`, join with other completions, or check with
//! [`CompletionFuture::is_resolved`] from a frame loop.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::Shared;

/// Resolver side of a completion
#[derive(Debug)]
pub struct Completion {
    sender: oneshot::Sender<()>,
    future: CompletionFuture,
}

/// Awaitable side of a completion; cheap to clone
#[derive(Clone)]
pub struct CompletionFuture {
    inner: Shared<oneshot::Receiver<()>>,
}

/// Create a linked resolver/future pair
pub fn completion() -> (Completion, CompletionFuture) {
    let (sender, receiver) = oneshot::channel();
    let future = CompletionFuture {
        inner: receiver.shared(),
    };
    (
        Completion {
            sender,
            future: future.clone(),
        },
        future,
    )
}

impl Completion {
    /// Another future for the same completion
    pub fn future(&self) -> CompletionFuture {
        self.future.clone()
    }

    /// Mark complete and wake every waiter
    pub fn resolve(self) {
        // Every receiver may already be gone; nothing is waiting then
        let _ = self.sender.send(());
    }
}

impl CompletionFuture {
    /// A future that is already complete
    pub fn ready() -> Self {
        let (completion, future) = completion();
        completion.resolve();
        future
    }

    /// Non-blocking check for frame loops.
    ///
    /// A dropped resolver also counts as resolved: the animation it guarded
    /// no longer exists.
    pub fn is_resolved(&self) -> bool {
        self.inner.peek().is_some() || self.inner.clone().now_or_never().is_some()
    }
}

impl Future for CompletionFuture {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.inner.poll_unpin(cx).map(|_| ())
    }
}

impl fmt::Debug for CompletionFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionFuture")
            .field("resolved", &self.inner.peek().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::task::Waker;

    fn poll_once<F: Future + Unpin>(future: &mut F) -> Poll<F::Output> {
        let mut cx = Context::from_waker(Waker::noop());
        Pin::new(future).poll(&mut cx)
    }

    #[test]
    fn test_pending_until_resolved() {
        let (completion, mut future) = completion();
        assert_eq!(poll_once(&mut future), Poll::Pending);
        assert!(!future.is_resolved());

        completion.resolve();
        assert!(future.is_resolved());
        assert_eq!(poll_once(&mut future), Poll::Ready(()));
    }

    #[test]
    fn test_clones_share_state() {
        let (completion, future) = completion();
        let mut other = future.clone();
        let mut third = completion.future();
        completion.resolve();
        assert_eq!(poll_once(&mut other), Poll::Ready(()));
        assert_eq!(poll_once(&mut third), Poll::Ready(()));
    }

    #[test]
    fn test_ready_future() {
        let mut future = CompletionFuture::ready();
        assert!(future.is_resolved());
        assert_eq!(poll_once(&mut future), Poll::Ready(()));
    }

    #[test]
    fn test_dropped_resolver_counts_as_resolved() {
        let (completion, future) = completion();
        drop(completion);
        assert!(future.is_resolved());
    }

    #[test]
    fn test_join_waits_for_every_completion() {
        let (first, a) = completion();
        let (second, b) = completion();
        let mut joined = join_all(vec![a, b]);

        first.resolve();
        assert!(poll_once(&mut joined).is_pending());
        second.resolve();
        assert!(poll_once(&mut joined).is_ready());
    }
}
