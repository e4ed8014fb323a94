//! Observing the outcome of a task from outside the continuation protocol.
//!
//! [`Task::settle_now`] forks a task and reports what it delivered before
//! `fork` returned, which covers tasks built from already-known values.
//! With the `async` feature, a task implements [`std::future::IntoFuture`],
//! so code that already lives on an executor can `.await` it.

use std::fmt;
use std::sync::Arc;

use super::Task;
use crate::sync::Mutex;

/// Errors returned when a task's outcome cannot be observed.
///
/// # Examples
///
/// ```rust
/// use lambars_task::task::{SettleError, Task};
///
/// let task: Task<String, i32> = Task::never();
/// assert_eq!(task.settle_now(), Err(SettleError::Abandoned));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettleError {
    /// The computation still holds its continuations and may settle later.
    Pending,
    /// The computation dropped both continuations without calling either.
    Abandoned,
}

impl fmt::Display for SettleError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(
                formatter,
                "Task::settle_now: task has not settled yet. Fork it with continuations instead."
            ),
            Self::Abandoned => write!(
                formatter,
                "Task: computation dropped its continuations without settling."
            ),
        }
    }
}

impl std::error::Error for SettleError {}

impl<E: Send + 'static, A: Send + 'static> Task<E, A> {
    /// Forks this task and returns the outcome if it was delivered before
    /// `fork` returned.
    ///
    /// # Errors
    ///
    /// - [`SettleError::Pending`] if the computation still holds a continuation,
    ///   for example because a collaborator will resolve it from another thread.
    ///   That later outcome is discarded.
    /// - [`SettleError::Abandoned`] if the computation dropped both
    ///   continuations without calling either, as [`Task::never`] does.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(20).map(|x| x + 22);
    /// assert_eq!(task.settle_now(), Ok(Ok(42)));
    /// ```
    pub fn settle_now(self) -> Result<Result<A, E>, SettleError> {
        let cell: Arc<Mutex<Option<Result<A, E>>>> = Arc::new(Mutex::new(None));
        let on_failure = Arc::clone(&cell);
        let on_success = Arc::clone(&cell);

        self.fork_boxed(
            Box::new(move |error| {
                on_failure.lock().get_or_insert(Err(error));
            }),
            Box::new(move |value| {
                on_success.lock().get_or_insert(Ok(value));
            }),
        );

        // Count the holders before looking: continuations are dropped only
        // after they store their outcome.
        let holders = Arc::strong_count(&cell);
        let outcome = cell.lock().take();
        match outcome {
            Some(outcome) => Ok(outcome),
            None if holders == 1 => Err(SettleError::Abandoned),
            None => Err(SettleError::Pending),
        }
    }
}

#[cfg(feature = "async")]
pub use self::bridge::Settlement;

#[cfg(feature = "async")]
mod bridge {
    use std::future::{Future, IntoFuture};
    use std::mem;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use futures::FutureExt;
    use futures::channel::oneshot;

    use super::SettleError;
    use crate::task::slot::Slot;
    use crate::task::{Cleanup, Task};
    use crate::tracing_compat::debug;

    enum Stage<E, A> {
        Idle(Task<E, A>),
        Waiting(oneshot::Receiver<Result<A, E>>),
        Done,
    }

    /// A future that forks a task on first poll and resolves to its outcome.
    ///
    /// Created by `Task::into_future`. Dropping a `Settlement` after it has
    /// started but before the task has settled releases the task's cleanup,
    /// so abandoning the future cancels the work behind it. Once the task has
    /// delivered an outcome, dropping it releases nothing.
    #[must_use = "futures do nothing unless polled"]
    pub struct Settlement<E, A> {
        stage: Stage<E, A>,
        cleanup: Cleanup,
    }

    /// Adapts a task into a future, so it can be `.await`ed.
    ///
    /// The task is forked on the first poll. The future's output is the
    /// task's outcome, or [`SettleError::Abandoned`] if the computation
    /// drops both continuations without settling.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(41).map(|x| x + 1);
    /// let outcome = futures::executor::block_on(async { task.await });
    /// assert_eq!(outcome, Ok(Ok(42)));
    /// ```
    impl<E: Send + 'static, A: Send + 'static> IntoFuture for Task<E, A> {
        type Output = Result<Result<A, E>, SettleError>;
        type IntoFuture = Settlement<E, A>;

        fn into_future(self) -> Settlement<E, A> {
            let cleanup = self.cleanup();
            Settlement {
                stage: Stage::Idle(self),
                cleanup,
            }
        }
    }

    fn start<E, A>(task: Task<E, A>) -> oneshot::Receiver<Result<A, E>>
    where
        E: Send + 'static,
        A: Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let on_failure = Slot::new(sender);
        let on_success = on_failure.clone();
        task.fork_boxed(
            Box::new(move |error| {
                if let Some(sender) = on_failure.take() {
                    // The receiver is gone only if the settlement was dropped.
                    let _ = sender.send(Err(error));
                }
            }),
            Box::new(move |value| {
                if let Some(sender) = on_success.take() {
                    let _ = sender.send(Ok(value));
                }
            }),
        );
        receiver
    }

    impl<E: Send + 'static, A: Send + 'static> Future for Settlement<E, A> {
        type Output = Result<Result<A, E>, SettleError>;

        fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
            let this = self.get_mut();
            loop {
                match mem::replace(&mut this.stage, Stage::Done) {
                    Stage::Idle(task) => {
                        this.stage = Stage::Waiting(start(task));
                    }
                    Stage::Waiting(mut receiver) => {
                        return match receiver.poll_unpin(context) {
                            Poll::Pending => {
                                this.stage = Stage::Waiting(receiver);
                                Poll::Pending
                            }
                            Poll::Ready(Ok(outcome)) => Poll::Ready(Ok(outcome)),
                            Poll::Ready(Err(oneshot::Canceled)) => {
                                Poll::Ready(Err(SettleError::Abandoned))
                            }
                        };
                    }
                    Stage::Done => panic!("Settlement polled after completion"),
                }
            }
        }
    }

    impl<E, A> Drop for Settlement<E, A> {
        fn drop(&mut self) {
            // An outcome sent but never polled still counts as settled.
            if let Stage::Waiting(receiver) = &mut self.stage
                && matches!(receiver.try_recv(), Ok(None))
            {
                debug!("settlement dropped before the task settled, releasing it");
                self.cleanup.release();
            }
        }
    }
}
