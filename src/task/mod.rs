//! Deferred computations with a failure channel and a success channel.
//!
//! A [`Task<E, A>`] describes a computation that, once forked, reports either
//! a failure `E` or a success `A`, at most once. Nothing runs until
//! [`Task::fork`] is called with two continuations; until then a task is an
//! immutable description that combinators wrap into new descriptions.
//!
//! The computation may call its continuations immediately, on the same call
//! stack, or later from another thread. Every combinator works under both
//! disciplines. Scheduling belongs to whoever supplies the computation: a
//! timer, a thread pool, a network client. This module only composes.
//!
//! # Examples
//!
//! ## Recovering and transforming
//!
//! ```rust
//! use lambars_task::task::Task;
//!
//! let task = Task::failed("timeout")
//!     .or_else(|_| Task::<String, _>::succeeded(42))
//!     .map(|x| x + 1);
//!
//! assert_eq!(task.settle_now(), Ok(Ok(43)));
//! ```
//!
//! ## Wrapping a collaborator
//!
//! ```rust
//! use lambars_task::task::Task;
//! use std::thread;
//!
//! let task: Task<String, u32> = Task::new(|_reject, resolve| {
//!     thread::spawn(move || resolve(7));
//! });
//!
//! let (sender, receiver) = std::sync::mpsc::channel();
//! task.map(|n| n * 6).fork(|_| {}, move |n| sender.send(n).unwrap());
//! assert_eq!(receiver.recv().unwrap(), 42);
//! ```
//!
//! ## Racing with cleanup
//!
//! ```rust
//! use lambars_task::task::Task;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let cancelled = Arc::new(AtomicBool::new(false));
//! let flag = Arc::clone(&cancelled);
//! let slow: Task<String, i32> = Task::with_cleanup(|_, _| {}, move || {
//!     flag.store(true, Ordering::SeqCst);
//! });
//!
//! let raced = Task::succeeded(1).concat(slow);
//! assert_eq!(raced.settle_now(), Ok(Ok(1)));
//! assert!(cancelled.load(Ordering::SeqCst));
//! ```

mod cleanup;
mod compose;
mod race;
mod settle;
mod slot;
mod token;

pub use cleanup::Cleanup;
pub use compose::Cases;
pub use settle::SettleError;
pub use token::Token;

#[cfg(feature = "async")]
pub use settle::Settlement;

use std::fmt;

use crate::tracing_compat::trace;

/// The failure continuation handed to a task's computation.
pub type Reject<E> = Box<dyn FnOnce(E) + Send>;

/// The success continuation handed to a task's computation.
pub type Resolve<A> = Box<dyn FnOnce(A) + Send>;

/// The boxed computation: given both continuations, start the work.
type Computation<E, A> = Box<dyn FnOnce(Reject<E>, Resolve<A>) -> Token + Send>;

/// A deferred computation that fails with `E` or succeeds with `A`.
///
/// # Type Parameters
///
/// * `E` - The failure value carried on the rejection channel
/// * `A` - The success value carried on the resolution channel
///
/// # Invariants
///
/// - For one call to [`fork`](Self::fork), at most one of the two
///   continuations is invoked, and at most once.
/// - The attached [`Cleanup`] runs at most once, whichever combinators
///   share it.
///
/// # Laws
///
/// - **Left Identity**: `Task::succeeded(a).chain(f) == f(a)`
/// - **Right Identity**: `m.chain(Task::succeeded) == m`
/// - **Functor Identity**: `m.map(|x| x) == m`
/// - **Functor Composition**: `m.map(f).map(g) == m.map(|x| g(f(x)))`
/// - **Monoid Identity**: `m.concat(Task::never()) == m == Task::never().concat(m)`
///
/// where `==` means both tasks deliver the same outcome when forked.
#[must_use = "a task does nothing until it is forked"]
pub struct Task<E, A> {
    computation: Computation<E, A>,
    cleanup: Cleanup,
}

impl<E: Send + 'static, A: Send + 'static> Task<E, A> {
    /// Wraps a computation supplied by a collaborator.
    ///
    /// The computation receives the failure and success continuations and
    /// returns either `()` or a [`Token`] for collaborator-level cancellation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::new(|_reject, resolve| resolve(42));
    /// assert_eq!(task.settle_now(), Ok(Ok(42)));
    /// ```
    pub fn new<F, T>(computation: F) -> Self
    where
        F: FnOnce(Reject<E>, Resolve<A>) -> T + Send + 'static,
        T: Into<Token>,
    {
        Self::from_parts(
            Box::new(move |reject, resolve| computation(reject, resolve).into()),
            Cleanup::noop(),
        )
    }

    /// Wraps a computation together with the procedure that cancels it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    /// use std::sync::Arc;
    /// use std::sync::atomic::{AtomicBool, Ordering};
    ///
    /// let cancelled = Arc::new(AtomicBool::new(false));
    /// let flag = Arc::clone(&cancelled);
    /// let task: Task<String, i32> = Task::with_cleanup(|_, _| {}, move || {
    ///     flag.store(true, Ordering::SeqCst);
    /// });
    ///
    /// task.release();
    /// assert!(cancelled.load(Ordering::SeqCst));
    /// ```
    pub fn with_cleanup<F, T, C>(computation: F, cleanup: C) -> Self
    where
        F: FnOnce(Reject<E>, Resolve<A>) -> T + Send + 'static,
        T: Into<Token>,
        C: FnOnce() + Send + 'static,
    {
        Self::new(computation).with_cleanup_handle(Cleanup::new(cleanup))
    }

    /// Creates a task that succeeds with `value` as soon as it is forked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(42);
    /// assert_eq!(task.settle_now(), Ok(Ok(42)));
    /// ```
    pub fn succeeded(value: A) -> Self {
        Self::new(move |_reject, resolve: Resolve<A>| resolve(value))
    }

    /// Alias for [`succeeded`](Self::succeeded).
    #[inline]
    pub fn pure(value: A) -> Self {
        Self::succeeded(value)
    }

    /// Creates a task that fails with `error` as soon as it is forked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<&str, i32> = Task::failed("boom");
    /// assert_eq!(task.settle_now(), Ok(Err("boom")));
    /// ```
    pub fn failed(error: E) -> Self {
        Self::new(move |reject: Reject<E>, _resolve| reject(error))
    }

    /// Creates a task that never calls either continuation.
    ///
    /// This is the identity element of [`concat`](Self::concat): racing any
    /// task against it yields that task's outcome.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let raced: Task<String, i32> = Task::never().concat(Task::succeeded(3));
    /// assert_eq!(raced.settle_now(), Ok(Ok(3)));
    /// ```
    pub fn never() -> Self {
        Self::new(|_reject, _resolve| {})
    }

    /// Lifts a `Result` into a task that settles immediately.
    pub fn from_result(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::succeeded(value),
            Err(error) => Self::failed(error),
        }
    }

    /// Starts the computation.
    ///
    /// At most one of `on_failure` and `on_success` is called, at most once,
    /// either before `fork` returns or later from whatever context the
    /// collaborator resolves on. Returns the computation's [`Token`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(21).map(|x| x * 2);
    /// task.fork(|error| panic!("unexpected: {error}"), |value| assert_eq!(value, 42));
    /// ```
    pub fn fork<R, S>(self, on_failure: R, on_success: S) -> Token
    where
        R: FnOnce(E) + Send + 'static,
        S: FnOnce(A) + Send + 'static,
    {
        trace!("forking task");
        self.fork_boxed(Box::new(on_failure), Box::new(on_success))
    }

    /// Forks with continuations that are already boxed, avoiding a second box.
    pub(crate) fn fork_boxed(self, reject: Reject<E>, resolve: Resolve<A>) -> Token {
        (self.computation)(reject, resolve)
    }

    /// Returns a handle to this task's cleanup procedure.
    ///
    /// Keep the handle before forking to be able to cancel afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::with_cleanup(|_, _| {}, || {});
    /// let cleanup = task.cleanup();
    /// task.fork(|_| {}, |_| {});
    /// assert!(cleanup.release());
    /// ```
    pub fn cleanup(&self) -> Cleanup {
        self.cleanup.clone()
    }

    /// Runs this task's cleanup procedure, if it has not run yet.
    ///
    /// Returns `true` if this call ran it.
    pub fn release(&self) -> bool {
        self.cleanup.release()
    }

    /// Replaces the cleanup of this task with `cleanup`.
    pub fn with_cleanup_handle(self, cleanup: Cleanup) -> Self {
        Self {
            computation: self.computation,
            cleanup,
        }
    }

    pub(crate) fn from_parts(computation: Computation<E, A>, cleanup: Cleanup) -> Self {
        Self {
            computation,
            cleanup,
        }
    }

    pub(crate) fn into_parts(self) -> (Computation<E, A>, Cleanup) {
        (self.computation, self.cleanup)
    }
}

// =============================================================================
// Display / Debug
// =============================================================================

impl<E, A> fmt::Display for Task<E, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Task")
    }
}

impl<E, A> fmt::Debug for Task<E, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Task").finish_non_exhaustive()
    }
}
