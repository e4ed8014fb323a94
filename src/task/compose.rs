//! Transforming and sequencing combinators.
//!
//! Every combinator consumes a task and returns a new one whose computation
//! wraps the original. Cleanup is carried over unchanged: ownership of the
//! release procedure stays with the original computation until something
//! races it.
//!
//! Transform functions run synchronously inside the continuation that
//! delivers their input. A panic in one unwinds out of that continuation; it
//! is never turned into a failure value.

use super::slot::Slot;
use super::{Reject, Resolve, Task};

/// The two branches of [`Task::cata`], as named fields.
///
/// # Examples
///
/// ```rust
/// use lambars_task::task::{Cases, Task};
///
/// let task: Task<String, i32> = Task::failed(String::from("lost"));
/// let folded: Task<(), String> = task.cata(Cases {
///     failed: |error: String| format!("failed: {error}"),
///     succeeded: |value: i32| format!("got {value}"),
/// });
/// assert_eq!(folded.settle_now(), Ok(Ok(String::from("failed: lost"))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cases<F, G> {
    /// Applied to the failure value.
    pub failed: F,
    /// Applied to the success value.
    pub succeeded: G,
}

impl<E: Send + 'static, A: Send + 'static> Task<E, A> {
    /// Applies `function` to the success value. Failures pass through.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(21).map(|x| x * 2);
    /// assert_eq!(task.settle_now(), Ok(Ok(42)));
    /// ```
    pub fn map<B, F>(self, function: F) -> Task<E, B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> B + Send + 'static,
    {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |reject: Reject<E>, resolve: Resolve<B>| {
                computation(reject, Box::new(move |value: A| resolve(function(value))))
            }),
            cleanup,
        )
    }

    /// Runs the task returned by `function` once this one succeeds.
    ///
    /// `function` is only called from inside the success continuation, so the
    /// next task is not even built until this one has succeeded. A failure
    /// short-circuits.
    ///
    /// Only this task's cleanup is carried over. The task returned by
    /// `function` runs without one, so releasing the chained task cannot
    /// cancel that second step.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(10).chain(|x| Task::succeeded(x + 1));
    /// assert_eq!(task.settle_now(), Ok(Ok(11)));
    ///
    /// let short: Task<String, i32> = Task::failed(String::from("stop"))
    ///     .chain(|x: i32| Task::succeeded(x + 1));
    /// assert_eq!(short.settle_now(), Ok(Err(String::from("stop"))));
    /// ```
    pub fn chain<B, F>(self, function: F) -> Task<E, B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Task<E, B> + Send + 'static,
    {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |reject: Reject<E>, resolve: Resolve<B>| {
                let reject = Slot::new(reject);
                let reject_next = reject.clone();
                computation(
                    Box::new(move |error: E| {
                        if let Some(reject) = reject.take() {
                            reject(error);
                        }
                    }),
                    Box::new(move |value: A| {
                        if let Some(reject) = reject_next.take() {
                            function(value).fork_boxed(reject, resolve);
                        }
                    }),
                )
            }),
            cleanup,
        )
    }

    /// Alias for [`chain`](Self::chain).
    #[inline]
    pub fn and_then<B, F>(self, function: F) -> Task<E, B>
    where
        B: Send + 'static,
        F: FnOnce(A) -> Task<E, B> + Send + 'static,
    {
        self.chain(function)
    }

    /// Runs `next` after this task succeeds, discarding this task's value.
    pub fn then<B>(self, next: Task<E, B>) -> Task<E, B>
    where
        B: Send + 'static,
    {
        self.chain(move |_| next)
    }

    /// Combines the values of two tasks with `function`.
    ///
    /// `self` is run to completion before `other` is forked.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let sum: Task<String, i32> = Task::succeeded(1).map2(Task::succeeded(2), |a, b| a + b);
    /// assert_eq!(sum.settle_now(), Ok(Ok(3)));
    /// ```
    pub fn map2<B, C, F>(self, other: Task<E, B>, function: F) -> Task<E, C>
    where
        B: Send + 'static,
        C: Send + 'static,
        F: FnOnce(A, B) -> C + Send + 'static,
    {
        self.chain(move |first| other.map(move |second| function(first, second)))
    }

    /// Replaces a failure with the task returned by `function`.
    ///
    /// The mirror of [`chain`](Self::chain): successes pass through unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::failed("timeout")
    ///     .or_else(|_| Task::succeeded(42));
    /// assert_eq!(task.settle_now(), Ok(Ok(42)));
    /// ```
    pub fn or_else<X, F>(self, function: F) -> Task<X, A>
    where
        X: Send + 'static,
        F: FnOnce(E) -> Task<X, A> + Send + 'static,
    {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |reject: Reject<X>, resolve: Resolve<A>| {
                let resolve = Slot::new(resolve);
                let resolve_next = resolve.clone();
                computation(
                    Box::new(move |error: E| {
                        if let Some(resolve) = resolve_next.take() {
                            function(error).fork_boxed(reject, resolve);
                        }
                    }),
                    Box::new(move |value: A| {
                        if let Some(resolve) = resolve.take() {
                            resolve(value);
                        }
                    }),
                )
            }),
            cleanup,
        )
    }

    /// Collapses both channels into the success channel.
    ///
    /// The resulting task never fails, so its failure type is free.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::failed(String::from("oops"));
    /// let folded: Task<(), usize> = task.fold(|error| error.len(), |value| value as usize);
    /// assert_eq!(folded.settle_now(), Ok(Ok(4)));
    /// ```
    pub fn fold<X, B, F, G>(self, on_failure: F, on_success: G) -> Task<X, B>
    where
        X: Send + 'static,
        B: Send + 'static,
        F: FnOnce(E) -> B + Send + 'static,
        G: FnOnce(A) -> B + Send + 'static,
    {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |_reject: Reject<X>, resolve: Resolve<B>| {
                let resolve = Slot::new(resolve);
                let resolve_success = resolve.clone();
                computation(
                    Box::new(move |error: E| {
                        if let Some(resolve) = resolve.take() {
                            resolve(on_failure(error));
                        }
                    }),
                    Box::new(move |value: A| {
                        if let Some(resolve) = resolve_success.take() {
                            resolve(on_success(value));
                        }
                    }),
                )
            }),
            cleanup,
        )
    }

    /// [`fold`](Self::fold) with the two functions given as a [`Cases`] record.
    pub fn cata<X, B, F, G>(self, cases: Cases<F, G>) -> Task<X, B>
    where
        X: Send + 'static,
        B: Send + 'static,
        F: FnOnce(E) -> B + Send + 'static,
        G: FnOnce(A) -> B + Send + 'static,
    {
        self.fold(cases.failed, cases.succeeded)
    }

    /// Exchanges the failure and success channels.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<String, i32> = Task::succeeded(1);
    /// assert_eq!(task.swap().settle_now(), Ok(Err(1)));
    /// ```
    pub fn swap(self) -> Task<A, E> {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |reject: Reject<A>, resolve: Resolve<E>| computation(resolve, reject)),
            cleanup,
        )
    }

    /// Applies `on_failure` to failures and `on_success` to successes.
    ///
    /// Unlike [`fold`](Self::fold), each value stays on its own channel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<i32, i32> = Task::failed(2);
    /// let mapped = task.bimap(|e| e.to_string(), |v| v * 10);
    /// assert_eq!(mapped.settle_now(), Ok(Err(String::from("2"))));
    /// ```
    pub fn bimap<X, B, F, G>(self, on_failure: F, on_success: G) -> Task<X, B>
    where
        X: Send + 'static,
        B: Send + 'static,
        F: FnOnce(E) -> X + Send + 'static,
        G: FnOnce(A) -> B + Send + 'static,
    {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |reject: Reject<X>, resolve: Resolve<B>| {
                computation(
                    Box::new(move |error: E| reject(on_failure(error))),
                    Box::new(move |value: A| resolve(on_success(value))),
                )
            }),
            cleanup,
        )
    }

    /// Applies `function` to the failure value. Successes pass through.
    ///
    /// The dual of [`map`](Self::map).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let task: Task<&str, i32> = Task::failed("io");
    /// let task = task.rejected_map(|e| format!("wrapped: {e}"));
    /// assert_eq!(task.settle_now(), Ok(Err(String::from("wrapped: io"))));
    /// ```
    pub fn rejected_map<X, F>(self, function: F) -> Task<X, A>
    where
        X: Send + 'static,
        F: FnOnce(E) -> X + Send + 'static,
    {
        let (computation, cleanup) = self.into_parts();
        Task::from_parts(
            Box::new(move |reject: Reject<X>, resolve: Resolve<A>| {
                computation(Box::new(move |error: E| reject(function(error))), resolve)
            }),
            cleanup,
        )
    }
}

impl<E: Send + 'static, F: Send + 'static> Task<E, F> {
    /// Applies the function this task produces to the value `argument` produces.
    ///
    /// The function task resolves completely before `argument` is forked;
    /// the two never run in parallel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// fn increment(x: i32) -> i32 {
    ///     x + 1
    /// }
    ///
    /// let function: Task<String, fn(i32) -> i32> = Task::succeeded(increment);
    /// let applied = function.ap(Task::succeeded(41));
    /// assert_eq!(applied.settle_now(), Ok(Ok(42)));
    /// ```
    pub fn ap<A, B>(self, argument: Task<E, A>) -> Task<E, B>
    where
        A: Send + 'static,
        B: Send + 'static,
        F: FnOnce(A) -> B,
    {
        self.chain(move |function| argument.map(function))
    }
}
