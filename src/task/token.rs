//! Opaque cancellation tokens returned from forking a task.

use std::any::Any;
use std::fmt;

/// An opaque value returned by a task's computation when it is forked.
///
/// The token is whatever the collaborator that built the task chose to hand
/// back (a timer id, a join handle, a request key). Combinators never look
/// inside it; they only pass it through so that collaborator-level code can
/// implement its own cancellation patterns.
///
/// # Examples
///
/// ```rust
/// use lambars_task::task::{Task, Token};
///
/// let task: Task<String, i32> = Task::new(|_reject, resolve| {
///     resolve(1);
///     Token::new(7_u64)
/// });
///
/// let token = task.fork(|_| {}, |_| {});
/// assert_eq!(token.downcast_ref::<u64>(), Some(&7));
/// ```
#[derive(Default)]
pub struct Token {
    value: Option<Box<dyn Any + Send>>,
}

impl Token {
    /// Wraps a value as a token.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Some(Box::new(value)),
        }
    }

    /// Returns the empty token, handed back by computations with nothing to share.
    #[must_use]
    pub const fn none() -> Self {
        Self { value: None }
    }

    /// Returns `true` if this token carries no value.
    pub const fn is_none(&self) -> bool {
        self.value.is_none()
    }

    /// Borrows the carried value if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_ref()?.downcast_ref::<T>()
    }

    /// Extracts the carried value if it has type `T`.
    ///
    /// # Errors
    ///
    /// Returns the token unchanged if it is empty or carries another type.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        match self.value {
            Some(value) => value
                .downcast::<T>()
                .map(|boxed| *boxed)
                .map_err(|value| Self { value: Some(value) }),
            None => Err(Self::none()),
        }
    }
}

impl From<()> for Token {
    fn from((): ()) -> Self {
        Self::none()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Token")
            .field("is_none", &self.is_none())
            .finish()
    }
}
