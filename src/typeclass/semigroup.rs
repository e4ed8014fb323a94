//! Semigroup type class - types with an associative binary operation.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ## Associativity
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! For tasks, `==` means "delivers the same outcome when forked": racing is
//! associative because the first branch to settle wins however the races are
//! nested.

use crate::task::Cleanup;

/// A type class for types with an associative binary operation.
///
/// # Examples
///
/// ```rust
/// use lambars_task::task::Task;
/// use lambars_task::typeclass::Semigroup;
///
/// let raced: Task<String, i32> = Task::failed(String::from("first")).combine(Task::succeeded(2));
/// assert_eq!(raced.settle_now(), Ok(Err(String::from("first"))));
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    ///
    /// This operation must be associative.
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Reduces all elements in an iterator using the semigroup operation.
    ///
    /// Returns `None` if the iterator is empty.
    /// For a version that returns a default value for empty iterators, see
    /// [`Monoid::combine_all`](super::Monoid::combine_all).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    /// use lambars_task::typeclass::Semigroup;
    ///
    /// let tasks: Vec<Task<String, i32>> = vec![Task::never(), Task::succeeded(7)];
    /// let raced = Task::reduce_all(tasks).unwrap();
    /// assert_eq!(raced.settle_now(), Ok(Ok(7)));
    /// ```
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}

// =============================================================================
// Cleanup Implementation
// =============================================================================

/// Combining cleanups releases both, left first.
impl Semigroup for Cleanup {
    fn combine(self, other: Self) -> Self {
        self.and(other)
    }
}
