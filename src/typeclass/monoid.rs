//! Monoid type class - semigroups with an identity element.
//!
//! # Laws
//!
//! For all `a` of type `T`:
//!
//! ## Left Identity
//!
//! ```text
//! T::empty().combine(a) == a
//! ```
//!
//! ## Right Identity
//!
//! ```text
//! a.combine(T::empty()) == a
//! ```

use super::semigroup::Semigroup;
use crate::task::Cleanup;

/// A type class for semigroups with an identity element.
///
/// # Examples
///
/// ```rust
/// use lambars_task::task::Task;
/// use lambars_task::typeclass::{Monoid, Semigroup};
///
/// let task: Task<String, i32> = Task::succeeded(5);
/// assert_eq!(task.combine(Task::empty()).settle_now(), Ok(Ok(5)));
/// ```
pub trait Monoid: Semigroup {
    /// Returns the identity element for this monoid.
    fn empty() -> Self;

    /// Combines all elements in an iterator, starting from the identity element.
    ///
    /// Unlike [`Semigroup::reduce_all`], this method always returns a value
    /// (the identity element for empty iterators).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    /// use lambars_task::typeclass::Monoid;
    ///
    /// let tasks = (1..=3).map(|n| Task::<String, i32>::succeeded(n));
    /// assert_eq!(Task::combine_all(tasks).settle_now(), Ok(Ok(1)));
    /// ```
    fn combine_all<I>(iterator: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .fold(Self::empty(), |accumulator, element| {
                accumulator.combine(element)
            })
    }
}

// =============================================================================
// Cleanup Implementation
// =============================================================================

/// The no-op cleanup is the identity of combination.
impl Monoid for Cleanup {
    fn empty() -> Self {
        Self::noop()
    }
}
