//! Algebraic type classes implemented by tasks and cleanups.
//!
//! - [`Semigroup`]: an associative binary operation (`combine`)
//! - [`Monoid`]: a semigroup with an identity element (`empty`)
//!
//! For [`Task`](crate::task::Task), `combine` races two tasks and `empty` is
//! the task that never settles. For [`Cleanup`](crate::task::Cleanup),
//! `combine` releases both procedures and `empty` is the no-op.
//!
//! # Examples
//!
//! ```rust
//! use lambars_task::task::Task;
//! use lambars_task::typeclass::{Monoid, Semigroup};
//!
//! let first: Task<String, i32> = Task::never();
//! let raced = first.combine(Task::succeeded(2));
//! assert_eq!(raced.settle_now(), Ok(Ok(2)));
//!
//! let none: Vec<Task<String, i32>> = Vec::new();
//! assert!(Task::combine_all(none).settle_now().is_err());
//! ```

mod monoid;
mod semigroup;

pub use monoid::Monoid;
pub use semigroup::Semigroup;
