//! # lambars-task
//!
//! A deferred computation with a failure channel and a success channel,
//! composed without committing to any scheduler.
//!
//! ## Overview
//!
//! A [`Task<E, A>`](task::Task) wraps a procedure that, once forked with two
//! continuations, delivers at most one outcome. Combinators build new tasks
//! around existing ones:
//!
//! - **Transformation**: `map`, `bimap`, `rejected_map`, `swap`
//! - **Sequencing**: `chain`, `ap`, `or_else`
//! - **Collapsing**: `fold`, `cata`
//! - **Racing**: `concat`, with [`never`](task::Task::never) as its identity
//!
//! Every task may carry a [`Cleanup`](task::Cleanup). Racing releases the
//! losing branch's cleanup exactly once, before the winner's outcome is
//! delivered.
//!
//! ## Feature Flags
//!
//! - `typeclass`: `Semigroup` and `Monoid` implementations for tasks and cleanups
//! - `async`: `IntoFuture` for tasks, backed by `futures`
//! - `tracing`: debug and trace events through the `tracing` crate
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use lambars_task::prelude::*;
//!
//! let task: Task<String, i32> = Task::succeeded(20)
//!     .chain(|x| Task::succeeded(x * 2))
//!     .map(|x| x + 2);
//!
//! assert_eq!(task.settle_now(), Ok(Ok(42)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use lambars_task::prelude::*;
/// ```
pub mod prelude {
    pub use crate::task::*;

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;
}

pub mod task;

#[cfg(feature = "typeclass")]
pub mod typeclass;

mod sync;
mod tracing_compat;
