//! Synchronization primitives used by the race latch and the cleanup guard.
//!
//! Normal builds use [`parking_lot::Mutex`]. Under `--cfg loom` the same API is
//! backed by `loom::sync::Mutex` so the race protocol can be model-checked:
//!
//! ```bash
//! RUSTFLAGS="--cfg loom" cargo test --test race_loom --release
//! ```

#[cfg(not(loom))]
pub(crate) use parking_lot::Mutex;

#[cfg(loom)]
pub(crate) use self::loom_mutex::Mutex;

#[cfg(loom)]
mod loom_mutex {
    use std::sync::PoisonError;

    /// `loom::sync::Mutex` with the non-poisoning `lock` signature of `parking_lot`.
    pub(crate) struct Mutex<T>(loom::sync::Mutex<T>);

    impl<T> Mutex<T> {
        pub(crate) fn new(value: T) -> Self {
            Self(loom::sync::Mutex::new(value))
        }

        pub(crate) fn lock(&self) -> loom::sync::MutexGuard<'_, T> {
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
