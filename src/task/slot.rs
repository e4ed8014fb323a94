//! A shared, take-once holder for continuations.
//!
//! Combinators such as `chain` and `fold` need the same `FnOnce` continuation
//! reachable from two paths, of which at most one ever runs. The slot lets
//! both paths hold it; whichever takes it first owns it.

use std::sync::Arc;

use crate::sync::Mutex;

pub(crate) struct Slot<T> {
    inner: Arc<Mutex<Option<T>>>,
}

impl<T> Slot<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(value))),
        }
    }

    /// Takes the value out. Every call after the first returns `None`.
    pub(crate) fn take(&self) -> Option<T> {
        // The guard is a temporary, so the lock is released before the
        // caller runs whatever it took out.
        self.inner.lock().take()
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn take_yields_value_once() {
        let slot = Slot::new(5);
        let other = slot.clone();
        assert_eq!(other.take(), Some(5));
        assert_eq!(slot.take(), None);
        assert_eq!(other.take(), None);
    }
}
