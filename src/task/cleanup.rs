//! Once-guarded release procedures attached to tasks.

use std::fmt;
use std::sync::Arc;

use crate::sync::Mutex;
use crate::tracing_compat::trace;

pub(crate) type Action = Box<dyn FnOnce() + Send>;

/// A handle to the cleanup procedure of a task.
///
/// Cleanup cancels in-flight work or frees resources held by a pending
/// computation. A `Cleanup` is cheap to clone and every clone refers to the
/// same procedure, which runs at most once no matter how many clones call
/// [`release`](Self::release), or from which threads.
///
/// The default cleanup is a no-op.
///
/// # Examples
///
/// ```rust
/// use lambars_task::task::Cleanup;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let released = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&released);
/// let cleanup = Cleanup::new(move || {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// assert!(cleanup.release());
/// assert!(!cleanup.clone().release());
/// assert_eq!(released.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone, Default)]
pub struct Cleanup {
    action: Option<Arc<Mutex<Option<Action>>>>,
}

impl Cleanup {
    /// Creates a cleanup that runs `action` the first time it is released.
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            action: Some(Arc::new(Mutex::new(Some(Box::new(action))))),
        }
    }

    /// Returns the cleanup that does nothing.
    #[must_use]
    pub const fn noop() -> Self {
        Self { action: None }
    }

    /// Returns `true` if this cleanup has no procedure attached.
    pub const fn is_noop(&self) -> bool {
        self.action.is_none()
    }

    /// Returns `true` if the procedure has already run or been discarded.
    ///
    /// A no-op cleanup is never considered released.
    pub fn is_released(&self) -> bool {
        self.action
            .as_ref()
            .is_some_and(|action| action.lock().is_none())
    }

    /// Runs the procedure if no clone has run it yet.
    ///
    /// Returns `true` if this call ran it.
    pub fn release(&self) -> bool {
        let Some(slot) = self.action.as_ref() else {
            return false;
        };
        let action = slot.lock().take();
        action.is_some_and(|action| {
            trace!("running task cleanup");
            action();
            true
        })
    }

    /// Discards the procedure without running it, so every later release is
    /// a no-op.
    ///
    /// The discarded procedure is handed back so the caller can drop it after
    /// releasing its own locks.
    pub(crate) fn disarm(&self) -> Option<Action> {
        self.action.as_ref()?.lock().take()
    }

    /// Combines two cleanups into one that releases both, `self` first.
    ///
    /// A no-op side is dropped, so combining with [`Cleanup::noop`] returns the
    /// other cleanup unchanged.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self.is_noop(), other.is_noop()) {
            (_, true) => self,
            (true, false) => other,
            (false, false) => Self::new(move || {
                self.release();
                other.release();
            }),
        }
    }

    /// Returns `true` if both handles refer to the same procedure.
    ///
    /// Two no-op cleanups are equivalent.
    pub fn same_as(&self, other: &Self) -> bool {
        match (&self.action, &other.action) {
            (Some(left), Some(right)) => Arc::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Cleanup")
            .field("is_noop", &self.is_noop())
            .field("is_released", &self.is_released())
            .finish()
    }
}
