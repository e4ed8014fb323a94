//! Racing two tasks against each other.
//!
//! Both branches are forked; the first to settle decides the outcome and the
//! other branch's cleanup is released before that outcome is delivered.
//!
//! The decision is latched in a `Race` owned by a single fork. It moves
//! through these states:
//!
//! ```text
//! Starting --settle--> Latched --both forked--> Decided
//!    |                                             ^
//!    +--both forked--> Running --settle------------+
//! ```
//!
//! An outcome that arrives while the branches are still being forked is held
//! in `Latched` so that no outcome is observable before both forks happened.
//! Any settle after the latch closes is ignored.
//!
//! Leaving `Starting` or `Running` also disarms the combined task's cleanup,
//! so releasing the raced task after its outcome is known does nothing.

use std::mem;
use std::sync::Arc;

use super::{Cleanup, Reject, Resolve, Task, Token};
use crate::sync::Mutex;
use crate::tracing_compat::debug;

#[cfg(feature = "typeclass")]
use crate::typeclass::{Monoid, Semigroup};

enum RaceState<E, A> {
    /// Branches are still being forked and nothing has settled.
    Starting {
        reject: Reject<E>,
        resolve: Resolve<A>,
    },
    /// A branch settled before the other one was forked.
    Latched {
        reject: Reject<E>,
        resolve: Resolve<A>,
        outcome: Result<A, E>,
        loser: Cleanup,
    },
    /// Both branches are forked and nothing has settled.
    Running {
        reject: Reject<E>,
        resolve: Resolve<A>,
    },
    /// The outcome has been delivered or is being delivered.
    Decided,
}

struct Race<E, A> {
    state: Mutex<RaceState<E, A>>,
    /// The raced task's own cleanup, disarmed once the outcome is latched.
    combined: Cleanup,
}

impl<E, A> Race<E, A> {
    fn new(reject: Reject<E>, resolve: Resolve<A>, combined: Cleanup) -> Self {
        Self {
            state: Mutex::new(RaceState::Starting { reject, resolve }),
            combined,
        }
    }

    /// Records the outcome of one branch. `loser` is the other branch's cleanup.
    fn settle(&self, outcome: Result<A, E>, loser: Cleanup) {
        let mut state = self.state.lock();
        match mem::replace(&mut *state, RaceState::Decided) {
            RaceState::Starting { reject, resolve } => {
                let disarmed = self.combined.disarm();
                *state = RaceState::Latched {
                    reject,
                    resolve,
                    outcome,
                    loser,
                };
                drop(state);
                drop(disarmed);
            }
            RaceState::Running { reject, resolve } => {
                let disarmed = self.combined.disarm();
                drop(state);
                drop(disarmed);
                debug!("race decided, releasing losing branch");
                loser.release();
                deliver(reject, resolve, outcome);
            }
            previous @ (RaceState::Latched { .. } | RaceState::Decided) => {
                *state = previous;
            }
        }
    }

    /// Marks both branches as forked, delivering any outcome latched meanwhile.
    fn started(&self) {
        let mut state = self.state.lock();
        match mem::replace(&mut *state, RaceState::Decided) {
            RaceState::Starting { reject, resolve } => {
                *state = RaceState::Running { reject, resolve };
            }
            RaceState::Latched {
                reject,
                resolve,
                outcome,
                loser,
            } => {
                drop(state);
                debug!("race decided while starting, releasing losing branch");
                loser.release();
                deliver(reject, resolve, outcome);
            }
            previous @ (RaceState::Running { .. } | RaceState::Decided) => {
                *state = previous;
            }
        }
    }
}

fn deliver<E, A>(reject: Reject<E>, resolve: Resolve<A>, outcome: Result<A, E>) {
    match outcome {
        Ok(value) => resolve(value),
        Err(error) => reject(error),
    }
}

/// Builds the continuations for one branch of the race.
fn branch<E, A>(race: &Arc<Race<E, A>>, loser: Cleanup) -> (Reject<E>, Resolve<A>)
where
    E: Send + 'static,
    A: Send + 'static,
{
    let on_failure = Arc::clone(race);
    let on_failure_loser = loser.clone();
    let on_success = Arc::clone(race);
    (
        Box::new(move |error| on_failure.settle(Err(error), on_failure_loser)),
        Box::new(move |value| on_success.settle(Ok(value), loser)),
    )
}

impl<E: Send + 'static, A: Send + 'static> Task<E, A> {
    /// Races this task against `other`.
    ///
    /// Both tasks are forked, `self` first. The first to fail or succeed
    /// decides the result; the other task's cleanup is released exactly once
    /// before that result is delivered, and the winner's cleanup is left
    /// alone. Later outcomes from the losing task are ignored.
    ///
    /// The combined task's own cleanup releases whichever of the two carry
    /// one. It only acts if the combined task is released before either
    /// branch settles; once a branch has settled it does nothing.
    ///
    /// The returned token holds `(self_token, other_token)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lambars_task::task::Task;
    ///
    /// let raced: Task<String, i32> = Task::succeeded(1).concat(Task::succeeded(2));
    /// assert_eq!(raced.settle_now(), Ok(Ok(1)));
    ///
    /// let failing: Task<&str, i32> = Task::failed("first").concat(Task::never());
    /// assert_eq!(failing.settle_now(), Ok(Err("first")));
    /// ```
    pub fn concat(self, other: Self) -> Self {
        let (this_computation, this_cleanup) = self.into_parts();
        let (that_computation, that_cleanup) = other.into_parts();
        let combined = if this_cleanup.is_noop() && that_cleanup.is_noop() {
            Cleanup::noop()
        } else {
            let this = this_cleanup.clone();
            let that = that_cleanup.clone();
            Cleanup::new(move || {
                this.release();
                that.release();
            })
        };
        let race_cleanup = combined.clone();

        Self::from_parts(
            Box::new(move |reject: Reject<E>, resolve: Resolve<A>| {
                let race = Arc::new(Race::new(reject, resolve, race_cleanup));
                let (this_reject, this_resolve) = branch(&race, that_cleanup);
                let this_token = this_computation(this_reject, this_resolve);
                let (that_reject, that_resolve) = branch(&race, this_cleanup);
                let that_token = that_computation(that_reject, that_resolve);
                race.started();
                Token::new((this_token, that_token))
            }),
            combined,
        )
    }
}

#[cfg(feature = "typeclass")]
impl<E: Send + 'static, A: Send + 'static> Semigroup for Task<E, A> {
    fn combine(self, other: Self) -> Self {
        self.concat(other)
    }
}

#[cfg(feature = "typeclass")]
impl<E: Send + 'static, A: Send + 'static> Monoid for Task<E, A> {
    fn empty() -> Self {
        Self::never()
    }
}
