//! Loom-based systematic concurrency tests for racing tasks.
//!
//! Explores every interleaving of two branches settling from separate
//! threads, and of a settle racing a release.
//!
//! Run with: RUSTFLAGS="--cfg loom" cargo test --test race_loom --release
//!
//! Under normal `cargo test`, this file compiles to an empty module.

#![cfg(loom)]

use lambars_task::task::{Resolve, Task};
use loom::sync::atomic::{AtomicUsize, Ordering};
use loom::sync::{Arc, Mutex};
use loom::thread;

type Held = Arc<Mutex<Option<Resolve<usize>>>>;

/// A task that parks its success continuation in the returned slot.
/// Its cleanup bumps `released`.
fn parked(released: &Arc<AtomicUsize>) -> (Task<(), usize>, Held) {
    let held: Held = Arc::new(Mutex::new(None));
    let slot = Arc::clone(&held);
    let counter = Arc::clone(released);
    let task = Task::with_cleanup(
        move |_, resolve: Resolve<usize>| {
            *slot.lock().unwrap() = Some(resolve);
        },
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );
    (task, held)
}

fn take(held: &Held) -> Resolve<usize> {
    held.lock().unwrap().take().unwrap()
}

#[test]
fn loom_race_delivers_once_and_releases_loser_once() {
    loom::model(|| {
        let first_released = Arc::new(AtomicUsize::new(0));
        let second_released = Arc::new(AtomicUsize::new(0));
        let (first, first_held) = parked(&first_released);
        let (second, second_held) = parked(&second_released);

        let delivered = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delivered);
        first
            .concat(second)
            .fork(|()| {}, move |value| sink.lock().unwrap().push(value));

        let first_resolve = take(&first_held);
        let second_resolve = take(&second_held);
        let first_thread = thread::spawn(move || first_resolve(1));
        let second_thread = thread::spawn(move || second_resolve(2));
        first_thread.join().unwrap();
        second_thread.join().unwrap();

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        let (winner, loser) = if delivered[0] == 1 {
            (&first_released, &second_released)
        } else {
            (&second_released, &first_released)
        };
        assert_eq!(loser.load(Ordering::SeqCst), 1);
        assert_eq!(winner.load(Ordering::SeqCst), 0);
    });
}

#[test]
fn loom_release_racing_settle_cancels_winner_only_before_decision() {
    loom::model(|| {
        let first_released = Arc::new(AtomicUsize::new(0));
        let second_released = Arc::new(AtomicUsize::new(0));
        let (first, first_held) = parked(&first_released);
        let (second, _second_held) = parked(&second_released);

        let raced = first.concat(second);
        let cleanup = raced.cleanup();
        raced.fork(|()| {}, |_| {});

        let resolve = take(&first_held);
        let settler = thread::spawn(move || resolve(1));
        let releaser = thread::spawn(move || cleanup.release());
        settler.join().unwrap();
        let released_before_decision = releaser.join().unwrap();

        // The winner is only cancelled by a release that beat the decision.
        assert_eq!(
            first_released.load(Ordering::SeqCst),
            usize::from(released_before_decision)
        );
        assert_eq!(second_released.load(Ordering::SeqCst), 1);
    });
}
