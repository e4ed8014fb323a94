//! Integration tests for `Task` composition.
//!
//! These tests drive tasks end to end through `fork`, with computations that
//! settle synchronously and with computations resolved later from another
//! thread.

use lambars_task::task::{Cases, Cleanup, Reject, Resolve, SettleError, Task, Token};
use rstest::rstest;
use static_assertions::assert_impl_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

assert_impl_all!(Task<String, i32>: Send);
assert_impl_all!(Cleanup: Send, Sync, Clone);
assert_impl_all!(Token: Send);
assert_impl_all!(SettleError: std::error::Error, Send, Sync);

/// A task resolved with `value` from a spawned thread after `delay`.
fn resolve_later<E: Send + 'static>(value: i32, delay: Duration) -> Task<E, i32> {
    Task::new(move |_, resolve: Resolve<i32>| {
        thread::spawn(move || {
            thread::sleep(delay);
            resolve(value);
        });
    })
}

/// A task rejected with `error` from a spawned thread after `delay`.
fn reject_later<A: Send + 'static>(error: &'static str, delay: Duration) -> Task<&'static str, A> {
    Task::new(move |reject: Reject<&'static str>, _| {
        thread::spawn(move || {
            thread::sleep(delay);
            reject(error);
        });
    })
}

/// Forks `task` and waits for its single outcome.
fn run<E, A>(task: Task<E, A>) -> Result<A, E>
where
    E: Send + 'static,
    A: Send + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let on_failure = sender.clone();
    task.fork(
        move |error| on_failure.send(Err(error)).unwrap(),
        move |value| sender.send(Ok(value)).unwrap(),
    );
    receiver.recv_timeout(Duration::from_secs(5)).unwrap()
}

// =============================================================================
// Recovery End To End
// =============================================================================

#[rstest]
fn timeout_is_recovered_then_mapped() {
    let task = Task::failed("timeout")
        .or_else(|_| Task::<String, _>::succeeded(42))
        .map(|x| x + 1);
    assert_eq!(task.settle_now(), Ok(Ok(43)));
}

#[rstest]
fn recovery_of_asynchronous_failure() {
    let task = reject_later::<i32>("late", Duration::from_millis(5))
        .or_else(|error| Task::<String, _>::succeeded(error.len() as i32));
    assert_eq!(run(task), Ok(4));
}

// =============================================================================
// Sequencing
// =============================================================================

#[rstest]
fn chain_splices_asynchronous_steps() {
    let task: Task<String, i32> = resolve_later(1, Duration::from_millis(2))
        .chain(|x| resolve_later(x + 1, Duration::from_millis(2)))
        .chain(|x| resolve_later(x * 10, Duration::from_millis(2)));
    assert_eq!(run(task), Ok(20));
}

#[rstest]
fn chain_does_not_build_the_next_task_after_failure() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let task = reject_later::<i32>("stop", Duration::from_millis(1)).chain(move |x| {
        counter.fetch_add(1, Ordering::SeqCst);
        Task::succeeded(x)
    });

    assert_eq!(run(task), Err("stop"));
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

#[rstest]
fn deep_chain_of_synchronous_steps() {
    let task = (0..200).fold(Task::<String, u64>::succeeded(0), |task, _| {
        task.chain(|x| Task::succeeded(x + 1))
    });
    assert_eq!(task.settle_now(), Ok(Ok(200)));
}

#[rstest]
fn ap_resolves_function_before_forking_argument() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let function_order = Arc::clone(&order);
    let argument_order = Arc::clone(&order);

    let function: Task<String, fn(i32) -> i32> = Task::new(move |_, resolve: Resolve<_>| {
        function_order.lock().unwrap().push("function");
        resolve((|x: i32| x * 3) as fn(i32) -> i32);
    });
    let argument: Task<String, i32> = Task::new(move |_, resolve: Resolve<i32>| {
        argument_order.lock().unwrap().push("argument");
        resolve(14);
    });

    assert_eq!(function.ap(argument).settle_now(), Ok(Ok(42)));
    assert_eq!(*order.lock().unwrap(), vec!["function", "argument"]);
}

#[rstest]
fn map2_combines_sequentially() {
    let task: Task<String, String> = resolve_later(2, Duration::from_millis(1))
        .map2(Task::succeeded(3), |x, y| format!("{x}{y}"));
    assert_eq!(run(task), Ok(String::from("23")));
}

// =============================================================================
// Collapsing and Channel Rewiring
// =============================================================================

#[rstest]
#[case(Task::succeeded(4), 8)]
#[case(Task::failed("four"), 4)]
fn fold_always_succeeds(#[case] task: Task<&'static str, i32>, #[case] expected: i32) {
    let folded: Task<(), i32> = task.fold(|error| error.len() as i32, |value| value * 2);
    assert_eq!(folded.settle_now(), Ok(Ok(expected)));
}

#[rstest]
fn cata_matches_fold() {
    let cases = Cases {
        failed: |error: &str| format!("failed: {error}"),
        succeeded: |value: i32| format!("succeeded: {value}"),
    };
    let folded: Task<(), String> = Task::failed("nope").cata(cases);
    assert_eq!(folded.settle_now(), Ok(Ok(String::from("failed: nope"))));
}

#[rstest]
fn swap_twice_restores_channels() {
    let task: Task<&str, i32> = Task::failed("left");
    assert_eq!(task.swap().swap().settle_now(), Ok(Err("left")));
}

#[rstest]
#[case(Task::succeeded(5), Ok(Ok(6)))]
#[case(Task::failed(5), Ok(Err(String::from("5"))))]
fn bimap_preserves_channel(
    #[case] task: Task<i32, i32>,
    #[case] expected: Result<Result<i32, String>, SettleError>,
) {
    let mapped = task.bimap(|error| error.to_string(), |value| value + 1);
    assert_eq!(mapped.settle_now(), expected);
}

#[rstest]
fn rejected_map_leaves_success_untouched() {
    let task: Task<&str, i32> = Task::succeeded(1);
    let mapped: Task<usize, i32> = task.rejected_map(str::len);
    assert_eq!(mapped.settle_now(), Ok(Ok(1)));
}

// =============================================================================
// Racing
// =============================================================================

#[rstest]
fn faster_asynchronous_branch_wins() {
    let slow = resolve_later::<String>(1, Duration::from_millis(200));
    let fast = resolve_later::<String>(2, Duration::from_millis(5));
    assert_eq!(run(slow.concat(fast)), Ok(2));
}

#[rstest]
fn failure_can_win_a_race() {
    let slow = resolve_later(1, Duration::from_millis(200));
    let fast = reject_later("first", Duration::from_millis(5));
    assert_eq!(run(slow.concat(fast)), Err("first"));
}

#[rstest]
fn cleanup_survives_composition_into_a_race() {
    let released = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&released);
    let loser: Task<String, i32> = Task::<String, i32>::with_cleanup(
        |_, _| {},
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    )
    .map(|x| x + 1)
    .chain(Task::succeeded);

    assert_eq!(run(Task::succeeded(9).concat(loser)), Ok(9));
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Cleanup and Tokens
// =============================================================================

#[rstest]
fn cleanup_handle_cancels_forked_work() {
    let (cancel_sender, cancel_receiver) = mpsc::channel::<()>();
    let task: Task<&str, i32> = Task::new(move |reject: Reject<&'static str>, _| {
        thread::spawn(move || {
            if cancel_receiver.recv_timeout(Duration::from_secs(5)).is_ok() {
                reject("cancelled");
            }
        });
    })
    .with_cleanup_handle(Cleanup::new(move || {
        let _ = cancel_sender.send(());
    }));

    let cleanup = task.cleanup();
    let (sender, receiver) = mpsc::channel();
    task.fork(move |error| sender.send(error).unwrap(), |_| {});
    assert!(cleanup.release());

    assert_eq!(
        receiver.recv_timeout(Duration::from_secs(5)),
        Ok("cancelled")
    );
}

#[rstest]
fn token_passes_through_map() {
    let task: Task<String, i32> = Task::new(|_, resolve: Resolve<i32>| {
        resolve(1);
        Token::new(17_u32)
    });
    let token = task.map(|x| x + 1).fork(|_| {}, |_| {});
    assert_eq!(token.downcast::<u32>().ok(), Some(17));
}

#[rstest]
fn settle_now_reports_pending_work() {
    let task = resolve_later::<String>(1, Duration::from_millis(50));
    assert_eq!(task.settle_now(), Err(SettleError::Pending));
}
