// SPDX-License-Identifier: MPL-2.0
//! Rate-limited, non-reentrant invocation of asynchronous work.
//!
//! [`Scheduled`] wraps a task so that at most one invocation is in flight and
//! invocations start at most once per interval. Calls arriving while the gate
//! is closed are coalesced: only the newest arguments survive, and every
//! coalesced caller receives the outcome of the single follow-up invocation.
//!
//! # Gate
//!
//! ```text
//!              invoke
//!   ┌──────────────────────────────┐
//!   │                              ▼
//! OPEN ◄── timer elapsed ∧ settled ── CLOSED ── call ──► pending = args
//!   ▲                                                        │
//!   └──────────── follow-up invoke(pending) ◄────────────────┘
//! ```
//!
//! All work is spawned with [`tokio::task::spawn_local`], so calls must be
//! made from within a [`tokio::task::LocalSet`].

pub mod debounce;

pub use debounce::Debounced;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures_util::future::{FutureExt, LocalBoxFuture};
use tokio::sync::oneshot;
use tokio::task::spawn_local;
use tokio::time::sleep;

use crate::error::Error;
use crate::signal::Outcome;

type Task<A, V> = Box<dyn Fn(A) -> LocalBoxFuture<'static, V>>;

/// Placeholder handed to callers blocked by the gate.
struct Waiting<V> {
    sender: oneshot::Sender<crate::error::Result<V>>,
    outcome: Outcome<V>,
}

impl<V: Clone + 'static> Waiting<V> {
    fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        let outcome = async move { receiver.await.unwrap_or(Err(Error::Cancelled)) }
            .boxed_local()
            .shared();
        Self { sender, outcome }
    }

    /// Resolves the placeholder with the outcome of `source`.
    fn link(self, source: Outcome<V>) {
        let sender = self.sender;
        spawn_local(async move {
            // Nobody may be listening anymore.
            let _ = sender.send(source.await);
        });
    }
}

struct Gate<A, V> {
    timer_elapsed: bool,
    settled: bool,
    pending: Option<A>,
    waiting: Option<Waiting<V>>,
    invocations: u64,
}

impl<A, V> Gate<A, V> {
    fn is_open(&self) -> bool {
        self.timer_elapsed && self.settled
    }
}

struct Inner<A, V> {
    task: Task<A, V>,
    interval: Duration,
    gate: RefCell<Gate<A, V>>,
}

impl<A: 'static, V: Clone + 'static> Inner<A, V> {
    fn invoke(self: &Rc<Self>, args: A) -> Outcome<V> {
        let waiting = {
            let mut gate = self.gate.borrow_mut();
            gate.timer_elapsed = false;
            gate.settled = false;
            gate.invocations += 1;
            gate.waiting.take()
        };

        let timer = Rc::clone(self);
        spawn_local(async move {
            sleep(timer.interval).await;
            timer.gate.borrow_mut().timer_elapsed = true;
            timer.release();
        });

        let work = (self.task)(args);
        let settle = Rc::clone(self);
        let outcome: Outcome<V> = async move {
            let value = work.await;
            settle.gate.borrow_mut().settled = true;
            settle.release();
            Ok(value)
        }
        .boxed_local()
        .shared();

        spawn_local(outcome.clone().map(drop));
        if let Some(waiting) = waiting {
            waiting.link(outcome.clone());
        }
        outcome
    }

    /// Spawns the follow-up invocation once the gate is open again.
    fn release(self: &Rc<Self>) {
        let args = {
            let mut gate = self.gate.borrow_mut();
            if !gate.is_open() {
                return;
            }
            gate.pending.take()
        };
        let Some(args) = args else {
            return;
        };
        let inner = Rc::clone(self);
        spawn_local(async move {
            let open = inner.gate.borrow().is_open();
            // A direct call may have slipped in first; its arguments are newer.
            if open {
                let _ = inner.invoke(args);
            }
        });
    }
}

/// Rate-limited wrapper around an asynchronous task.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use futures_util::future::FutureExt;
/// use overlay_regions::scheduler::Scheduled;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let local = tokio::task::LocalSet::new();
/// local
///     .run_until(async {
///         let double = Scheduled::new(
///             |n: u32| async move { n * 2 }.boxed_local(),
///             Duration::from_millis(50),
///         );
///         assert_eq!(double.call(21).await, Ok(42));
///     })
///     .await;
/// # }
/// ```
pub struct Scheduled<A, V> {
    inner: Rc<Inner<A, V>>,
}

impl<A: 'static, V: Clone + 'static> Scheduled<A, V> {
    /// Wraps `task`, allowing one invocation per `interval`.
    pub fn new<F>(task: F, interval: Duration) -> Self
    where
        F: Fn(A) -> LocalBoxFuture<'static, V> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                task: Box::new(task),
                interval,
                gate: RefCell::new(Gate {
                    timer_elapsed: true,
                    settled: true,
                    pending: None,
                    waiting: None,
                    invocations: 0,
                }),
            }),
        }
    }

    /// Wraps a task written as an `async` closure body.
    pub fn from_async<F, Fut>(task: F, interval: Duration) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = V> + 'static,
    {
        Self::new(move |args| task(args).boxed_local(), interval)
    }

    /// Requests an invocation with `args`.
    ///
    /// Runs the task immediately when the gate is open. Otherwise records
    /// `args` as the pending request, replacing older pending arguments, and
    /// returns the outcome of the next permitted invocation.
    pub fn call(&self, args: A) -> Outcome<V> {
        let mut gate = self.inner.gate.borrow_mut();
        if gate.is_open() {
            drop(gate);
            return self.inner.invoke(args);
        }
        gate.pending = Some(args);
        gate.waiting.get_or_insert_with(Waiting::new).outcome.clone()
    }

    /// Returns true when no invocation is in flight or queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let gate = self.inner.gate.borrow();
        gate.is_open() && gate.pending.is_none()
    }

    /// Number of task invocations so far.
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.inner.gate.borrow().invocations
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tokio::task::LocalSet;
    use tokio::time::Instant;

    type Log = Rc<RefCell<Vec<(&'static str, Duration)>>>;

    fn recording_task(
        log: &Log,
        start: Instant,
        work: Duration,
        interval: Duration,
    ) -> Scheduled<&'static str, &'static str> {
        let log = Rc::clone(log);
        Scheduled::from_async(
            move |label: &'static str| {
                log.borrow_mut().push((label, start.elapsed()));
                async move {
                    sleep(work).await;
                    label
                }
            },
            interval,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_call_runs_after_interval() {
        LocalSet::new()
            .run_until(async {
                let log: Log = Rc::default();
                let start = Instant::now();
                let scheduled = recording_task(
                    &log,
                    start,
                    Duration::from_millis(1000),
                    Duration::from_millis(2000),
                );

                let first = scheduled.call("a");
                let second = scheduled.call("b");
                assert_eq!(log.borrow().len(), 1);

                assert_eq!(first.await, Ok("a"));
                assert_eq!(second.await, Ok("b"));
                assert_eq!(
                    *log.borrow(),
                    vec![
                        ("a", Duration::ZERO),
                        ("b", Duration::from_millis(2000))
                    ]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn slow_task_delays_follow_up_until_settled() {
        LocalSet::new()
            .run_until(async {
                let log: Log = Rc::default();
                let start = Instant::now();
                let scheduled = recording_task(
                    &log,
                    start,
                    Duration::from_millis(2000),
                    Duration::from_millis(500),
                );

                let _ = scheduled.call("a");
                let second = scheduled.call("b");

                sleep(Duration::from_millis(600)).await;
                assert_eq!(log.borrow().len(), 1);

                assert_eq!(second.await, Ok("b"));
                assert_eq!(log.borrow()[1], ("b", Duration::from_millis(2000)));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn newest_pending_arguments_win() {
        LocalSet::new()
            .run_until(async {
                let log: Log = Rc::default();
                let scheduled = recording_task(
                    &log,
                    Instant::now(),
                    Duration::from_millis(10),
                    Duration::from_millis(100),
                );

                let _ = scheduled.call("a");
                let b = scheduled.call("b");
                let c = scheduled.call("c");

                assert_eq!(b.await, Ok("c"));
                assert_eq!(c.await, Ok("c"));
                let labels: Vec<_> = log.borrow().iter().map(|(label, _)| *label).collect();
                assert_eq!(labels, vec!["a", "c"]);
                assert_eq!(scheduled.invocations(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn gate_reopens_when_idle() {
        LocalSet::new()
            .run_until(async {
                let log: Log = Rc::default();
                let start = Instant::now();
                let scheduled = recording_task(
                    &log,
                    start,
                    Duration::from_millis(10),
                    Duration::from_millis(100),
                );

                scheduled.call("a").await.expect("first call runs");
                assert!(!scheduled.is_idle());

                sleep(Duration::from_millis(200)).await;
                assert!(scheduled.is_idle());

                let _ = scheduled.call("b");
                assert_eq!(log.borrow()[1], ("b", Duration::from_millis(210)));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_outcomes_do_not_stall_the_gate() {
        LocalSet::new()
            .run_until(async {
                let log: Log = Rc::default();
                let scheduled = recording_task(
                    &log,
                    Instant::now(),
                    Duration::from_millis(10),
                    Duration::from_millis(100),
                );

                drop(scheduled.call("a"));
                drop(scheduled.call("b"));

                sleep(Duration::from_millis(300)).await;
                assert_eq!(log.borrow().len(), 2);
                assert!(scheduled.is_idle());
            })
            .await;
    }
}
