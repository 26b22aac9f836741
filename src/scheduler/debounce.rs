// SPDX-License-Identifier: MPL-2.0
//! Leading and trailing debounce.
//!
//! The first call of a burst runs the task at once. Further calls within the
//! wait window push the window back and cause exactly one trailing run when
//! the window finally closes.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::spawn_local;
use tokio::time::{sleep_until, Instant};

#[derive(Debug, Default)]
struct Window {
    deadline: Option<Instant>,
    trailing: bool,
}

struct Inner {
    task: Box<dyn Fn()>,
    wait: Duration,
    window: RefCell<Window>,
}

impl Inner {
    async fn wait_for_quiet(self: Rc<Self>) {
        loop {
            let Some(deadline) = self.window.borrow().deadline else {
                return;
            };
            sleep_until(deadline).await;

            let run_trailing = {
                let mut window = self.window.borrow_mut();
                if window.deadline != Some(deadline) {
                    continue;
                }
                window.deadline = None;
                std::mem::take(&mut window.trailing)
            };
            if run_trailing {
                (self.task)();
            }
            return;
        }
    }
}

/// Debounced wrapper around a synchronous task.
///
/// Must be called from within a [`tokio::task::LocalSet`].
pub struct Debounced {
    inner: Rc<Inner>,
}

impl Debounced {
    pub fn new<F>(task: F, wait: Duration) -> Self
    where
        F: Fn() + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                task: Box::new(task),
                wait,
                window: RefCell::new(Window::default()),
            }),
        }
    }

    /// Requests a run of the task.
    pub fn call(&self) {
        let leading = {
            let mut window = self.inner.window.borrow_mut();
            let leading = window.deadline.is_none();
            if !leading {
                window.trailing = true;
            }
            window.deadline = Some(Instant::now() + self.inner.wait);
            leading
        };
        if leading {
            (self.inner.task)();
            spawn_local(Rc::clone(&self.inner).wait_for_quiet());
        }
    }

    /// Drops the current window and any pending trailing run.
    pub fn cancel(&self) {
        *self.inner.window.borrow_mut() = Window::default();
    }

    /// Returns true while a window is open.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.window.borrow().deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    fn counting(wait_ms: u64) -> (Debounced, Rc<Cell<u32>>) {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let debounced = Debounced::new(
            move || counter.set(counter.get() + 1),
            Duration::from_millis(wait_ms),
        );
        (debounced, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn single_call_runs_once_immediately() {
        LocalSet::new()
            .run_until(async {
                let (debounced, runs) = counting(300);
                debounced.call();
                assert_eq!(runs.get(), 1);

                sleep(Duration::from_millis(1000)).await;
                assert_eq!(runs.get(), 1);
                assert!(!debounced.is_pending());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_leading_and_one_trailing() {
        LocalSet::new()
            .run_until(async {
                let (debounced, runs) = counting(300);
                debounced.call();
                sleep(Duration::from_millis(100)).await;
                debounced.call();
                sleep(Duration::from_millis(100)).await;
                debounced.call();
                assert_eq!(runs.get(), 1);

                // Window closes 300ms after the last call (t=500)
                sleep(Duration::from_millis(250)).await;
                assert_eq!(runs.get(), 1);
                sleep(Duration::from_millis(100)).await;
                assert_eq!(runs.get(), 2);

                sleep(Duration::from_millis(1000)).await;
                assert_eq!(runs.get(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn call_after_quiet_period_leads_again() {
        LocalSet::new()
            .run_until(async {
                let (debounced, runs) = counting(300);
                debounced.call();
                sleep(Duration::from_millis(400)).await;
                debounced.call();
                assert_eq!(runs.get(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_trailing_run() {
        LocalSet::new()
            .run_until(async {
                let (debounced, runs) = counting(300);
                debounced.call();
                debounced.call();
                debounced.cancel();

                sleep(Duration::from_millis(1000)).await;
                assert_eq!(runs.get(), 1);
            })
            .await;
    }
}
