// SPDX-License-Identifier: MPL-2.0
//! Shared completion signals.
//!
//! Every asynchronous operation of the engine hands out a cloneable future.
//! Any number of holders may await the same signal; all of them observe the
//! same settlement.

use std::future::Future;

use futures_util::future::{self, FutureExt, LocalBoxFuture, Shared};

use crate::error::Result;

/// Deferred signal that settles once an animation or removal has finished.
pub type Completion = Shared<LocalBoxFuture<'static, ()>>;

/// Deferred result of a scheduled invocation.
pub type Outcome<V> = Shared<LocalBoxFuture<'static, Result<V>>>;

/// Returns a completion that is already settled.
#[must_use]
pub fn settled() -> Completion {
    future::ready(()).boxed_local().shared()
}

/// Returns an outcome that already holds `value`.
#[must_use]
pub fn resolved<V: Clone + 'static>(value: V) -> Outcome<V> {
    future::ready(Ok(value)).boxed_local().shared()
}

/// Wraps a future into a shareable completion.
pub fn completion<F>(work: F) -> Completion
where
    F: Future<Output = ()> + 'static,
{
    work.boxed_local().shared()
}
