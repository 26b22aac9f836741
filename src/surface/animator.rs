// SPDX-License-Identifier: MPL-2.0
//! Transition primitives.
//!
//! The engine never animates anything itself. It asks an [`Animator`] to
//! bring a node in or out and waits on the returned [`Completion`].

use std::time::Duration;

use tokio::time::sleep;

use crate::config::DEFAULT_ANIMATION_PHASE_MS;
use crate::signal::{completion, settled, Completion};

use super::node::{FinalWidth, NodeHandle, Size, Visual};

/// Injected capability that animates overlay nodes.
///
/// Both operations start after `delay` and return a completion that settles
/// once the node has reached its final visual state.
pub trait Animator {
    fn animate_in(
        &self,
        node: &NodeHandle,
        size_hint: Option<Size>,
        width: FinalWidth,
        delay: Duration,
    ) -> Completion;

    fn animate_out(
        &self,
        node: &NodeHandle,
        size_hint: Option<Size>,
        width: FinalWidth,
        delay: Duration,
    ) -> Completion;
}

/// Animator that applies the final state synchronously.
///
/// Useful for headless embedders and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn animate_in(
        &self,
        node: &NodeHandle,
        _size_hint: Option<Size>,
        width: FinalWidth,
        _delay: Duration,
    ) -> Completion {
        node.set_final_width(width);
        node.set_visual(Visual::Shown);
        settled()
    }

    fn animate_out(
        &self,
        node: &NodeHandle,
        _size_hint: Option<Size>,
        width: FinalWidth,
        _delay: Duration,
    ) -> Completion {
        node.set_final_width(width);
        node.set_visual(Visual::Collapsed);
        settled()
    }
}

/// Two-phase animator driven by tokio timers.
///
/// Entering grows the node to its size hint, then fades it in. Leaving fades
/// the node out, then collapses it. Each phase lasts `phase`.
#[derive(Debug, Clone, Copy)]
pub struct TimedAnimator {
    phase: Duration,
}

impl TimedAnimator {
    #[must_use]
    pub fn new(phase: Duration) -> Self {
        Self { phase }
    }

    /// Total time from the end of the delay until completion.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.phase * 2
    }
}

impl Default for TimedAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_ANIMATION_PHASE_MS))
    }
}

impl Animator for TimedAnimator {
    fn animate_in(
        &self,
        node: &NodeHandle,
        _size_hint: Option<Size>,
        width: FinalWidth,
        delay: Duration,
    ) -> Completion {
        let node = node.clone();
        let phase = self.phase;
        completion(async move {
            sleep(delay).await;
            node.set_visual(Visual::Entering);
            sleep(phase).await;
            node.set_final_width(width);
            sleep(phase).await;
            node.set_visual(Visual::Shown);
        })
    }

    fn animate_out(
        &self,
        node: &NodeHandle,
        _size_hint: Option<Size>,
        width: FinalWidth,
        delay: Duration,
    ) -> Completion {
        let node = node.clone();
        let phase = self.phase;
        completion(async move {
            sleep(delay).await;
            node.set_visual(Visual::Leaving);
            sleep(phase).await;
            node.set_final_width(width);
            sleep(phase).await;
            node.set_visual(Visual::Collapsed);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OverlayId;
    use tokio::time::Instant;

    #[tokio::test]
    async fn instant_animator_applies_final_state() {
        let node = NodeHandle::new(OverlayId::from("a"));
        InstantAnimator
            .animate_in(&node, None, FinalWidth::Full, Duration::ZERO)
            .await;
        assert_eq!(node.visual(), Visual::Shown);
        assert_eq!(node.final_width(), FinalWidth::Full);

        InstantAnimator
            .animate_out(&node, None, FinalWidth::Auto, Duration::ZERO)
            .await;
        assert_eq!(node.visual(), Visual::Collapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_animator_waits_for_delay_and_both_phases() {
        let animator = TimedAnimator::new(Duration::from_millis(250));
        let node = NodeHandle::new(OverlayId::from("a"));
        let start = Instant::now();

        animator
            .animate_in(&node, None, FinalWidth::Auto, Duration::from_millis(40))
            .await;

        assert_eq!(start.elapsed(), Duration::from_millis(540));
        assert_eq!(node.visual(), Visual::Shown);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_animator_is_lazy_until_polled() {
        let animator = TimedAnimator::default();
        let node = NodeHandle::new(OverlayId::from("a"));
        let leaving = animator.animate_out(&node, None, FinalWidth::Auto, Duration::ZERO);
        assert_eq!(node.visual(), Visual::Hidden);
        leaving.await;
        assert_eq!(node.visual(), Visual::Collapsed);
    }
}
