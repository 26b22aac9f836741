// SPDX-License-Identifier: MPL-2.0
//! Value newtypes.
//!
//! This module provides type-safe wrappers for the engine's timing and sizing values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

use crate::config::{
    DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY, DEFAULT_INSET_DEBOUNCE_MS,
    DEFAULT_RECALCULATE_INTERVAL_MS, DEFAULT_STAGGER_STEP_MS, MAX_DIAGNOSTICS_BUFFER_CAPACITY,
    MAX_INSET_DEBOUNCE_MS, MAX_RECALCULATE_INTERVAL_MS, MAX_STAGGER_STEP_MS,
    MIN_DIAGNOSTICS_BUFFER_CAPACITY, MIN_RECALCULATE_INTERVAL_MS,
};

// =============================================================================
// RecalculateInterval
// =============================================================================

/// Minimum spacing between two layout recalculations, in milliseconds.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (16–10000 ms).
///
/// # Example
///
/// ```
/// use overlay_regions::domain::RecalculateInterval;
///
/// let interval = RecalculateInterval::new(500);
/// assert_eq!(interval.value(), 500);
///
/// // Values outside range are clamped
/// let too_low = RecalculateInterval::new(0);
/// assert_eq!(too_low.value(), 16); // Clamped to min
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalculateInterval(u64);

impl RecalculateInterval {
    /// Creates a new interval, clamping to valid range.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value.clamp(MIN_RECALCULATE_INTERVAL_MS, MAX_RECALCULATE_INTERVAL_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the interval as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Returns true if this is the minimum value.
    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_RECALCULATE_INTERVAL_MS
    }

    /// Returns true if this is the maximum value.
    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_RECALCULATE_INTERVAL_MS
    }
}

impl Default for RecalculateInterval {
    fn default() -> Self {
        Self(DEFAULT_RECALCULATE_INTERVAL_MS)
    }
}

// =============================================================================
// InsetDebounce
// =============================================================================

/// Debounce window for inset recomputation, in milliseconds (0–5000 ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsetDebounce(u64);

impl InsetDebounce {
    /// Creates a new debounce window, clamping to valid range.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value.min(MAX_INSET_DEBOUNCE_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the window as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for InsetDebounce {
    fn default() -> Self {
        Self(DEFAULT_INSET_DEBOUNCE_MS)
    }
}

// =============================================================================
// StaggerStep
// =============================================================================

/// Delay added per animated overlay within one recalculation (0–500 ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggerStep(u64);

impl StaggerStep {
    /// Creates a new stagger step, clamping to valid range.
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value.min(MAX_STAGGER_STEP_MS))
    }

    /// Returns the value in milliseconds.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Returns the delay for the `n`th animation of a batch.
    #[must_use]
    pub fn delay_for(self, n: u32) -> Duration {
        Duration::from_millis(self.0.saturating_mul(u64::from(n)))
    }
}

impl Default for StaggerStep {
    fn default() -> Self {
        Self(DEFAULT_STAGGER_STEP_MS)
    }
}

// =============================================================================
// BufferCapacity
// =============================================================================

/// Number of lifecycle events kept by the diagnostics collector (50–10000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(
            MIN_DIAGNOSTICS_BUFFER_CAPACITY,
            MAX_DIAGNOSTICS_BUFFER_CAPACITY,
        ))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recalculate_interval_clamps_to_valid_range() {
        assert_eq!(
            RecalculateInterval::new(0).value(),
            MIN_RECALCULATE_INTERVAL_MS
        );
        assert_eq!(
            RecalculateInterval::new(u64::MAX).value(),
            MAX_RECALCULATE_INTERVAL_MS
        );
        assert!(RecalculateInterval::new(0).is_min());
        assert!(RecalculateInterval::new(u64::MAX).is_max());
    }

    #[test]
    fn recalculate_interval_default_is_half_a_second() {
        assert_eq!(
            RecalculateInterval::default().as_duration(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn inset_debounce_allows_zero() {
        assert_eq!(InsetDebounce::new(0).value(), 0);
        assert_eq!(InsetDebounce::new(60_000).value(), MAX_INSET_DEBOUNCE_MS);
        assert_eq!(InsetDebounce::default().value(), 300);
    }

    #[test]
    fn stagger_step_scales_with_batch_position() {
        let step = StaggerStep::default();
        assert_eq!(step.delay_for(0), Duration::ZERO);
        assert_eq!(step.delay_for(3), Duration::from_millis(60));
        assert_eq!(StaggerStep::new(10_000).value(), MAX_STAGGER_STEP_MS);
    }

    #[test]
    fn buffer_capacity_clamps_to_valid_range() {
        assert_eq!(BufferCapacity::new(0).value(), MIN_DIAGNOSTICS_BUFFER_CAPACITY);
        assert_eq!(
            BufferCapacity::new(1_000_000).value(),
            MAX_DIAGNOSTICS_BUFFER_CAPACITY
        );
        assert_eq!(
            BufferCapacity::default().value(),
            DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY
        );
    }
}
