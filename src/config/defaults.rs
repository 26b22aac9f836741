// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the engine. Constants are organized by category.
//!
//! # Categories
//!
//! - **Surface**: Rendering root naming
//! - **Layout**: Recalculation rate limiting and animation staggering
//! - **Insets**: Debounce window for inset aggregation
//! - **Animation**: Phase duration of the bundled timed animator
//! - **Diagnostics**: Event buffer sizing

// ==========================================================================
// Surface Defaults
// ==========================================================================

/// Default identifier of the rendering root.
///
/// Region containers are named `{root}_{REGION}`, e.g. `rom-portal_TOP_RIGHT`.
pub const DEFAULT_ROOT_ID: &str = "rom-portal";

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Default minimum spacing between two layout recalculations (in milliseconds).
pub const DEFAULT_RECALCULATE_INTERVAL_MS: u64 = 500;

/// Minimum recalculation interval (in milliseconds).
pub const MIN_RECALCULATE_INTERVAL_MS: u64 = 16;

/// Maximum recalculation interval (in milliseconds).
pub const MAX_RECALCULATE_INTERVAL_MS: u64 = 10_000;

/// Default delay added per animated overlay within one recalculation (in milliseconds).
pub const DEFAULT_STAGGER_STEP_MS: u64 = 20;

/// Maximum stagger step (in milliseconds).
pub const MAX_STAGGER_STEP_MS: u64 = 500;

// ==========================================================================
// Inset Defaults
// ==========================================================================

/// Default debounce window for inset recomputation (in milliseconds).
pub const DEFAULT_INSET_DEBOUNCE_MS: u64 = 300;

/// Maximum inset debounce window (in milliseconds).
pub const MAX_INSET_DEBOUNCE_MS: u64 = 5_000;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Duration of each phase of the timed animator (in milliseconds).
///
/// Entering grows the node then fades it in; leaving fades out then
/// collapses. Each phase lasts this long.
pub const DEFAULT_ANIMATION_PHASE_MS: u64 = 250;

// ==========================================================================
// Diagnostics Defaults
// ==========================================================================

/// Default number of lifecycle events retained by the diagnostics collector.
pub const DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY: usize = 500;

/// Minimum diagnostics buffer capacity.
pub const MIN_DIAGNOSTICS_BUFFER_CAPACITY: usize = 50;

/// Maximum diagnostics buffer capacity.
pub const MAX_DIAGNOSTICS_BUFFER_CAPACITY: usize = 10_000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Recalculation interval validation
    assert!(MIN_RECALCULATE_INTERVAL_MS > 0);
    assert!(MAX_RECALCULATE_INTERVAL_MS >= MIN_RECALCULATE_INTERVAL_MS);
    assert!(DEFAULT_RECALCULATE_INTERVAL_MS >= MIN_RECALCULATE_INTERVAL_MS);
    assert!(DEFAULT_RECALCULATE_INTERVAL_MS <= MAX_RECALCULATE_INTERVAL_MS);

    // Stagger validation
    assert!(DEFAULT_STAGGER_STEP_MS <= MAX_STAGGER_STEP_MS);

    // Inset debounce validation
    assert!(DEFAULT_INSET_DEBOUNCE_MS <= MAX_INSET_DEBOUNCE_MS);

    // Animation validation
    assert!(DEFAULT_ANIMATION_PHASE_MS > 0);

    // Diagnostics validation
    assert!(MIN_DIAGNOSTICS_BUFFER_CAPACITY > 0);
    assert!(MAX_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY >= MIN_DIAGNOSTICS_BUFFER_CAPACITY);
    assert!(DEFAULT_DIAGNOSTICS_BUFFER_CAPACITY <= MAX_DIAGNOSTICS_BUFFER_CAPACITY);
};
