// SPDX-License-Identifier: MPL-2.0
//! Lifecycle event types.
//!
//! This module defines the events the placement engine reports while it
//! registers, places, relocates and removes overlays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{OverlayId, Region};

/// Something the engine did to an overlay or to the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    // ==========================================================================
    // Overlay Lifecycle
    // ==========================================================================
    /// A new overlay record was created.
    Registered { id: OverlayId, region: Region },

    /// An overlay finished animating into its first region.
    Mounted { id: OverlayId, region: Region },

    /// An overlay left `from` and was inserted into `to`.
    Moved {
        id: OverlayId,
        from: Region,
        to: Region,
    },

    /// A removal animation finished.
    Removed { id: OverlayId },

    /// An overlay record was deleted.
    Unregistered { id: OverlayId },

    // ==========================================================================
    // Layout
    // ==========================================================================
    /// The layout store was rebuilt.
    LayoutRecalculated { overlays: usize },

    /// A region exceeded its item limit.
    ConstraintViolated {
        region: Region,
        count: usize,
        max: usize,
    },

    /// An overlay was removed to satisfy a limit.
    Evicted { id: OverlayId, region: Region },

    // ==========================================================================
    // Surface
    // ==========================================================================
    /// New insets were applied to the root.
    InsetsApplied {
        top: f64,
        bottom: f64,
        left: f64,
        right: f64,
    },

    /// All state was discarded.
    Reset,
}

impl EngineEvent {
    /// Overlay the event is about, if any.
    #[must_use]
    pub fn overlay_id(&self) -> Option<&OverlayId> {
        match self {
            EngineEvent::Registered { id, .. }
            | EngineEvent::Mounted { id, .. }
            | EngineEvent::Moved { id, .. }
            | EngineEvent::Removed { id }
            | EngineEvent::Unregistered { id }
            | EngineEvent::Evicted { id, .. } => Some(id),
            EngineEvent::LayoutRecalculated { .. }
            | EngineEvent::ConstraintViolated { .. }
            | EngineEvent::InsetsApplied { .. }
            | EngineEvent::Reset => None,
        }
    }
}

/// A timestamped engine event.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticEvent {
    /// When the event was recorded (wall clock).
    pub timestamp: DateTime<Utc>,
    pub kind: EngineEvent,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: EngineEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}
