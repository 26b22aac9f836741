// SPDX-License-Identifier: MPL-2.0
//! Capacity constraints.
//!
//! After every layout pass the engine checks each destination region against
//! its active `MAX_ITEMS` limit. A region over its limit produces a
//! [`ConstraintViolation`]; the embedder's handler answers with a
//! [`ViolationReaction`] naming what to evict.

use crate::domain::{OverlayId, Region};
use crate::surface::Viewport;

use super::responsive::{Constraint, ResponsiveRules};
use super::store::LayoutStore;

/// Identity and ordering data of an overlay, handed to violation handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySummary {
    pub id: OverlayId,
    pub priority: i32,
    pub created_at: u64,
}

/// A region holding more overlays than its limit allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub region: Region,
    pub max: usize,
    /// Overlays of the region in render order.
    pub overlays: Vec<OverlaySummary>,
}

impl ConstraintViolation {
    /// Number of overlays above the limit.
    #[must_use]
    pub fn excess(&self) -> usize {
        self.overlays.len().saturating_sub(self.max)
    }
}

/// What to do about a violation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViolationReaction {
    /// Leave the region over its limit.
    NoAction,
    /// Remove exactly these overlays.
    RemoveIds(Vec<OverlayId>),
    /// Remove the oldest overlays until the region fits.
    #[default]
    RemoveOldestAuto,
}

impl ViolationReaction {
    /// Overlays to remove for `violation`.
    #[must_use]
    pub fn removals(&self, violation: &ConstraintViolation) -> Vec<OverlayId> {
        match self {
            ViolationReaction::NoAction => Vec::new(),
            ViolationReaction::RemoveIds(ids) => ids.clone(),
            ViolationReaction::RemoveOldestAuto => {
                oldest(&violation.overlays, violation.excess())
            }
        }
    }
}

/// Ids of the `n` overlays with the smallest `created_at`, oldest first.
///
/// Ties keep their input order. Returns every id when `n` covers the slice.
#[must_use]
pub fn oldest(overlays: &[OverlaySummary], n: usize) -> Vec<OverlayId> {
    let mut sorted: Vec<&OverlaySummary> = overlays.iter().collect();
    sorted.sort_by_key(|overlay| overlay.created_at);
    sorted
        .into_iter()
        .take(n)
        .map(|overlay| overlay.id.clone())
        .collect()
}

/// Active item limit of every destination region.
///
/// Each region with rules is resolved against the viewport; its matching
/// rule's constraints apply to the resolved destination. When several
/// regions constrain the same destination the strictest limit wins.
#[must_use]
pub fn active_limits(rules: &ResponsiveRules, viewport: &dyn Viewport) -> [Option<usize>; Region::COUNT] {
    let mut limits = [None; Region::COUNT];
    for region in Region::ALL {
        let resolution = rules.resolve(region, viewport);
        for constraint in resolution.constraints {
            match *constraint {
                Constraint::MaxItems { max } => {
                    let slot = &mut limits[resolution.destination.index()];
                    *slot = Some(slot.map_or(max, |current: usize| current.min(max)));
                }
            }
        }
    }
    limits
}

/// Regions of `layout` exceeding their limit.
///
/// `summary_of` supplies the data of each listed overlay; ids it cannot
/// describe are skipped.
pub fn find_violations<F>(
    layout: &LayoutStore,
    limits: &[Option<usize>; Region::COUNT],
    summary_of: F,
) -> Vec<ConstraintViolation>
where
    F: Fn(&OverlayId) -> Option<OverlaySummary>,
{
    layout
        .iter()
        .filter_map(|(region, ids)| {
            let max = limits[region.index()]?;
            if ids.len() <= max {
                return None;
            }
            Some(ConstraintViolation {
                region,
                max,
                overlays: ids.iter().filter_map(&summary_of).collect(),
            })
        })
        .collect()
}
