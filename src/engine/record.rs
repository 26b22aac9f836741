// SPDX-License-Identifier: MPL-2.0
//! Overlay records and the registry holding them.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::domain::{OverlayId, Region};
use crate::layout::{OverlaySummary, SortKey};
use crate::signal::Completion;
use crate::surface::NodeHandle;

/// Invoked with the overlay's id after it was evicted by a capacity limit.
pub type RemovalCallback = Rc<dyn Fn(&OverlayId)>;

/// Everything needed to register or update an overlay.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use overlay_regions::domain::Region;
/// use overlay_regions::engine::OverlayRequest;
///
/// let request = OverlayRequest::new("saved", Region::BottomCenter, 0)
///     .with_hide_after(Duration::from_secs(3))
///     .on_removed_after_violation(|id| println!("{id} was evicted"));
/// assert_eq!(request.id.as_str(), "saved");
/// ```
#[derive(Clone)]
pub struct OverlayRequest {
    pub id: OverlayId,
    /// Region the overlay asks for, before responsive rules apply.
    pub region: Region,
    /// Lower values render first.
    pub priority: i32,
    /// Removes the overlay this long after it was marked ready.
    pub hide_after: Option<Duration>,
    pub on_removed_after_violation: Option<RemovalCallback>,
}

impl OverlayRequest {
    pub fn new(id: impl Into<OverlayId>, region: Region, priority: i32) -> Self {
        Self {
            id: id.into(),
            region,
            priority,
            hide_after: None,
            on_removed_after_violation: None,
        }
    }

    #[must_use]
    pub fn with_hide_after(mut self, delay: Duration) -> Self {
        self.hide_after = Some(delay);
        self
    }

    #[must_use]
    pub fn on_removed_after_violation<F>(mut self, callback: F) -> Self
    where
        F: Fn(&OverlayId) + 'static,
    {
        self.on_removed_after_violation = Some(Rc::new(callback));
        self
    }
}

impl fmt::Debug for OverlayRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayRequest")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("priority", &self.priority)
            .field("hide_after", &self.hide_after)
            .field(
                "on_removed_after_violation",
                &self.on_removed_after_violation.is_some(),
            )
            .finish()
    }
}

/// Where an overlay asked to be, where rules sent it, and where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Requested region; changed only by an explicit update.
    pub original: Region,
    /// Result of the last rule resolution.
    pub desired: Option<Region>,
    /// Region the overlay is mounted in. `None` until the first mount completes.
    pub current: Option<Region>,
}

impl Placement {
    fn requested(region: Region) -> Self {
        Self {
            original: region,
            desired: None,
            current: None,
        }
    }
}

/// Read-only view of an overlay record.
#[derive(Debug, Clone)]
pub struct OverlaySnapshot {
    pub id: OverlayId,
    pub priority: i32,
    pub created_at: u64,
    pub hide_after: Option<Duration>,
    pub placement: Placement,
    pub node: NodeHandle,
    /// True while a removal animation is running.
    pub removing: bool,
}

pub(crate) struct OverlayRecord {
    pub(crate) id: OverlayId,
    pub(crate) priority: i32,
    pub(crate) created_at: u64,
    pub(crate) hide_after: Option<Duration>,
    pub(crate) on_removed: Option<RemovalCallback>,
    pub(crate) placement: Placement,
    pub(crate) node: NodeHandle,
    pub(crate) removal: Option<Completion>,
}

impl OverlayRecord {
    pub(crate) fn new(request: OverlayRequest, created_at: u64, node: NodeHandle) -> Self {
        Self {
            id: request.id,
            priority: request.priority,
            created_at,
            hide_after: request.hide_after,
            on_removed: request.on_removed_after_violation,
            placement: Placement::requested(request.region),
            node,
            removal: None,
        }
    }

    pub(crate) fn sort_key(&self) -> SortKey {
        SortKey::new(self.priority, self.created_at)
    }

    pub(crate) fn summary(&self) -> OverlaySummary {
        OverlaySummary {
            id: self.id.clone(),
            priority: self.priority,
            created_at: self.created_at,
        }
    }

    pub(crate) fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            id: self.id.clone(),
            priority: self.priority,
            created_at: self.created_at,
            hide_after: self.hide_after,
            placement: self.placement,
            node: self.node.clone(),
            removing: self.removal.is_some(),
        }
    }
}

/// Overlay records keyed by id, iterable in registration order.
#[derive(Default)]
pub(crate) struct OverlayStore {
    records: HashMap<OverlayId, OverlayRecord>,
    order: Vec<OverlayId>,
}

impl OverlayStore {
    pub(crate) fn get(&self, id: &OverlayId) -> Option<&OverlayRecord> {
        self.records.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &OverlayId) -> Option<&mut OverlayRecord> {
        self.records.get_mut(id)
    }

    pub(crate) fn contains(&self, id: &OverlayId) -> bool {
        self.records.contains_key(id)
    }

    /// Adds a record. The caller guarantees the id is new.
    pub(crate) fn insert(&mut self, record: OverlayRecord) {
        self.order.push(record.id.clone());
        self.records.insert(record.id.clone(), record);
    }

    pub(crate) fn remove(&mut self, id: &OverlayId) -> Option<OverlayRecord> {
        let record = self.records.remove(id)?;
        self.order.retain(|other| other != id);
        Some(record)
    }

    /// Records in registration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &OverlayRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn summary(&self, id: &OverlayId) -> Option<OverlaySummary> {
        self.records.get(id).map(OverlayRecord::summary)
    }

    /// Consumes the store, returning every node.
    pub(crate) fn into_nodes(self) -> Vec<NodeHandle> {
        self.records.into_values().map(|record| record.node).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, priority: i32, created_at: u64) -> OverlayRecord {
        OverlayRecord::new(
            OverlayRequest::new(id, Region::TopLeft, priority),
            created_at,
            NodeHandle::new(OverlayId::from(id)),
        )
    }

    #[test]
    fn store_iterates_in_registration_order() {
        let mut store = OverlayStore::default();
        store.insert(record("b", 0, 1));
        store.insert(record("a", 0, 2));
        store.insert(record("c", 0, 3));
        store.remove(&OverlayId::from("a"));

        let ids: Vec<_> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn new_record_starts_unplaced() {
        let record = record("a", 4, 7);
        assert_eq!(record.placement.original, Region::TopLeft);
        assert_eq!(record.placement.desired, None);
        assert_eq!(record.placement.current, None);
        assert_eq!(record.sort_key(), SortKey::new(4, 7));
        assert!(!record.snapshot().removing);
    }

    #[test]
    fn request_debug_hides_callback_body() {
        let request = OverlayRequest::new("a", Region::TopLeft, 0).on_removed_after_violation(|_| {});
        let text = format!("{:?}", request);
        assert!(text.contains("on_removed_after_violation: true"));
    }
}
