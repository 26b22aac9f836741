// SPDX-License-Identifier: MPL-2.0
//! Region layout store: one ordered id list per region.

use crate::domain::{OverlayId, Region};
use crate::surface::NodeHandle;

use super::ordered::{self, SortKey};

/// Render order of every region.
///
/// A fresh store has an empty list for every region; lists are never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutStore {
    regions: [Vec<OverlayId>; Region::COUNT],
}

impl LayoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of `region` in render order.
    #[must_use]
    pub fn get(&self, region: Region) -> &[OverlayId] {
        &self.regions[region.index()]
    }

    /// Inserts `id` into `region` at its priority position.
    pub fn insert<F>(&mut self, region: Region, id: OverlayId, key: SortKey, key_of: F)
    where
        F: Fn(&OverlayId) -> Option<SortKey>,
    {
        ordered::insert(id, key, &mut self.regions[region.index()], key_of);
    }

    /// Removes `id` from `region`, detaching `node` if it was listed there.
    pub fn remove(&mut self, region: Region, id: &OverlayId, node: Option<&NodeHandle>) -> bool {
        ordered::remove(id, &mut self.regions[region.index()], node)
    }

    /// Position of `id` within `region`.
    #[must_use]
    pub fn position(&self, region: Region, id: &OverlayId) -> Option<usize> {
        self.get(region).iter().position(|other| other == id)
    }

    /// Region whose list holds `id`.
    #[must_use]
    pub fn region_of(&self, id: &OverlayId) -> Option<Region> {
        Region::ALL
            .into_iter()
            .find(|&region| self.get(region).contains(id))
    }

    /// Regions with their lists, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, &[OverlayId])> {
        Region::ALL
            .into_iter()
            .map(move |region| (region, self.get(region)))
    }

    /// Number of overlays across all regions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.regions.iter().map(Vec::len).sum()
    }
}
