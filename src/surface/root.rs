// SPDX-License-Identifier: MPL-2.0
//! The rendering root: one container per enabled region plus the applied
//! safe-area insets.

use std::cell::Cell;

use crate::domain::{OverlayId, Region};
use crate::inset::InsetRect;

use super::node::{ContainerHandle, NodeHandle};

/// Builds the identifier of a region container, e.g. `rom-portal_TOP_LEFT`.
#[must_use]
pub fn container_id(root_id: &str, region: Region) -> String {
    format!("{}_{}", root_id, region)
}

#[derive(Debug)]
pub struct SurfaceRoot {
    id: String,
    containers: Vec<ContainerHandle>,
    insets: Cell<InsetRect>,
}

impl SurfaceRoot {
    /// Creates a root with a container for each of `regions`.
    ///
    /// Duplicate regions are ignored.
    #[must_use]
    pub fn new(id: impl Into<String>, regions: &[Region]) -> Self {
        let id = id.into();
        let mut containers: Vec<ContainerHandle> = Vec::with_capacity(regions.len());
        for &region in regions {
            if containers.iter().all(|c| c.region() != region) {
                containers.push(ContainerHandle::new(container_id(&id, region), region));
            }
        }
        Self {
            id,
            containers,
            insets: Cell::new(InsetRect::default()),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Creates the rendering node for an overlay.
    #[must_use]
    pub fn create_node(&self, id: OverlayId) -> NodeHandle {
        NodeHandle::new(id)
    }

    /// Container of `region`, or `None` if the region is not enabled.
    #[must_use]
    pub fn container(&self, region: Region) -> Option<ContainerHandle> {
        self.containers
            .iter()
            .find(|container| container.region() == region)
            .cloned()
    }

    #[must_use]
    pub fn containers(&self) -> &[ContainerHandle] {
        &self.containers
    }

    /// Safe-area insets currently applied to the root.
    #[must_use]
    pub fn insets(&self) -> InsetRect {
        self.insets.get()
    }

    pub fn apply_insets(&self, insets: InsetRect) {
        self.insets.set(insets);
    }

    /// Detaches every node from every container.
    pub fn teardown(&self) {
        for container in &self.containers {
            container.clear();
        }
        self.insets.set(InsetRect::default());
    }
}
