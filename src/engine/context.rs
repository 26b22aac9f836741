// SPDX-License-Identifier: MPL-2.0
//! Registration surface for overlay components.
//!
//! Components talk to the engine through [`OverlayContext`] so they can be
//! tested against a fake. [`OverlayHandle`] ties an overlay's registration
//! to the lifetime of the component owning it.

use std::cell::Cell;

use crate::domain::{InsetId, OverlayId};
use crate::inset::{InsetRecord, InsetRect};
use crate::signal::{Completion, Outcome};
use crate::surface::NodeHandle;

use super::{OverlayRequest, OverlayState};

/// Operations available to overlay components.
pub trait OverlayContext {
    /// Registers an overlay, returning its (possibly pre-existing) node.
    fn register_overlay(&self, request: OverlayRequest) -> NodeHandle;

    fn unregister_overlay(&self, id: &OverlayId);

    /// Replaces priority, requested region and eviction callback.
    fn update_overlay_record(&self, request: OverlayRequest) -> Outcome<()>;

    fn set_overlay_ready(&self, id: &OverlayId) -> Outcome<()>;

    fn remove_overlay(&self, id: &OverlayId) -> Completion;

    fn set_inset(&self, record: InsetRecord);

    fn remove_inset(&self, id: &InsetId);

    fn recalculate_insets(&self);

    /// Insets currently reserved around the overlay root.
    fn safe_area(&self) -> InsetRect;

    /// Drops every overlay and inset.
    fn clear(&self);
}

impl OverlayContext for OverlayState {
    fn register_overlay(&self, request: OverlayRequest) -> NodeHandle {
        OverlayState::register_overlay(self, request)
    }

    fn unregister_overlay(&self, id: &OverlayId) {
        OverlayState::unregister_overlay(self, id);
    }

    fn update_overlay_record(&self, request: OverlayRequest) -> Outcome<()> {
        self.update_overlay(request)
    }

    fn set_overlay_ready(&self, id: &OverlayId) -> Outcome<()> {
        OverlayState::set_overlay_ready(self, id)
    }

    fn remove_overlay(&self, id: &OverlayId) -> Completion {
        OverlayState::remove_overlay(self, id)
    }

    fn set_inset(&self, record: InsetRecord) {
        OverlayState::set_inset(self, record);
    }

    fn remove_inset(&self, id: &InsetId) {
        OverlayState::remove_inset(self, id);
    }

    fn recalculate_insets(&self) {
        OverlayState::recalculate_insets(self);
    }

    fn safe_area(&self) -> InsetRect {
        self.insets()
    }

    fn clear(&self) {
        self.reset();
    }
}

/// Registration owned by a component.
///
/// Dropping the handle unregisters the overlay at once, unless it was
/// dismissed, in which case the removal animation runs to completion.
pub struct OverlayHandle<C: OverlayContext> {
    context: C,
    id: OverlayId,
    node: NodeHandle,
    dismissed: Cell<bool>,
}

impl<C: OverlayContext> OverlayHandle<C> {
    pub fn register(context: C, request: OverlayRequest) -> Self {
        let id = request.id.clone();
        let node = context.register_overlay(request);
        Self {
            context,
            id,
            node,
            dismissed: Cell::new(false),
        }
    }

    #[must_use]
    pub fn id(&self) -> &OverlayId {
        &self.id
    }

    #[must_use]
    pub fn node(&self) -> &NodeHandle {
        &self.node
    }

    /// Marks the overlay ready to be shown.
    pub fn ready(&self) -> Outcome<()> {
        self.context.set_overlay_ready(&self.id)
    }

    /// Updates the record; the request's id is replaced by the handle's.
    pub fn update(&self, mut request: OverlayRequest) -> Outcome<()> {
        request.id = self.id.clone();
        self.context.update_overlay_record(request)
    }

    /// Starts the removal animation.
    pub fn dismiss(&self) -> Completion {
        self.dismissed.set(true);
        self.context.remove_overlay(&self.id)
    }
}

impl<C: OverlayContext> Drop for OverlayHandle<C> {
    fn drop(&mut self) {
        if !self.dismissed.get() {
            self.context.unregister_overlay(&self.id);
        }
    }
}

impl<C: OverlayContext> std::fmt::Debug for OverlayHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayHandle")
            .field("id", &self.id)
            .field("dismissed", &self.dismissed.get())
            .finish()
    }
}
