// SPDX-License-Identifier: MPL-2.0
//! Retained rendering handles: overlay nodes and region containers.
//!
//! A [`ContainerHandle`] owns its children in render order. A [`NodeHandle`]
//! only keeps a weak back-reference to its parent, so dropping a container
//! never leaks nodes and a detached node simply has no parent.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::domain::{OverlayId, Region};

/// Measured content size of a node, used by animators as the grow target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Width the node settles at once an animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalWidth {
    /// Shrink to content.
    #[default]
    Auto,
    /// Span the whole container.
    Full,
}

impl FinalWidth {
    /// Width mode used for nodes hosted in `region`.
    #[must_use]
    pub fn for_region(region: Region) -> Self {
        if region.is_full_width() {
            FinalWidth::Full
        } else {
            FinalWidth::Auto
        }
    }
}

/// Visual phase of a node, driven by the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visual {
    /// Created but never shown.
    #[default]
    Hidden,
    Entering,
    Shown,
    Leaving,
    /// Faded out and collapsed to zero height.
    Collapsed,
}

struct NodeInner {
    id: OverlayId,
    parent: RefCell<Weak<ContainerInner>>,
    visual: Cell<Visual>,
    width: Cell<FinalWidth>,
    size_hint: Cell<Option<Size>>,
}

/// Rendering node of one overlay.
///
/// Created once at registration and reused for the overlay's whole life.
/// Clones share the same node; equality is identity.
#[derive(Clone)]
pub struct NodeHandle(Rc<NodeInner>);

impl NodeHandle {
    #[must_use]
    pub fn new(id: OverlayId) -> Self {
        Self(Rc::new(NodeInner {
            id,
            parent: RefCell::new(Weak::new()),
            visual: Cell::new(Visual::Hidden),
            width: Cell::new(FinalWidth::Auto),
            size_hint: Cell::new(None),
        }))
    }

    #[must_use]
    pub fn id(&self) -> &OverlayId {
        &self.0.id
    }

    /// Container currently holding this node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<ContainerHandle> {
        self.0.parent.borrow().upgrade().map(ContainerHandle)
    }

    /// Removes the node from its container. No-op when already detached.
    pub fn detach(&self) {
        let parent = self.0.parent.replace(Weak::new());
        if let Some(container) = parent.upgrade() {
            container
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(&child.0, &self.0));
        }
    }

    #[must_use]
    pub fn visual(&self) -> Visual {
        self.0.visual.get()
    }

    pub fn set_visual(&self, visual: Visual) {
        self.0.visual.set(visual);
    }

    #[must_use]
    pub fn final_width(&self) -> FinalWidth {
        self.0.width.get()
    }

    pub fn set_final_width(&self, width: FinalWidth) {
        self.0.width.set(width);
    }

    /// Size of the node's content as last reported by the embedder.
    #[must_use]
    pub fn size_hint(&self) -> Option<Size> {
        self.0.size_hint.get()
    }

    pub fn set_size_hint(&self, size: Option<Size>) {
        self.0.size_hint.set(size);
    }

    fn attach_to(&self, container: &ContainerHandle) {
        *self.0.parent.borrow_mut() = Rc::downgrade(&container.0);
    }
}

impl PartialEq for NodeHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeHandle {}

impl std::fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeHandle")
            .field("id", &self.0.id)
            .field("visual", &self.0.visual.get())
            .finish()
    }
}

struct ContainerInner {
    id: String,
    region: Region,
    children: RefCell<Vec<NodeHandle>>,
}

/// Region container holding overlay nodes in render order.
#[derive(Clone)]
pub struct ContainerHandle(Rc<ContainerInner>);

impl ContainerHandle {
    #[must_use]
    pub fn new(id: impl Into<String>, region: Region) -> Self {
        Self(Rc::new(ContainerInner {
            id: id.into(),
            region,
            children: RefCell::new(Vec::new()),
        }))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.0.id
    }

    #[must_use]
    pub fn region(&self) -> Region {
        self.0.region
    }

    /// Moves `node` to the end of this container.
    ///
    /// A node already in this container is moved, not duplicated.
    pub fn append(&self, node: &NodeHandle) {
        node.detach();
        self.0.children.borrow_mut().push(node.clone());
        node.attach_to(self);
    }

    /// Moves `node` right before the child with id `next`.
    ///
    /// Appends when `next` is `None` or not a child of this container.
    pub fn insert_before(&self, node: &NodeHandle, next: Option<&OverlayId>) {
        node.detach();
        {
            let mut children = self.0.children.borrow_mut();
            let index = next.and_then(|next| children.iter().position(|c| c.id() == next));
            match index {
                Some(index) => children.insert(index, node.clone()),
                None => children.push(node.clone()),
            }
        }
        node.attach_to(self);
    }

    #[must_use]
    pub fn children(&self) -> Vec<NodeHandle> {
        self.0.children.borrow().clone()
    }

    /// Ids of the children in render order.
    #[must_use]
    pub fn child_ids(&self) -> Vec<OverlayId> {
        self.0
            .children
            .borrow()
            .iter()
            .map(|child| child.id().clone())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, node: &NodeHandle) -> bool {
        self.0.children.borrow().iter().any(|child| child == node)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.children.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.children.borrow().is_empty()
    }

    /// Detaches every child.
    pub fn clear(&self) {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in children {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }
}

impl PartialEq for ContainerHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("id", &self.0.id)
            .field("children", &self.child_ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> NodeHandle {
        NodeHandle::new(OverlayId::from(id))
    }

    fn ids(container: &ContainerHandle) -> Vec<String> {
        container
            .child_ids()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect()
    }

    #[test]
    fn append_moves_existing_child_to_end() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let (a, b) = (node("a"), node("b"));
        container.append(&a);
        container.append(&b);
        container.append(&a);
        assert_eq!(ids(&container), vec!["b", "a"]);
    }

    #[test]
    fn append_moves_node_between_containers() {
        let left = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let right = ContainerHandle::new("root_TOP_RIGHT", Region::TopRight);
        let a = node("a");
        left.append(&a);
        right.append(&a);
        assert!(left.is_empty());
        assert_eq!(a.parent(), Some(right));
    }

    #[test]
    fn insert_before_places_node_ahead_of_sibling() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let (a, b, c) = (node("a"), node("b"), node("c"));
        container.append(&a);
        container.append(&c);
        container.insert_before(&b, Some(c.id()));
        assert_eq!(ids(&container), vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_before_unknown_sibling_appends() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let (a, b) = (node("a"), node("b"));
        container.append(&a);
        container.insert_before(&b, Some(&OverlayId::from("ghost")));
        assert_eq!(ids(&container), vec!["a", "b"]);
    }

    #[test]
    fn detach_clears_parent() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let a = node("a");
        container.append(&a);
        a.detach();
        assert!(a.parent().is_none());
        assert!(container.is_empty());
        // Second detach is harmless
        a.detach();
    }

    #[test]
    fn clear_detaches_every_child() {
        let container = ContainerHandle::new("root_TOP_LEFT", Region::TopLeft);
        let a = node("a");
        container.append(&a);
        container.clear();
        assert!(a.parent().is_none());
    }

    #[test]
    fn final_width_is_full_only_for_full_width_regions() {
        assert_eq!(FinalWidth::for_region(Region::TopFullWidth), FinalWidth::Full);
        assert_eq!(FinalWidth::for_region(Region::BottomFullWidth), FinalWidth::Full);
        assert_eq!(FinalWidth::for_region(Region::TopCenter), FinalWidth::Auto);
    }

    #[test]
    fn node_equality_is_identity() {
        let a = node("a");
        assert_eq!(a, a.clone());
        assert_ne!(a, node("a"));
    }
}
