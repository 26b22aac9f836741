// SPDX-License-Identifier: MPL-2.0
//! The placement engine.
//!
//! [`OverlayState`] owns the overlay registry, the region layout store and the
//! inset store. It decides which region every overlay belongs in, keeps each
//! region's nodes in priority order, animates overlays in, out and between
//! regions, and evicts overlays when a region exceeds its capacity.
//!
//! # Lifecycle
//!
//! ```text
//! UNREGISTERED ─register─► REGISTERED ─animate-in done─► MOUNTED ─remove─► REMOVED
//!                          (current = None)              (current = region)
//!                                                           │  ▲
//!                                                           └──┘ move (out, reinsert, in)
//! ```
//!
//! # Runtime
//!
//! The engine is single-threaded (`!Send`). Layout passes, removals and timers
//! are spawned with [`tokio::task::spawn_local`], so every operation that
//! schedules work must run inside a [`tokio::task::LocalSet`].
//!
//! Continuations re-read records by id after every suspension point and check
//! both the record's creation counter and the store epoch, so work started
//! before a reset never touches the fresh state.

mod context;
mod record;


pub use context::{OverlayContext, OverlayHandle};
pub use record::{OverlayRequest, OverlaySnapshot, Placement, RemovalCallback};

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures_util::future::{self, join_all, FutureExt, LocalBoxFuture};
use tokio::task::spawn_local;
use tokio::time::sleep;
use tracing::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::diagnostics::{DiagnosticsHandle, EngineEvent};
use crate::domain::{InsetId, OverlayId, Region, StaggerStep};
use crate::inset::{self, InsetRecord, InsetRect, InsetStore};
use crate::layout::constraints::{self, ConstraintViolation, ViolationReaction};
use crate::layout::{LayoutStore, ResponsiveRules, SortKey};
use crate::scheduler::{Debounced, Scheduled};
use crate::signal::{completion, resolved, settled, Completion, Outcome};
use crate::surface::{
    Animator, Breakpoints, ContainerHandle, FinalWidth, InstantAnimator, NodeHandle, SurfaceRoot,
    Viewport,
};

use record::{OverlayRecord, OverlayStore};

/// Decides what to evict when a region exceeds its item limit.
pub type ViolationHandler = Box<dyn Fn(&ConstraintViolation) -> ViolationReaction>;

/// The three stores, replaced wholesale on reset.
struct Stores {
    /// Incremented by every reset.
    epoch: u64,
    /// Last creation counter handed out.
    created: u64,
    overlays: OverlayStore,
    layout: LayoutStore,
    insets: InsetStore,
}

impl Stores {
    fn new(epoch: u64) -> Self {
        Self {
            epoch,
            created: 0,
            overlays: OverlayStore::default(),
            layout: LayoutStore::new(),
            insets: InsetStore::new(),
        }
    }
}

/// Stagger counters of one layout pass.
#[derive(Debug, Default)]
struct Batch {
    entering: u32,
    leaving: u32,
}

impl Batch {
    fn next_in(&mut self, step: StaggerStep) -> Duration {
        let delay = step.delay_for(self.entering);
        self.entering += 1;
        delay
    }

    fn next_out(&mut self, step: StaggerStep) -> Duration {
        let delay = step.delay_for(self.leaving);
        self.leaving += 1;
        delay
    }
}

struct Inner {
    config: EngineConfig,
    rules: ResponsiveRules,
    stagger: StaggerStep,
    animator: Rc<dyn Animator>,
    viewport: Rc<dyn Viewport>,
    on_violation: ViolationHandler,
    diagnostics: RefCell<Option<DiagnosticsHandle>>,
    stores: RefCell<Stores>,
    root: RefCell<Rc<SurfaceRoot>>,
    layout_pass: Scheduled<(), ()>,
    inset_pass: Debounced,
}

impl Inner {
    fn root(&self) -> Rc<SurfaceRoot> {
        Rc::clone(&self.root.borrow())
    }

    fn log(&self, event: EngineEvent) {
        if let Some(handle) = self.diagnostics.borrow().as_ref() {
            handle.log(event);
        }
    }

    /// Whether `id` still names the record created at `created_at` in `epoch`.
    fn is_same_record(&self, id: &OverlayId, created_at: u64, epoch: u64) -> bool {
        let stores = self.stores.borrow();
        stores.epoch == epoch
            && stores
                .overlays
                .get(id)
                .is_some_and(|record| record.created_at == created_at)
    }

    // ==========================================================================
    // Registry
    // ==========================================================================

    fn register(&self, request: OverlayRequest) -> NodeHandle {
        let mut stores = self.stores.borrow_mut();
        if let Some(existing) = stores.overlays.get(&request.id) {
            return existing.node.clone();
        }
        stores.created += 1;
        let created_at = stores.created;
        let node = self.root().create_node(request.id.clone());
        let (id, region) = (request.id.clone(), request.region);
        stores
            .overlays
            .insert(OverlayRecord::new(request, created_at, node.clone()));
        drop(stores);

        debug!(id = %id, region = %region, created_at, "overlay registered");
        self.log(EngineEvent::Registered { id, region });
        node
    }

    fn unregister(&self, id: &OverlayId) {
        let record = {
            let mut stores = self.stores.borrow_mut();
            let Some(record) = stores.overlays.remove(id) else {
                return;
            };
            if let Some(region) = stores.layout.region_of(id) {
                stores.layout.remove(region, id, Some(&record.node));
            }
            record
        };
        record.node.detach();

        debug!(id = %id, "overlay unregistered");
        self.log(EngineEvent::Unregistered { id: id.clone() });
    }

    fn update(&self, request: OverlayRequest) -> Outcome<()> {
        {
            let mut stores = self.stores.borrow_mut();
            let Some(record) = stores.overlays.get_mut(&request.id) else {
                return resolved(());
            };
            record.priority = request.priority;
            record.placement.original = request.region;
            record.on_removed = request.on_removed_after_violation;
        }
        self.layout_pass.call(())
    }

    fn set_ready(self: &Rc<Self>, id: &OverlayId) -> Outcome<()> {
        let (hide_after, created_at, epoch) = {
            let stores = self.stores.borrow();
            let Some(record) = stores.overlays.get(id) else {
                return resolved(());
            };
            (record.hide_after, record.created_at, stores.epoch)
        };

        let outcome = self.layout_pass.call(());

        if let Some(delay) = hide_after {
            let weak = Rc::downgrade(self);
            let id = id.clone();
            spawn_local(async move {
                sleep(delay).await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if inner.is_same_record(&id, created_at, epoch) {
                    trace!(id = %id, "hide-after elapsed");
                    // The removal spawns itself.
                    let _ = inner.remove(&id);
                }
            });
        }
        outcome
    }

    fn remove(self: &Rc<Self>, id: &OverlayId) -> Completion {
        let mounted = {
            let stores = self.stores.borrow();
            let Some(record) = stores.overlays.get(id) else {
                return settled();
            };
            if let Some(removal) = &record.removal {
                return removal.clone();
            }
            record
                .placement
                .current
                .map(|region| (record.node.clone(), region, record.created_at, stores.epoch))
        };
        // Never mounted: nothing to animate.
        let Some((node, region, created_at, epoch)) = mounted else {
            self.unregister(id);
            return settled();
        };

        let leaving = self.animator.animate_out(
            &node,
            node.size_hint(),
            FinalWidth::for_region(region),
            Duration::ZERO,
        );
        let weak = Rc::downgrade(self);
        let owned_id = id.clone();
        let removal = completion(async move {
            leaving.await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.is_same_record(&owned_id, created_at, epoch) {
                debug!(id = %owned_id, "overlay removed");
                inner.log(EngineEvent::Removed {
                    id: owned_id.clone(),
                });
                inner.unregister(&owned_id);
            }
        });

        if let Some(record) = self.stores.borrow_mut().overlays.get_mut(id) {
            record.removal = Some(removal.clone());
        }
        spawn_local(removal.clone());
        removal
    }

    // ==========================================================================
    // Layout Pass
    // ==========================================================================

    fn run_layout_pass(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        let entries: Vec<(OverlayId, Region, SortKey)> = self
            .stores
            .borrow()
            .overlays
            .iter()
            .filter(|record| record.removal.is_none())
            .map(|record| (record.id.clone(), record.placement.original, record.sort_key()))
            .collect();
        let keys: HashMap<&OverlayId, SortKey> =
            entries.iter().map(|(id, _, key)| (id, *key)).collect();

        let mut layout = LayoutStore::new();
        for (id, original, key) in &entries {
            let destination = self
                .rules
                .resolve(*original, self.viewport.as_ref())
                .destination;
            layout.insert(destination, id.clone(), *key, |other| keys.get(other).copied());
        }
        self.stores.borrow_mut().layout = layout.clone();

        trace!(overlays = layout.total(), "layout recalculated");
        self.log(EngineEvent::LayoutRecalculated {
            overlays: layout.total(),
        });

        let mut batch = Batch::default();
        let mut work: Vec<LocalBoxFuture<'static, ()>> = Vec::new();
        for (region, ids) in layout.iter() {
            for id in ids {
                if let Some(animation) = self.place(id, region, &mut batch) {
                    work.push(animation);
                }
            }
        }
        work.push(self.enforce_constraints());

        join_all(work).map(drop).boxed_local()
    }

    /// Brings one overlay to `region`, returning the animation if one started.
    fn place(
        self: &Rc<Self>,
        id: &OverlayId,
        region: Region,
        batch: &mut Batch,
    ) -> Option<LocalBoxFuture<'static, ()>> {
        let (node, current, created_at, epoch) = {
            let mut stores = self.stores.borrow_mut();
            let epoch = stores.epoch;
            let record = stores.overlays.get_mut(id)?;
            record.placement.desired = Some(region);
            (
                record.node.clone(),
                record.placement.current,
                record.created_at,
                epoch,
            )
        };
        let container = self.root().container(region);
        let width = FinalWidth::for_region(region);

        match current {
            Some(current) if current == region => {
                // Re-appending in list order keeps render order in sync.
                if let Some(container) = container {
                    container.append(&node);
                }
                None
            }
            None => {
                let container = container?;
                container.append(&node);
                let delay = batch.next_in(self.stagger);
                let entering = self
                    .animator
                    .animate_in(&node, node.size_hint(), width, delay);
                let weak = Rc::downgrade(self);
                let id = id.clone();
                Some(
                    async move {
                        entering.await;
                        if let Some(inner) = weak.upgrade() {
                            inner.finish_mount(&id, created_at, epoch, region);
                        }
                    }
                    .boxed_local(),
                )
            }
            Some(previous) => {
                let out_delay = batch.next_out(self.stagger);
                let in_delay = batch.next_in(self.stagger);
                let leaving = self.animator.animate_out(
                    &node,
                    node.size_hint(),
                    FinalWidth::for_region(previous),
                    out_delay,
                );
                let weak = Rc::downgrade(self);
                let id = id.clone();
                Some(
                    async move {
                        leaving.await;
                        let Some(inner) = weak.upgrade() else {
                            return;
                        };
                        let entering =
                            inner.finish_move(&id, created_at, epoch, previous, in_delay);
                        if let Some(entering) = entering {
                            entering.await;
                        }
                    }
                    .boxed_local(),
                )
            }
        }
    }

    fn finish_mount(&self, id: &OverlayId, created_at: u64, epoch: u64, region: Region) {
        {
            let mut stores = self.stores.borrow_mut();
            if stores.epoch != epoch {
                return;
            }
            match stores.overlays.get_mut(id) {
                Some(record) if record.created_at == created_at => {
                    record.placement.current = Some(region);
                }
                _ => return,
            }
        }
        debug!(id = %id, region = %region, "overlay mounted");
        self.log(EngineEvent::Mounted {
            id: id.clone(),
            region,
        });
    }

    /// Second half of a move: reinserts the node where the live record now
    /// belongs and starts its entering animation.
    fn finish_move(
        &self,
        id: &OverlayId,
        created_at: u64,
        epoch: u64,
        from: Region,
        delay: Duration,
    ) -> Option<Completion> {
        let (node, destination, following) = {
            let mut stores = self.stores.borrow_mut();
            if stores.epoch != epoch {
                return None;
            }
            let record = stores
                .overlays
                .get_mut(id)
                .filter(|record| record.created_at == created_at && record.removal.is_none())?;
            let destination = record.placement.desired?;
            record.placement.current = Some(destination);
            let node = record.node.clone();

            let order = stores.layout.get(destination);
            let following: Vec<OverlayId> = order
                .iter()
                .position(|other| other == id)
                .map(|index| order[index + 1..].to_vec())
                .unwrap_or_default();
            (node, destination, following)
        };

        match self.root().container(destination) {
            Some(container) => {
                // Siblings still moving in are not children yet.
                let children = container.child_ids();
                let next = following.iter().find(|next| children.contains(*next));
                container.insert_before(&node, next);
            }
            None => node.detach(),
        }

        debug!(id = %id, from = %from, to = %destination, "overlay moved");
        self.log(EngineEvent::Moved {
            id: id.clone(),
            from,
            to: destination,
        });

        Some(self.animator.animate_in(
            &node,
            node.size_hint(),
            FinalWidth::for_region(destination),
            delay,
        ))
    }

    // ==========================================================================
    // Capacity Constraints
    // ==========================================================================

    fn enforce_constraints(self: &Rc<Self>) -> LocalBoxFuture<'static, ()> {
        let limits = constraints::active_limits(&self.rules, self.viewport.as_ref());
        let violations = {
            let stores = self.stores.borrow();
            constraints::find_violations(&stores.layout, &limits, |id| {
                stores.overlays.summary(id)
            })
        };

        let mut removals: Vec<LocalBoxFuture<'static, ()>> = Vec::new();
        let mut evicted = HashSet::new();
        for violation in violations {
            warn!(
                region = %violation.region,
                count = violation.overlays.len(),
                max = violation.max,
                "region over capacity"
            );
            self.log(EngineEvent::ConstraintViolated {
                region: violation.region,
                count: violation.overlays.len(),
                max: violation.max,
            });

            let reaction = (self.on_violation)(&violation);
            for id in reaction.removals(&violation) {
                if !evicted.insert(id.clone()) {
                    continue;
                }
                let callback = {
                    let stores = self.stores.borrow();
                    match stores.overlays.get(&id) {
                        Some(record) => record.on_removed.clone(),
                        None => continue,
                    }
                };
                debug!(id = %id, region = %violation.region, "evicting overlay");
                self.log(EngineEvent::Evicted {
                    id: id.clone(),
                    region: violation.region,
                });

                let removal = self.remove(&id);
                removals.push(
                    async move {
                        removal.await;
                        if let Some(callback) = callback {
                            callback(&id);
                        }
                    }
                    .boxed_local(),
                );
            }
        }
        join_all(removals).map(drop).boxed_local()
    }

    // ==========================================================================
    // Insets
    // ==========================================================================

    fn apply_insets(&self) {
        // Measuring calls into embedder code; aggregate a copy.
        let insets = self.stores.borrow().insets.clone();
        let rect = inset::aggregate(&insets);
        self.root().apply_insets(rect);
        trace!(insets = %rect, "insets applied");
        self.log(EngineEvent::InsetsApplied {
            top: rect.top,
            bottom: rect.bottom,
            left: rect.left,
            right: rect.right,
        });
    }

    // ==========================================================================
    // Reset
    // ==========================================================================

    fn reset(&self) {
        self.inset_pass.cancel();
        let previous = {
            let mut stores = self.stores.borrow_mut();
            let epoch = stores.epoch + 1;
            std::mem::replace(&mut *stores, Stores::new(epoch))
        };
        for node in previous.overlays.into_nodes() {
            node.detach();
        }
        let fresh = Rc::new(SurfaceRoot::new(
            self.config.root_id.as_str(),
            &self.config.regions,
        ));
        self.root.replace(fresh).teardown();

        debug!("engine reset");
        self.log(EngineEvent::Reset);
    }
}

/// Builder for [`OverlayState`].
pub struct OverlayStateBuilder {
    config: EngineConfig,
    animator: Rc<dyn Animator>,
    viewport: Rc<dyn Viewport>,
    on_violation: ViolationHandler,
    diagnostics: Option<DiagnosticsHandle>,
}

impl OverlayStateBuilder {
    /// Animator used for every transition. Defaults to [`InstantAnimator`].
    #[must_use]
    pub fn with_animator(mut self, animator: Rc<dyn Animator>) -> Self {
        self.animator = animator;
        self
    }

    /// Viewport answering breakpoint queries. Defaults to an empty
    /// [`Breakpoints`], which only matches `"all"`.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Rc<dyn Viewport>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Handler consulted when a region exceeds its item limit.
    ///
    /// Without one, the oldest overlays are evicted.
    #[must_use]
    pub fn on_constraint_violation<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ConstraintViolation) -> ViolationReaction + 'static,
    {
        self.on_violation = Box::new(handler);
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, handle: DiagnosticsHandle) -> Self {
        self.diagnostics = Some(handle);
        self
    }

    #[must_use]
    pub fn build(self) -> OverlayState {
        let rules = self.config.responsive_rules();
        let stagger = self.config.stagger_step();
        let interval = self.config.recalculate_interval().as_duration();
        let debounce = self.config.inset_debounce().as_duration();
        let root = SurfaceRoot::new(self.config.root_id.as_str(), &self.config.regions);

        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let layout_weak = weak.clone();
            let layout_pass = Scheduled::new(
                move |()| match layout_weak.upgrade() {
                    Some(inner) => inner.run_layout_pass(),
                    None => future::ready(()).boxed_local(),
                },
                interval,
            );
            let inset_weak = weak.clone();
            let inset_pass = Debounced::new(
                move || {
                    if let Some(inner) = inset_weak.upgrade() {
                        inner.apply_insets();
                    }
                },
                debounce,
            );

            Inner {
                config: self.config,
                rules,
                stagger,
                animator: self.animator,
                viewport: self.viewport,
                on_violation: self.on_violation,
                diagnostics: RefCell::new(self.diagnostics),
                stores: RefCell::new(Stores::new(0)),
                root: RefCell::new(Rc::new(root)),
                layout_pass,
                inset_pass,
            }
        });
        OverlayState { inner }
    }
}

/// Placement engine for transient overlays.
///
/// Cheap to clone; clones share the same state.
///
/// # Example
///
/// ```
/// use overlay_regions::config::EngineConfig;
/// use overlay_regions::domain::Region;
/// use overlay_regions::engine::{OverlayRequest, OverlayState};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let local = tokio::task::LocalSet::new();
/// local
///     .run_until(async {
///         let state = OverlayState::new(EngineConfig::default());
///         let id = "saved".into();
///         state.register_overlay(OverlayRequest::new("saved", Region::TopRight, 0));
///         state.set_overlay_ready(&id).await.expect("layout pass runs");
///
///         let placed = state.overlay(&id).expect("overlay is registered");
///         assert_eq!(placed.placement.current, Some(Region::TopRight));
///     })
///     .await;
/// # }
/// ```
#[derive(Clone)]
pub struct OverlayState {
    inner: Rc<Inner>,
}

impl OverlayState {
    /// Creates an engine with the default animator and viewport.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::builder(config).build()
    }

    #[must_use]
    pub fn builder(config: EngineConfig) -> OverlayStateBuilder {
        OverlayStateBuilder {
            config,
            animator: Rc::new(InstantAnimator),
            viewport: Rc::new(Breakpoints::new()),
            on_violation: Box::new(|_| ViolationReaction::RemoveOldestAuto),
            diagnostics: None,
        }
    }

    /// Attaches (or replaces) the diagnostics handle.
    pub fn set_diagnostics(&self, handle: DiagnosticsHandle) {
        *self.inner.diagnostics.borrow_mut() = Some(handle);
    }

    // ==========================================================================
    // Overlays
    // ==========================================================================

    /// Registers an overlay and returns its node.
    ///
    /// Registering an id twice returns the node created the first time and
    /// leaves the existing record untouched. The overlay is not placed until
    /// the next layout pass.
    pub fn register_overlay(&self, request: OverlayRequest) -> NodeHandle {
        self.inner.register(request)
    }

    /// Deletes the record and detaches its node at once, without animation.
    ///
    /// Unknown ids are ignored.
    pub fn unregister_overlay(&self, id: &OverlayId) {
        self.inner.unregister(id);
    }

    /// Updates priority, requested region and eviction callback in place,
    /// then schedules a layout pass. Unknown ids are ignored.
    pub fn update_overlay(&self, request: OverlayRequest) -> Outcome<()> {
        self.inner.update(request)
    }

    /// Marks an overlay as ready to be shown and schedules a layout pass.
    ///
    /// When the overlay has a `hide_after` delay its removal is scheduled too.
    pub fn set_overlay_ready(&self, id: &OverlayId) -> Outcome<()> {
        self.inner.set_ready(id)
    }

    /// Animates a mounted overlay out, then unregisters it.
    ///
    /// A removal already in progress is shared. An overlay that never
    /// mounted is unregistered at once, and unknown ids settle immediately.
    pub fn remove_overlay(&self, id: &OverlayId) -> Completion {
        self.inner.remove(id)
    }

    /// Schedules a layout pass.
    pub fn recalculate_layout(&self) -> Outcome<()> {
        self.inner.layout_pass.call(())
    }

    // ==========================================================================
    // Insets
    // ==========================================================================

    /// Creates or replaces an inset source and schedules aggregation.
    pub fn set_inset(&self, record: InsetRecord) {
        self.inner.stores.borrow_mut().insets.set(record);
        self.inner.inset_pass.call();
    }

    /// Removes an inset source and schedules aggregation.
    pub fn remove_inset(&self, id: &InsetId) {
        self.inner.stores.borrow_mut().insets.remove(id);
        self.inner.inset_pass.call();
    }

    /// Schedules aggregation, e.g. after a measured element resized.
    pub fn recalculate_insets(&self) {
        self.inner.inset_pass.call();
    }

    /// Insets currently applied to the root.
    #[must_use]
    pub fn insets(&self) -> InsetRect {
        self.inner.root().insets()
    }

    // ==========================================================================
    // Reset
    // ==========================================================================

    /// Discards every overlay, inset and the rendering root.
    ///
    /// The creation counter restarts, so the engine behaves like a fresh one.
    pub fn reset(&self) {
        self.inner.reset();
    }

    // ==========================================================================
    // Queries
    // ==========================================================================

    #[must_use]
    pub fn overlay(&self, id: &OverlayId) -> Option<OverlaySnapshot> {
        self.inner
            .stores
            .borrow()
            .overlays
            .get(id)
            .map(OverlayRecord::snapshot)
    }

    #[must_use]
    pub fn contains(&self, id: &OverlayId) -> bool {
        self.inner.stores.borrow().overlays.contains(id)
    }

    /// Number of registered overlays.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.stores.borrow().overlays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of `region` in render order, as of the last layout pass.
    #[must_use]
    pub fn layout(&self, region: Region) -> Vec<OverlayId> {
        self.inner.stores.borrow().layout.get(region).to_vec()
    }

    /// Copy of the whole layout store.
    #[must_use]
    pub fn layout_store(&self) -> LayoutStore {
        self.inner.stores.borrow().layout.clone()
    }

    #[must_use]
    pub fn root(&self) -> Rc<SurfaceRoot> {
        self.inner.root()
    }

    #[must_use]
    pub fn container(&self, region: Region) -> Option<ContainerHandle> {
        self.inner.root().container(region)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }
}

impl std::fmt::Debug for OverlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayState")
            .field("root", &self.inner.config.root_id)
            .field("overlays", &self.len())
            .finish()
    }
}
