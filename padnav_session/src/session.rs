// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The transactional session lifecycle.
//!
//! A [`Session`] is the single writer over the navigation graph, the cursor,
//! and the acquired input bindings. Its invariants:
//!
//! - bindings non-empty ⇒ the session is active;
//! - active ⇒ exactly one valid current-focus index.
//!
//! [`Session::enable`] is all-or-nothing: graph, default focus, and all six
//! control bindings either commit together or every partial effect is rolled
//! back, so no intermediate input state is ever observable from outside.
//! [`Session::disable`] releases everything but deliberately keeps the graph,
//! so an immediate re-enable with the same root set skips discovery entirely.
//!
//! All collaborators are passed explicitly at each entry point; the session
//! owns no clock, no timers, and holds no references into the host.

use alloc::vec::Vec;
use core::hash::Hash;
use smallvec::SmallVec;

use padnav_graph::{
    Direction, GraphError, NavGraph, NodeIndex, ReusePolicy, adjacency,
    ElementDiscovery, GeometrySource,
};

use crate::cursor::{Cursor, CursorState};
use crate::host::{BindingId, Control, CursorVisual, ExclusiveLock, InputDispatch, OverlayHost};
use crate::overlay::OverlayArbiter;
use crate::scheduler::{Generation, RebuildScheduler};

/// Externally observable session status. The enabling phase inside a single
/// [`Session::enable`] call is never visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// No bindings held, no focus.
    Inactive,
    /// Bindings held, exactly one focused element.
    Active,
}

/// Why an enable attempt did not commit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnableError {
    /// The external exclusive lock is asserted; nothing was attempted.
    Locked,
    /// The session is already active.
    AlreadyActive,
    /// The root set was empty; nothing was attempted.
    NoRoots,
    /// Discovery produced no navigable elements. A normal state, not a
    /// fault; the host simply has nothing to navigate right now.
    NoElements,
    /// The input dispatcher refused this control; the attempt was rolled
    /// back completely.
    BindingFailed(Control),
}

impl core::fmt::Display for EnableError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Locked => write!(f, "exclusive lock is asserted"),
            Self::AlreadyActive => write!(f, "session is already active"),
            Self::NoRoots => write!(f, "no root containers"),
            Self::NoElements => write!(f, "no navigable elements"),
            Self::BindingFailed(control) => write!(f, "could not acquire binding for {control:?}"),
        }
    }
}

impl core::error::Error for EnableError {}

/// Result of a single navigation step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Focus moved to a neighbor.
    Moved,
    /// No neighbor in that direction; focus stays put.
    AtEdge,
    /// A cached neighbor no longer matches the world. The graph was
    /// invalidated and a rebuild requested; this step was a silent no-op.
    Stale,
    /// The session is not active.
    Inactive,
    /// The exclusive lock is asserted.
    Locked,
}

/// Result of a debounced rebuild evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// The timer's generation was superseded; nothing was evaluated.
    StaleTimer,
    /// The exclusive lock was asserted when the timer fired; any active
    /// session was torn down.
    LockedOut,
    /// The visible root set is empty; any active session was torn down.
    TornDown,
    /// The existing graph still applies; nothing changed.
    AlreadyCurrent,
    /// The session was started from inactive.
    Enabled,
    /// Composition drift: the session was torn down, rebuilt, and restarted.
    Rebuilt,
    /// The (re)start failed; the session is inactive.
    Failed(EnableError),
}

/// The process-wide navigation session.
///
/// One instance exists per host process; pass it explicitly rather than
/// stashing it in a global.
pub struct Session<K> {
    graph: NavGraph<K>,
    reuse: ReusePolicy,
    scheduler: RebuildScheduler,
    cursor: Cursor,
    arbiter: OverlayArbiter<K>,
    status: SessionStatus,
    focus: Option<NodeIndex>,
    /// Handle mirror of `focus`, kept so the previously-focused element can
    /// be carried into a rebuild even after the graph was invalidated.
    focus_key: Option<K>,
    bindings: SmallVec<[(Control, BindingId); 6]>,
    last_roots: Vec<K>,
    /// Set when a change notification arrives; cleared once a build or a
    /// guard-verified reuse confirms the composition. While clear, an
    /// enable with the same root set may reuse the graph without running
    /// discovery at all.
    composition_suspect: bool,
}

impl<K> core::fmt::Debug for Session<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.status)
            .field("focus", &self.focus)
            .field("bindings", &self.bindings.len())
            .field("graph", &self.graph)
            .field("cursor", &self.cursor.state())
            .finish_non_exhaustive()
    }
}

impl<K> Default for Session<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Session<K> {
    /// Create an inactive session with default policies.
    pub fn new() -> Self {
        Self::with_policies(ReusePolicy::default(), RebuildScheduler::new())
    }

    /// Create an inactive session with explicit reuse and debounce policies.
    pub fn with_policies(reuse: ReusePolicy, scheduler: RebuildScheduler) -> Self {
        Self {
            graph: NavGraph::new(),
            reuse,
            scheduler,
            cursor: Cursor::new(),
            arbiter: OverlayArbiter::new(),
            status: SessionStatus::Inactive,
            focus: None,
            focus_key: None,
            bindings: SmallVec::new(),
            last_roots: Vec::new(),
            composition_suspect: false,
        }
    }

    /// Current status.
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the session is active.
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::Active)
    }

    /// Number of bindings currently held. Non-zero only while active.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Current cursor state.
    pub const fn cursor_state(&self) -> CursorState {
        self.cursor.state()
    }

    /// Read access to the graph, mainly for inspection and tests.
    pub const fn graph(&self) -> &NavGraph<K> {
        &self.graph
    }

    /// Note a change notification (root visibility, content) and re-arm the
    /// debounce window. The host should arm a timer for the debounce delay
    /// and hand the returned generation to [`Session::on_timer`].
    pub fn request_rebuild(&mut self, now_ms: u64) -> Generation {
        self.composition_suspect = true;
        self.scheduler.request_rebuild(now_ms)
    }

    /// The pending rebuild generation whose deadline has passed, for hosts
    /// that poll instead of arming exact timers.
    pub fn rebuild_due(&self, now_ms: u64) -> Option<Generation> {
        self.scheduler.due(now_ms)
    }
}

impl<K: Copy + Eq + Hash> Session<K> {
    /// Handle of the currently focused element, while active.
    pub fn focus_handle(&self) -> Option<K> {
        if self.is_active() { self.focus_key } else { None }
    }

    /// Enable navigation over the given root containers.
    ///
    /// Preconditions: exclusive lock clear, session inactive, non-empty root
    /// set. The attempt is all-or-nothing; on any failure every effect of
    /// this call is rolled back and the error says what stopped it. A graph
    /// built by a failed attempt is invalidated, never kept half-formed; a
    /// reused graph survives the failure untouched.
    pub fn enable<D, G, I, L, V, O>(
        &mut self,
        roots: &[K],
        discovery: &D,
        geometry: &G,
        input: &mut I,
        lock: &L,
        visual: &mut V,
        overlay: &mut O,
        now_ms: u64,
    ) -> Result<(), EnableError>
    where
        D: ElementDiscovery<K>,
        G: GeometrySource<K>,
        I: InputDispatch<K>,
        L: ExclusiveLock,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        self.enable_inner(roots, None, discovery, geometry, input, lock, visual, overlay, now_ms)
    }

    fn enable_inner<D, G, I, L, V, O>(
        &mut self,
        roots: &[K],
        carry_focus: Option<K>,
        discovery: &D,
        geometry: &G,
        input: &mut I,
        lock: &L,
        visual: &mut V,
        overlay: &mut O,
        now_ms: u64,
    ) -> Result<(), EnableError>
    where
        D: ElementDiscovery<K>,
        G: GeometrySource<K>,
        I: InputDispatch<K>,
        L: ExclusiveLock,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        if lock.is_locked() {
            return Err(EnableError::Locked);
        }
        if self.is_active() {
            return Err(EnableError::AlreadyActive);
        }
        if roots.is_empty() {
            return Err(EnableError::NoRoots);
        }

        // Step 1: obtain a graph, cheapest path first.
        let newly_built = if !self.composition_suspect
            && self.same_roots(roots)
            && self.reuse.fresh(&self.graph, now_ms)
        {
            // Show/hide toggle of an unchanged composition: reuse without
            // even running discovery.
            false
        } else {
            let candidates = discovery.discover(roots);
            let survivors: Vec<K> = candidates
                .iter()
                .map(|c| c.handle)
                .filter(|&h| geometry.bounding_box(h).is_some())
                .collect();
            if self.reuse.can_reuse(&self.graph, &survivors, now_ms) {
                self.composition_suspect = false;
                false
            } else if self.graph.build_from(&candidates, geometry, now_ms) {
                self.composition_suspect = false;
                true
            } else {
                // Zero survivors: the normal "no navigable elements" state.
                return Err(EnableError::NoElements);
            }
        };
        self.last_roots.clear();
        self.last_roots.extend_from_slice(roots);

        // Step 2: default focus, carrying a previous focus forward when it
        // still exists in this graph.
        let focus = carry_focus
            .and_then(|handle| self.graph.index_of(handle))
            .or_else(|| self.graph.first());
        let (focus, focus_handle) = match focus.and_then(|i| self.graph.handle(i).map(|h| (i, h))) {
            Some(pair) => pair,
            None => {
                self.rollback(&[], newly_built, input, visual, overlay);
                return Err(EnableError::NoElements);
            }
        };

        // Step 3: acquire one binding per logical control; first failure
        // aborts the whole attempt.
        let mut acquired: SmallVec<[(Control, BindingId); 6]> = SmallVec::new();
        for control in Control::ALL {
            match input.acquire(control) {
                Some(binding) => acquired.push((control, binding)),
                None => {
                    self.rollback(&acquired, newly_built, input, visual, overlay);
                    return Err(EnableError::BindingFailed(control));
                }
            }
        }

        // Step 4: point every binding at the focused element. Direction
        // bindings feed `navigate`; primary/secondary stay on the host's
        // click-execution side.
        for &(_, binding) in &acquired {
            input.bind(binding, focus_handle);
        }

        // Step 5: commit.
        self.bindings = acquired;
        self.status = SessionStatus::Active;
        self.focus = Some(focus);
        self.focus_key = Some(focus_handle);

        // Step 6: initial focus visuals.
        self.apply_focus_visuals(None, focus_handle, visual, overlay);
        Ok(())
    }

    /// Release everything and go inactive. Idempotent.
    ///
    /// The graph is deliberately kept valid so an immediately following
    /// [`enable`](Self::enable) with the same root set can reuse it.
    pub fn disable<I, V, O>(&mut self, input: &mut I, visual: &mut V, overlay: &mut O)
    where
        I: InputDispatch<K>,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        if !self.is_active() {
            return;
        }
        for &(_, binding) in self.bindings.iter().rev() {
            input.release(binding);
        }
        self.bindings.clear();
        if let Some(handle) = self.focus_key {
            self.arbiter.note_focus(handle);
        }
        self.focus = None;
        self.focus_key = None;
        self.cursor.request(CursorState::Hidden, visual);
        self.arbiter.hide_if_permitted(overlay);
        self.status = SessionStatus::Inactive;
    }

    /// React to the external exclusive lock being asserted: immediate
    /// teardown. Re-arming happens only when the host feeds the unlock event
    /// into [`request_rebuild`](Self::request_rebuild).
    pub fn on_lock_asserted<I, V, O>(&mut self, input: &mut I, visual: &mut V, overlay: &mut O)
    where
        I: InputDispatch<K>,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        self.disable(input, visual, overlay);
    }

    /// Perform one navigation step in `direction`.
    ///
    /// A stale cached neighbor invalidates the graph and schedules a rebuild;
    /// the step itself is a silent no-op from the user's point of view.
    pub fn navigate<G, I, L, V, O>(
        &mut self,
        direction: Direction,
        geometry: &G,
        input: &mut I,
        lock: &L,
        visual: &mut V,
        overlay: &mut O,
        now_ms: u64,
    ) -> NavOutcome
    where
        G: GeometrySource<K>,
        I: InputDispatch<K>,
        L: ExclusiveLock,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        if !self.is_active() {
            return NavOutcome::Inactive;
        }
        if lock.is_locked() {
            return NavOutcome::Locked;
        }
        let Some(origin) = self.focus else {
            debug_assert!(false, "active session without a focus index");
            return NavOutcome::Inactive;
        };

        match adjacency::validated(&mut self.graph, origin, direction, geometry) {
            Err(GraphError::Stale) => {
                log::debug!("stale neighbor during navigation; invalidating graph");
                self.graph.invalidate();
                self.request_rebuild(now_ms);
                NavOutcome::Stale
            }
            Ok(None) => NavOutcome::AtEdge,
            Ok(Some(next)) => {
                let old_handle = self.graph.handle(origin);
                let Some(new_handle) = self.graph.handle(next) else {
                    debug_assert!(false, "resolved neighbor has no handle");
                    self.graph.invalidate();
                    self.request_rebuild(now_ms);
                    return NavOutcome::Stale;
                };
                for &(_, binding) in &self.bindings {
                    input.bind(binding, new_handle);
                }
                self.focus = Some(next);
                self.focus_key = Some(new_handle);
                self.apply_focus_visuals(old_handle, new_handle, visual, overlay);
                NavOutcome::Moved
            }
        }
    }

    /// Drive the cursor for an interaction in progress (for example,
    /// `Pressing` while the primary control is held, `Scrolling` during a
    /// scroll gesture). No-op while inactive; teardown is the only path to
    /// `Hidden`.
    pub fn indicate<V: CursorVisual>(&mut self, state: CursorState, visual: &mut V) {
        if self.is_active() && state != CursorState::Hidden {
            self.cursor.request(state, visual);
        }
    }

    /// Evaluate a fired debounce timer.
    ///
    /// A superseded generation is discarded without any work. Otherwise the
    /// current root set decides: empty tears the session down; non-empty
    /// starts it when inactive; when active, the reuse guard is consulted
    /// and on composition drift the session is torn down, the graph rebuilt,
    /// and the previously focused element carried forward when it survives.
    pub fn on_timer<D, G, I, L, V, O>(
        &mut self,
        generation: Generation,
        roots: &[K],
        discovery: &D,
        geometry: &G,
        input: &mut I,
        lock: &L,
        visual: &mut V,
        overlay: &mut O,
        now_ms: u64,
    ) -> RebuildOutcome
    where
        D: ElementDiscovery<K>,
        G: GeometrySource<K>,
        I: InputDispatch<K>,
        L: ExclusiveLock,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        if !self.scheduler.take_fired(generation) {
            return RebuildOutcome::StaleTimer;
        }
        // The world may have changed during the debounce delay; the lock in
        // particular may now be asserted.
        if lock.is_locked() {
            self.disable(input, visual, overlay);
            return RebuildOutcome::LockedOut;
        }
        if roots.is_empty() {
            self.disable(input, visual, overlay);
            return RebuildOutcome::TornDown;
        }

        if !self.is_active() {
            return match self.enable_inner(
                roots, None, discovery, geometry, input, lock, visual, overlay, now_ms,
            ) {
                Ok(()) => RebuildOutcome::Enabled,
                Err(error) => RebuildOutcome::Failed(error),
            };
        }

        let candidates = discovery.discover(roots);
        let survivors: Vec<K> = candidates
            .iter()
            .map(|c| c.handle)
            .filter(|&h| geometry.bounding_box(h).is_some())
            .collect();
        if self.reuse.can_reuse(&self.graph, &survivors, now_ms) {
            self.composition_suspect = false;
            return RebuildOutcome::AlreadyCurrent;
        }

        let carry = self.focus_handle();
        self.disable(input, visual, overlay);
        self.graph.invalidate();
        match self.enable_inner(
            roots, carry, discovery, geometry, input, lock, visual, overlay, now_ms,
        ) {
            Ok(()) => RebuildOutcome::Rebuilt,
            Err(error) => RebuildOutcome::Failed(error),
        }
    }

    fn same_roots(&self, roots: &[K]) -> bool {
        roots.len() == self.last_roots.len() && roots.iter().all(|r| self.last_roots.contains(r))
    }

    /// Move the overlay and cursor to a newly focused element. The previous
    /// focus (if any) is recorded first so the arbiter can release an
    /// overlay we own; a foreign-owned overlay is left untouched.
    fn apply_focus_visuals<V, O>(&mut self, old: Option<K>, new: K, visual: &mut V, overlay: &mut O)
    where
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        if let Some(old) = old {
            self.arbiter.note_focus(old);
        }
        self.arbiter.hide_if_permitted(overlay);
        overlay.show(new);
        self.cursor.request(CursorState::Pointing, visual);
    }

    /// Undo every effect of a failed enable attempt.
    fn rollback<I, V, O>(
        &mut self,
        acquired: &[(Control, BindingId)],
        newly_built: bool,
        input: &mut I,
        visual: &mut V,
        overlay: &mut O,
    ) where
        I: InputDispatch<K>,
        V: CursorVisual,
        O: OverlayHost<K>,
    {
        log::debug!("enable attempt rolled back ({} bindings held)", acquired.len());
        for &(_, binding) in acquired.iter().rev() {
            input.release(binding);
        }
        self.focus = None;
        self.focus_key = None;
        self.cursor.request(CursorState::Hidden, visual);
        self.arbiter.hide_if_permitted(overlay);
        if newly_built {
            // Never keep a possibly-incomplete graph around for reuse.
            self.graph.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::OverlayOwner;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};
    use kurbo::Rect;
    use padnav_graph::{Discovered, ElementCaps};

    /// Synthetic host world: elements with mutable geometry plus a discovery
    /// call counter.
    struct World {
        elements: RefCell<Vec<(u32, Option<Rect>)>>,
        discover_calls: Cell<usize>,
    }

    impl World {
        /// A single column: handles `1..=n`, stacked top to bottom.
        fn column(n: u32) -> Self {
            Self {
                elements: RefCell::new(
                    (1..=n)
                        .map(|h| (h, Some(Rect::new(0.0, f64::from(h - 1) * 30.0, 20.0, f64::from(h - 1) * 30.0 + 20.0))))
                        .collect(),
                ),
                discover_calls: Cell::new(0),
            }
        }

        fn add(&self, handle: u32, rect: Rect) {
            self.elements.borrow_mut().push((handle, Some(rect)));
        }

        fn drop_geometry(&self, handle: u32) {
            for entry in self.elements.borrow_mut().iter_mut() {
                if entry.0 == handle {
                    entry.1 = None;
                }
            }
        }
    }

    impl ElementDiscovery<u32> for World {
        fn discover(&self, _roots: &[u32]) -> Vec<Discovered<u32>> {
            self.discover_calls.set(self.discover_calls.get() + 1);
            self.elements
                .borrow()
                .iter()
                .map(|&(handle, _)| Discovered {
                    handle,
                    clipping_ancestor: None,
                    caps: ElementCaps::INTERACTIVE,
                })
                .collect()
        }
    }

    impl GeometrySource<u32> for World {
        fn bounding_box(&self, handle: u32) -> Option<Rect> {
            self.elements
                .borrow()
                .iter()
                .find(|&&(h, _)| h == handle)
                .and_then(|&(_, rect)| rect)
        }
    }

    /// Fake input dispatcher that can be told to refuse one control.
    struct Pad {
        next: u64,
        held: Vec<BindingId>,
        bound: Vec<(BindingId, u32)>,
        refuse: Option<Control>,
    }

    impl Pad {
        fn new() -> Self {
            Self {
                next: 0,
                held: Vec::new(),
                bound: Vec::new(),
                refuse: None,
            }
        }

        fn refusing(control: Control) -> Self {
            Self {
                refuse: Some(control),
                ..Self::new()
            }
        }

        /// Targets of the most recent rebind pass.
        fn last_targets(&self) -> Vec<u32> {
            let held = self.held.len();
            self.bound.iter().rev().take(held).map(|&(_, t)| t).collect()
        }
    }

    impl InputDispatch<u32> for Pad {
        fn acquire(&mut self, control: Control) -> Option<BindingId> {
            if self.refuse == Some(control) {
                return None;
            }
            self.next += 1;
            let binding = BindingId(self.next);
            self.held.push(binding);
            Some(binding)
        }

        fn bind(&mut self, binding: BindingId, target: u32) {
            self.bound.push((binding, target));
        }

        fn release(&mut self, binding: BindingId) {
            self.held.retain(|&b| b != binding);
        }
    }

    struct Lock(bool);

    impl ExclusiveLock for Lock {
        fn is_locked(&self) -> bool {
            self.0
        }
    }

    struct Vis(Vec<CursorState>);

    impl CursorVisual for Vis {
        fn apply(&mut self, state: CursorState) {
            self.0.push(state);
        }
    }

    struct Ovl {
        owner: OverlayOwner<u32>,
        visible: bool,
        hide_calls: usize,
    }

    impl Ovl {
        fn new() -> Self {
            Self {
                owner: OverlayOwner::Unset,
                visible: false,
                hide_calls: 0,
            }
        }

        fn owned_by(element: u32) -> Self {
            Self {
                owner: OverlayOwner::Element(element),
                visible: true,
                hide_calls: 0,
            }
        }
    }

    impl OverlayHost<u32> for Ovl {
        fn owner(&self) -> OverlayOwner<u32> {
            self.owner
        }

        fn hide(&mut self) {
            self.hide_calls += 1;
            self.visible = false;
            self.owner = OverlayOwner::Unset;
        }

        fn show(&mut self, element: u32) {
            self.visible = true;
            self.owner = OverlayOwner::Element(element);
        }
    }

    struct Rig {
        session: Session<u32>,
        pad: Pad,
        lock: Lock,
        vis: Vis,
        ovl: Ovl,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                session: Session::new(),
                pad: Pad::new(),
                lock: Lock(false),
                vis: Vis(Vec::new()),
                ovl: Ovl::new(),
            }
        }

        fn enable(&mut self, world: &World, roots: &[u32], now_ms: u64) -> Result<(), EnableError> {
            self.session.enable(
                roots, world, world, &mut self.pad, &self.lock, &mut self.vis, &mut self.ovl, now_ms,
            )
        }

        fn disable(&mut self) {
            self.session.disable(&mut self.pad, &mut self.vis, &mut self.ovl);
        }

        fn navigate(&mut self, world: &World, direction: Direction, now_ms: u64) -> NavOutcome {
            self.session.navigate(
                direction, world, &mut self.pad, &self.lock, &mut self.vis, &mut self.ovl, now_ms,
            )
        }

        fn fire(&mut self, world: &World, generation: Generation, roots: &[u32], now_ms: u64) -> RebuildOutcome {
            self.session.on_timer(
                generation, roots, world, world, &mut self.pad, &self.lock, &mut self.vis, &mut self.ovl, now_ms,
            )
        }
    }

    #[test]
    fn enable_commits_fully() {
        let world = World::column(3);
        let mut rig = Rig::new();

        assert_eq!(rig.enable(&world, &[1], 0), Ok(()));
        assert!(rig.session.is_active());
        assert_eq!(rig.session.binding_count(), 6);
        assert_eq!(rig.session.focus_handle(), Some(1));
        assert_eq!(rig.session.cursor_state(), CursorState::Pointing);
        assert_eq!(rig.ovl.owner, OverlayOwner::Element(1));
        assert!(rig.ovl.visible);
        assert_eq!(world.discover_calls.get(), 1);
        // All six bindings point at the focused element.
        assert_eq!(rig.pad.last_targets(), alloc::vec![1; 6]);
    }

    #[test]
    fn column_walk_visits_each_element_then_stops() {
        let world = World::column(5);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();

        for expected in [2, 3, 4, 5] {
            assert_eq!(rig.navigate(&world, Direction::Down, 0), NavOutcome::Moved);
            assert_eq!(rig.session.focus_handle(), Some(expected));
        }
        assert_eq!(rig.navigate(&world, Direction::Down, 0), NavOutcome::AtEdge);
        assert_eq!(rig.session.focus_handle(), Some(5));
    }

    #[test]
    fn navigate_rebinds_all_controls_to_the_new_focus() {
        let world = World::column(2);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();

        assert_eq!(rig.navigate(&world, Direction::Down, 0), NavOutcome::Moved);
        assert_eq!(rig.pad.last_targets(), alloc::vec![2; 6]);
    }

    #[test]
    fn binding_failure_rolls_back_everything() {
        let world = World::column(3);
        let mut rig = Rig::new();
        // Third control in acquisition order.
        rig.pad = Pad::refusing(Control::Left);

        let result = rig.enable(&world, &[1], 0);
        assert_eq!(result, Err(EnableError::BindingFailed(Control::Left)));
        assert!(!rig.session.is_active());
        assert_eq!(rig.session.binding_count(), 0);
        assert!(rig.pad.held.is_empty(), "acquired bindings must be released");
        assert_eq!(rig.session.focus_handle(), None);
        assert_eq!(rig.session.cursor_state(), CursorState::Hidden);
        // This attempt built the graph, so rollback invalidates it.
        assert!(!rig.session.graph().is_valid());
    }

    #[test]
    fn rollback_leaves_a_foreign_overlay_alone() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.pad = Pad::refusing(Control::Primary);
        rig.ovl = Ovl::owned_by(99);

        assert!(rig.enable(&world, &[1], 0).is_err());
        assert!(rig.ovl.visible, "foreign-owned overlay must stay visible");
        assert_eq!(rig.ovl.owner, OverlayOwner::Element(99));
        assert_eq!(rig.ovl.hide_calls, 0);
    }

    #[test]
    fn enable_is_rejected_while_locked() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.lock = Lock(true);

        assert_eq!(rig.enable(&world, &[1], 0), Err(EnableError::Locked));
        assert!(!rig.session.is_active());
        assert_eq!(world.discover_calls.get(), 0, "nothing may run while locked");
        assert!(rig.pad.held.is_empty());
    }

    #[test]
    fn enable_rejects_empty_roots_and_double_enable() {
        let world = World::column(3);
        let mut rig = Rig::new();

        assert_eq!(rig.enable(&world, &[], 0), Err(EnableError::NoRoots));
        rig.enable(&world, &[1], 0).unwrap();
        assert_eq!(rig.enable(&world, &[1], 0), Err(EnableError::AlreadyActive));
    }

    #[test]
    fn empty_discovery_is_a_soft_failure() {
        let world = World::column(0);
        let mut rig = Rig::new();

        assert_eq!(rig.enable(&world, &[1], 0), Err(EnableError::NoElements));
        assert!(!rig.session.is_active());
        assert_eq!(rig.session.binding_count(), 0);
    }

    #[test]
    fn disable_then_enable_reuses_the_graph_without_discovery() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        assert_eq!(world.discover_calls.get(), 1);

        rig.disable();
        assert!(!rig.session.is_active());
        assert_eq!(rig.session.binding_count(), 0);
        assert_eq!(rig.session.cursor_state(), CursorState::Hidden);
        assert!(rig.session.graph().is_valid(), "disable keeps the graph");

        assert_eq!(rig.enable(&world, &[1], 1_000), Ok(()));
        assert_eq!(world.discover_calls.get(), 1, "reuse must skip discovery");
        assert_eq!(rig.session.focus_handle(), Some(1));
    }

    #[test]
    fn disable_is_idempotent() {
        let world = World::column(2);
        let mut rig = Rig::new();
        rig.disable();
        assert!(!rig.session.is_active());

        rig.enable(&world, &[1], 0).unwrap();
        rig.disable();
        rig.disable();
        assert!(!rig.session.is_active());
        assert_eq!(rig.session.binding_count(), 0);
    }

    #[test]
    fn stale_enable_after_threshold_rediscovers() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        rig.disable();

        // Past the 30s staleness bound the shortcut must not apply.
        assert_eq!(rig.enable(&world, &[1], 31_000), Ok(()));
        assert_eq!(world.discover_calls.get(), 2);
    }

    #[test]
    fn stale_neighbor_invalidates_and_schedules_a_rebuild() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();

        // Prime the edge cache, then return to the top.
        assert_eq!(rig.navigate(&world, Direction::Down, 0), NavOutcome::Moved);
        assert_eq!(rig.navigate(&world, Direction::Up, 0), NavOutcome::Moved);

        world.drop_geometry(2);
        assert_eq!(rig.navigate(&world, Direction::Down, 100), NavOutcome::Stale);
        assert!(!rig.session.graph().is_valid());
        assert!(rig.session.rebuild_due(100 + crate::scheduler::DEFAULT_DEBOUNCE_MS).is_some());
        // The session itself stays up; the rebuild restores navigation.
        assert!(rig.session.is_active());
    }

    #[test]
    fn superseded_timer_generation_is_discarded() {
        let world = World::column(3);
        let mut rig = Rig::new();
        let first = rig.session.request_rebuild(0);
        let second = rig.session.request_rebuild(40);

        assert_eq!(rig.fire(&world, first, &[1], 200), RebuildOutcome::StaleTimer);
        assert_eq!(world.discover_calls.get(), 0);
        assert_eq!(rig.fire(&world, second, &[1], 200), RebuildOutcome::Enabled);
        assert!(rig.session.is_active());
    }

    #[test]
    fn timer_with_empty_roots_tears_down() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();

        let generation = rig.session.request_rebuild(10);
        assert_eq!(rig.fire(&world, generation, &[], 200), RebuildOutcome::TornDown);
        assert!(!rig.session.is_active());
        assert_eq!(rig.session.binding_count(), 0);
    }

    #[test]
    fn timer_while_locked_tears_down_without_rebuilding() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        let calls_before = world.discover_calls.get();

        let generation = rig.session.request_rebuild(10);
        rig.lock = Lock(true);
        assert_eq!(rig.fire(&world, generation, &[1], 200), RebuildOutcome::LockedOut);
        assert!(!rig.session.is_active());
        assert_eq!(world.discover_calls.get(), calls_before);
    }

    #[test]
    fn unchanged_composition_is_kept() {
        let world = World::column(8);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        rig.navigate(&world, Direction::Down, 0);

        let generation = rig.session.request_rebuild(4_900);
        assert_eq!(rig.fire(&world, generation, &[1], 5_000), RebuildOutcome::AlreadyCurrent);
        assert!(rig.session.is_active());
        assert_eq!(rig.session.focus_handle(), Some(2), "focus undisturbed");
    }

    #[test]
    fn composition_drift_rebuilds_and_carries_focus_forward() {
        let world = World::column(8);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        rig.navigate(&world, Direction::Down, 0);
        rig.navigate(&world, Direction::Down, 0);
        assert_eq!(rig.session.focus_handle(), Some(3));

        // A ninth element appears.
        world.add(9, Rect::new(100.0, 0.0, 120.0, 20.0));
        let generation = rig.session.request_rebuild(6_000);
        assert_eq!(rig.fire(&world, generation, &[1], 6_100), RebuildOutcome::Rebuilt);
        assert!(rig.session.is_active());
        assert_eq!(rig.session.graph().len(), 9);
        assert_eq!(rig.session.focus_handle(), Some(3), "previous focus carried forward");
    }

    #[test]
    fn carried_focus_falls_back_to_first_when_gone() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        rig.navigate(&world, Direction::Down, 0);
        assert_eq!(rig.session.focus_handle(), Some(2));

        world.drop_geometry(2);
        let generation = rig.session.request_rebuild(1_000);
        assert_eq!(rig.fire(&world, generation, &[1], 1_100), RebuildOutcome::Rebuilt);
        assert_eq!(rig.session.focus_handle(), Some(1));
    }

    #[test]
    fn lock_event_forces_immediate_teardown() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();

        rig.session.on_lock_asserted(&mut rig.pad, &mut rig.vis, &mut rig.ovl);
        assert!(!rig.session.is_active());
        assert!(rig.pad.held.is_empty());
        assert_eq!(rig.session.cursor_state(), CursorState::Hidden);
        assert!(!rig.ovl.visible);
    }

    #[test]
    fn navigation_is_rejected_while_locked_or_inactive() {
        let world = World::column(3);
        let mut rig = Rig::new();
        assert_eq!(rig.navigate(&world, Direction::Down, 0), NavOutcome::Inactive);

        rig.enable(&world, &[1], 0).unwrap();
        rig.lock = Lock(true);
        assert_eq!(rig.navigate(&world, Direction::Down, 0), NavOutcome::Locked);
        assert_eq!(rig.session.focus_handle(), Some(1));
    }

    #[test]
    fn indicate_drives_interaction_states_only_while_active() {
        let world = World::column(2);
        let mut rig = Rig::new();

        // Inactive: ignored.
        rig.session.indicate(CursorState::Pressing, &mut rig.vis);
        assert_eq!(rig.session.cursor_state(), CursorState::Hidden);

        rig.enable(&world, &[1], 0).unwrap();
        rig.session.indicate(CursorState::Pressing, &mut rig.vis);
        assert_eq!(rig.session.cursor_state(), CursorState::Pressing);
        // Hidden is reserved for teardown.
        rig.session.indicate(CursorState::Hidden, &mut rig.vis);
        assert_eq!(rig.session.cursor_state(), CursorState::Pressing);
    }

    #[test]
    fn focus_move_hides_own_overlay_but_not_a_foreign_one() {
        let world = World::column(3);
        let mut rig = Rig::new();
        rig.enable(&world, &[1], 0).unwrap();
        let hides_after_enable = rig.ovl.hide_calls;

        // Another subsystem takes the overlay.
        rig.ovl.owner = OverlayOwner::Element(77);
        rig.navigate(&world, Direction::Down, 0);
        // The hide was arbitrated away; show still moves the overlay to the
        // new focus.
        assert_eq!(rig.ovl.hide_calls, hides_after_enable);
        assert_eq!(rig.ovl.owner, OverlayOwner::Element(2));
    }
}
