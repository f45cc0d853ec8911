// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits for the session side: input dispatch, the exclusive
//! lock signal, cursor visuals, and the shared overlay element.
//!
//! The session arranges bindings and focus; it never executes host actions
//! itself. Primary/secondary activation in particular stays entirely on the
//! host side of [`InputDispatch::bind`].

use padnav_graph::Direction;

use crate::cursor::CursorState;

/// Logical controls the session acquires during enable, one binding each.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// D-pad up.
    Up,
    /// D-pad down.
    Down,
    /// D-pad left.
    Left,
    /// D-pad right.
    Right,
    /// Primary activation (click-equivalent).
    Primary,
    /// Secondary activation (context-click-equivalent).
    Secondary,
}

impl Control {
    /// All six controls, in acquisition order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Primary,
        Self::Secondary,
    ];
}

impl From<Direction> for Control {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

/// Opaque token for an acquired input binding, issued by the dispatcher.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BindingId(pub u64);

/// External input-dispatch collaborator.
///
/// Acquisition may fail (another subsystem may hold the control); the session
/// treats any failure as grounds to abort and roll back the whole enable
/// attempt. Implementations must tolerate `release` in any order.
pub trait InputDispatch<K> {
    /// Reserve the given control. `None` means the control could not be
    /// acquired; nothing is held for it.
    fn acquire(&mut self, control: Control) -> Option<BindingId>;

    /// Point an acquired binding at a target element. Called once after
    /// acquisition and again whenever focus moves.
    fn bind(&mut self, binding: BindingId, target: K);

    /// Return an acquired binding to the dispatcher.
    fn release(&mut self, binding: BindingId);
}

/// External exclusive-lock signal.
///
/// While asserted, every mutating session entry point is rejected before any
/// state changes. There is no retry loop; the host re-arms the session by
/// feeding its unlock event into the rebuild scheduler.
pub trait ExclusiveLock {
    /// Whether the lock is currently asserted.
    fn is_locked(&self) -> bool;
}

/// Renders the focus cursor.
///
/// [`apply`](Self::apply) is invoked exactly once per transition request, at
/// the final settled state, never at intermediate auto-correction hops.
pub trait CursorVisual {
    /// Apply the visual properties (icon, size) for the given state.
    fn apply(&mut self, state: CursorState);
}

/// Current ownership of the shared overlay element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverlayOwner<K> {
    /// Nobody has claimed the overlay.
    Unset,
    /// The designated generic shared-owner token.
    Shared,
    /// A specific element owns the overlay.
    Element(K),
}

/// The shared overlay element the cursor highlights through.
///
/// Hide requests must be routed through
/// [`OverlayArbiter::may_hide`](crate::overlay::OverlayArbiter::may_hide);
/// the session never calls [`hide`](Self::hide) without an arbitration pass.
pub trait OverlayHost<K> {
    /// Who currently owns the overlay.
    fn owner(&self) -> OverlayOwner<K>;

    /// Hide the overlay.
    fn hide(&mut self);

    /// Show the overlay over the given element, taking ownership for it.
    fn show(&mut self, element: K);
}
