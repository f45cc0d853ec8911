// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus-cursor state machine.
//!
//! The cursor tracks the visual focus indicator through four states. The
//! declared transition table is:
//!
//! ```text
//! Hidden    -> Pointing
//! Pointing  -> Pressing | Scrolling | Hidden
//! Pressing  -> Pointing | Hidden
//! Scrolling -> Pointing | Hidden
//! ```
//!
//! A request outside the table is not rejected: it is corrected by inserting
//! an intermediate hop through [`CursorState::Pointing`], bounded by a
//! recursion-depth guard. Exceeding the guard logs and freezes the cursor in
//! place instead of looping. Visual properties are applied exactly once per
//! request, at the final resolved state, never at correction hops, so the
//! indicator cannot flicker through intermediate looks.

use crate::host::CursorVisual;

/// Maximum correction hops before a request is abandoned.
const MAX_HOPS: u8 = 3;

/// Visual state of the focus cursor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// No cursor shown; the state every cursor is created in and returns to
    /// on session teardown.
    Hidden,
    /// Resting on the focused element.
    Pointing,
    /// Primary activation in progress.
    Pressing,
    /// Scroll interaction in progress.
    Scrolling,
}

/// Result of a transition request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The request resolved; the cursor now shows this state.
    Settled(CursorState),
    /// The depth guard tripped; the cursor stays in this state and no visual
    /// update was applied.
    Frozen(CursorState),
}

/// The focus-cursor state machine.
///
/// ## Example
///
/// ```rust
/// use padnav_session::{Cursor, CursorState, CursorVisual, Transition};
///
/// struct Recorder(Vec<CursorState>);
/// impl CursorVisual for Recorder {
///     fn apply(&mut self, state: CursorState) {
///         self.0.push(state);
///     }
/// }
///
/// let mut cursor = Cursor::new();
/// let mut visual = Recorder(Vec::new());
///
/// // Scrolling is not reachable from Hidden directly; the machine corrects
/// // through Pointing but renders only the final state.
/// let outcome = cursor.request(CursorState::Scrolling, &mut visual);
/// assert_eq!(outcome, Transition::Settled(CursorState::Scrolling));
/// assert_eq!(visual.0, vec![CursorState::Scrolling]);
/// ```
#[derive(Debug)]
pub struct Cursor {
    state: CursorState,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `from -> to` appears in the declared transition table.
const fn declared(from: CursorState, to: CursorState) -> bool {
    use CursorState::{Hidden, Pointing, Pressing, Scrolling};
    matches!(
        (from, to),
        (Hidden, Pointing)
            | (Pointing, Pressing | Scrolling | Hidden)
            | (Pressing, Pointing | Hidden)
            | (Scrolling, Pointing | Hidden)
    )
}

impl Cursor {
    /// Create a cursor in [`CursorState::Hidden`].
    pub const fn new() -> Self {
        Self {
            state: CursorState::Hidden,
        }
    }

    /// Current state.
    pub const fn state(&self) -> CursorState {
        self.state
    }

    /// Request a transition to `target`, applying the visual exactly once at
    /// the final resolved state.
    ///
    /// Same-state requests settle immediately. Out-of-table requests are
    /// corrected through [`CursorState::Pointing`]; if the depth guard trips
    /// the cursor freezes where it is, the condition is logged, and the
    /// visual is left untouched.
    pub fn request<V: CursorVisual>(&mut self, target: CursorState, visual: &mut V) -> Transition {
        if self.step(target, 0) {
            visual.apply(self.state);
            Transition::Settled(self.state)
        } else {
            log::warn!("cursor transition to {target:?} exceeded the correction depth guard");
            Transition::Frozen(self.state)
        }
    }

    fn step(&mut self, target: CursorState, depth: u8) -> bool {
        if self.state == target {
            return true;
        }
        if declared(self.state, target) {
            self.state = target;
            return true;
        }
        if depth >= MAX_HOPS {
            return false;
        }
        self.step(CursorState::Pointing, depth + 1) && self.step(target, depth + 1)
    }
}
