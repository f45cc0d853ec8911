// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared-overlay ownership arbitration.
//!
//! The overlay element is shared with other subsystems, so a hide is only
//! permitted when this session can account for the current owner. Every hide
//! call-site (focus change, teardown, rollback) goes through
//! [`OverlayArbiter::hide_if_permitted`]; there are no ad hoc ownership
//! checks elsewhere.

use crate::host::{OverlayHost, OverlayOwner};

/// Gatekeeper for hide operations on the shared overlay.
///
/// Hiding is permitted only when the overlay's owner is unset, is the
/// designated generic shared-owner token, or is the element this session
/// previously focused. Anything else is assumed to belong to another
/// subsystem and is left untouched.
///
/// ## Example
///
/// ```rust
/// use padnav_session::{OverlayArbiter, OverlayOwner};
///
/// let mut arbiter: OverlayArbiter<u32> = OverlayArbiter::new();
/// assert!(arbiter.may_hide(OverlayOwner::Unset));
/// assert!(arbiter.may_hide(OverlayOwner::Shared));
/// // Element 7 is not something this session focused.
/// assert!(!arbiter.may_hide(OverlayOwner::Element(7)));
///
/// arbiter.note_focus(7);
/// assert!(arbiter.may_hide(OverlayOwner::Element(7)));
/// ```
#[derive(Clone, Debug)]
pub struct OverlayArbiter<K> {
    previous_focus: Option<K>,
}

impl<K> Default for OverlayArbiter<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> OverlayArbiter<K> {
    /// Create an arbiter with no focus history.
    pub const fn new() -> Self {
        Self {
            previous_focus: None,
        }
    }

    /// Record that the session focused `element`; a later hide of an overlay
    /// owned by it is then permitted.
    pub fn note_focus(&mut self, element: K) {
        self.previous_focus = Some(element);
    }

    /// Forget the focus history, typically on session teardown.
    pub fn clear(&mut self) {
        self.previous_focus = None;
    }
}

impl<K: Copy + Eq> OverlayArbiter<K> {
    /// Whether a hide of an overlay with the given owner is permitted.
    pub fn may_hide(&self, owner: OverlayOwner<K>) -> bool {
        match owner {
            OverlayOwner::Unset | OverlayOwner::Shared => true,
            OverlayOwner::Element(e) => self.previous_focus == Some(e),
        }
    }

    /// Hide the overlay if arbitration permits it; the single entry point
    /// all hide call-sites use. Returns whether a hide happened.
    pub fn hide_if_permitted<O: OverlayHost<K>>(&self, overlay: &mut O) -> bool {
        if self.may_hide(overlay.owner()) {
            overlay.hide();
            true
        } else {
            false
        }
    }
}
