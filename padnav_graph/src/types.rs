// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the navigation graph: directions, node indices, and
//! discovery-side capability flags.

use kurbo::Vec2;

/// A cardinal navigation direction, matching a directional pad.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing y.
    Up,
    /// Toward increasing y.
    Down,
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

impl Direction {
    /// All four directions, in a stable order usable for table indexing.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The unit vector for this direction.
    ///
    /// The coordinate space is y-down, matching [`kurbo::Rect`] as used by
    /// the rest of the workspace.
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Stable index of this direction into a 4-slot table.
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// Identifier for a node in the navigation graph.
///
/// Indices are dense and only meaningful against the graph build that issued
/// them; a rebuild invalidates all previously returned indices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Capability flags reported by the discovery adapter.
    ///
    /// The core never derives these itself; it trusts the adapter's
    /// filtering and stores the flags only for the host's benefit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementCaps: u8 {
        /// Element responds to activation (click-like) input.
        const INTERACTIVE = 0b0000_0001;
        /// Element has hover behavior the host may want to trigger on focus.
        const HOVER       = 0b0000_0010;
    }
}

impl Default for ElementCaps {
    fn default() -> Self {
        Self::INTERACTIVE
    }
}

/// A candidate element as reported by the discovery adapter.
#[derive(Clone, Debug)]
pub struct Discovered<K> {
    /// Opaque host handle for the element itself.
    pub handle: K,
    /// Handle of the clipping ancestor used by discovery-side relevance
    /// checks. Stored as a plain lookup key, never as a back-pointer.
    pub clipping_ancestor: Option<K>,
    /// Capability flags supplied by the adapter.
    pub caps: ElementCaps,
}

/// Failure conditions surfaced by graph queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A cached neighbor (or an internal edge) no longer matches the world:
    /// its geometry is gone or the referenced index is out of range. The
    /// caller must invalidate the graph and request a rebuild; the current
    /// navigation step is a no-op.
    Stale,
}

impl core::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Stale => write!(f, "cached navigation data is stale"),
        }
    }
}

impl core::error::Error for GraphError {}
