// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator traits implemented by the host UI.
//!
//! The graph never walks a UI tree itself. Discovery of eligible elements and
//! geometry queries are both delegated to the host through these traits, with
//! elements identified by a host-chosen key type `K` (any small, copyable
//! handle). Both traits are queried live: discovery once per build, geometry
//! on every build and on every adjacency resolution, so elements that move
//! after a build are still compared at their current position.

use alloc::vec::Vec;
use kurbo::Rect;

use crate::types::Discovered;

/// Source of currently-eligible interactive elements.
///
/// Implementations are expected to pre-filter to visible, enabled,
/// interactive elements; the graph trusts this filtering and applies no
/// relevance checks of its own.
pub trait ElementDiscovery<K> {
    /// Return the eligible elements under the given root containers, in the
    /// host's scan order. The order is load-bearing: it fixes node indices
    /// and adjacency tie-breaking for the lifetime of the build.
    fn discover(&self, roots: &[K]) -> Vec<Discovered<K>>;
}

/// Live geometry access for host elements.
///
/// All rectangles must be reported in one consistent normalized coordinate
/// space; mixing raw and scale-adjusted units across elements produces
/// meaningless adjacency results.
pub trait GeometrySource<K> {
    /// Current bounding box of the element, or `None` when the host cannot
    /// currently report one. `None` means "skip this element for now"; it is
    /// never treated as a zero-sized box.
    fn bounding_box(&self, handle: K) -> Option<Rect>;
}
