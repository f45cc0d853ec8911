// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Directional adjacency resolution.
//!
//! Given an origin node and a direction, pick the best neighbor among all
//! other nodes. Rather than comparing centroids only, every candidate
//! contributes several sample points along its bounding box (corners and edge
//! midpoints), so very wide or very tall elements are judged by their nearest
//! representative point instead of an unrepresentative center. Each sample
//! point in the requested hemiplane receives a weighted score
//!
//! ```text
//! distance * (1 + angle_off_degrees / 15)
//! ```
//!
//! where `angle_off_degrees` is the point's angular deviation from the
//! direction's axis. The global minimum across all candidates and all their
//! points wins; an equal score never displaces an earlier candidate, so ties
//! resolve to scan order and resolution is fully deterministic.
//!
//! Geometry is always queried live, so elements that moved after the graph
//! was built are compared at their current position. Results are cached per
//! `(node, direction)` inside the graph; [`validated`] is the caller-facing
//! entry that re-checks a cached neighbor against the world before handing it
//! out and reports [`GraphError::Stale`] instead of ever returning a neighbor
//! the host can no longer place.

use core::hash::Hash;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::graph::NavGraph;
use crate::host::GeometrySource;
use crate::types::{Direction, GraphError, NodeIndex};

/// Corner and edge-midpoint samples of a bounding box.
fn sample_points(rect: &Rect) -> SmallVec<[Point; 8]> {
    let cx = (rect.x0 + rect.x1) / 2.0;
    let cy = (rect.y0 + rect.y1) / 2.0;
    SmallVec::from_buf([
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
        Point::new(cx, rect.y0),
        Point::new(cx, rect.y1),
        Point::new(rect.x0, cy),
        Point::new(rect.x1, cy),
    ])
}

/// Best score any of the candidate's sample points achieves for `direction`
/// from `origin_center`, or `None` when no point qualifies.
fn candidate_score(origin_center: Point, candidate: &Rect, direction: Direction) -> Option<f64> {
    let axis = direction.unit();
    let mut best: Option<f64> = None;

    for point in sample_points(candidate) {
        let offset = point - origin_center;
        let along = offset.dot(axis);
        // The point must be generally in the requested direction. A zero
        // offset never qualifies.
        if along < 0.0 || (offset.x == 0.0 && offset.y == 0.0) {
            continue;
        }
        let distance = offset.hypot();
        let angle_off_degrees = offset.cross(axis).abs().atan2(along).to_degrees();
        let score = distance * (1.0 + angle_off_degrees / 15.0);
        if !score.is_finite() {
            continue;
        }
        if best.is_none_or(|b| score < b) {
            best = Some(score);
        }
    }

    best
}

/// Resolve the best neighbor of `origin` in `direction`, caching the result.
///
/// On a cache miss this scans every other node against current geometry.
/// Candidates whose geometry is unavailable are skipped for this resolution;
/// a candidate whose center coincides with the origin's never qualifies.
/// Returns `None` when the origin is unknown, its geometry is unavailable, or
/// no candidate qualifies.
pub fn resolve<K, G>(
    graph: &mut NavGraph<K>,
    origin: NodeIndex,
    direction: Direction,
    geometry: &G,
) -> Option<NodeIndex>
where
    K: Copy + Eq + Hash,
    G: GeometrySource<K>,
{
    if let Some(cached) = graph.cached_edge(origin, direction) {
        return cached;
    }

    let origin_handle = graph.handle(origin)?;
    // Current geometry, not the build-time snapshot: the origin may have
    // moved since the graph was built. An unavailable origin yields no
    // neighbor but is not cached, so a later query can still succeed.
    let origin_rect = geometry.bounding_box(origin_handle)?;
    let origin_center = origin_rect.center();

    let mut best_index: Option<NodeIndex> = None;
    let mut best_score = f64::INFINITY;

    for (index, handle) in graph.iter() {
        if index == origin {
            continue;
        }
        let Some(rect) = geometry.bounding_box(handle) else {
            continue;
        };
        if rect.center() == origin_center {
            continue;
        }
        if let Some(score) = candidate_score(origin_center, &rect, direction) {
            // Strict comparison: ties keep the first-scanned winner.
            if score < best_score {
                best_score = score;
                best_index = Some(index);
            }
        }
    }

    graph.store_edge(origin, direction, best_index);
    best_index
}

/// Resolve a neighbor and re-validate it against current geometry.
///
/// This is the entry point navigation steps must use. A cached neighbor whose
/// geometry has since become unavailable, or a cached edge referencing an
/// index no longer in the graph, yields [`GraphError::Stale`]; the caller is
/// expected to invalidate the graph and request a rebuild rather than act on
/// stale data.
pub fn validated<K, G>(
    graph: &mut NavGraph<K>,
    origin: NodeIndex,
    direction: Direction,
    geometry: &G,
) -> Result<Option<NodeIndex>, GraphError>
where
    K: Copy + Eq + Hash,
    G: GeometrySource<K>,
{
    let Some(neighbor) = resolve(graph, origin, direction, geometry) else {
        return Ok(None);
    };

    let Some(handle) = graph.handle(neighbor) else {
        // An edge referencing a missing index is an internal invariant
        // violation; surfaced as staleness in release builds.
        debug_assert!(false, "edge references an index outside the graph");
        log::warn!("edge cache references an index outside the graph");
        return Err(GraphError::Stale);
    };
    if geometry.bounding_box(handle).is_none() {
        log::debug!("cached neighbor lost its geometry; reporting stale");
        return Err(GraphError::Stale);
    }
    Ok(Some(neighbor))
}
