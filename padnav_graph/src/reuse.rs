// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Graph reuse guard: decide whether an existing build may serve a new
//! request without re-running discovery.
//!
//! Show/hide toggles of the same panel composition are frequent, so reuse
//! must be cheap; any detected drift in composition must conservatively force
//! a rebuild so navigation never runs against stale geometry.

use core::hash::Hash;

use crate::graph::NavGraph;

/// Default maximum age of a build before it is considered stale.
pub const DEFAULT_MAX_AGE_MS: u64 = 30_000;

/// Reuse configuration.
///
/// ## Example
///
/// ```rust
/// use padnav_graph::ReusePolicy;
///
/// let policy = ReusePolicy::default();
/// assert_eq!(policy.max_age_ms, 30_000);
/// let strict = ReusePolicy::with_max_age(5_000);
/// assert_eq!(strict.max_age_ms, 5_000);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReusePolicy {
    /// Builds older than this (in milliseconds) are never reused.
    pub max_age_ms: u64,
}

impl Default for ReusePolicy {
    fn default() -> Self {
        Self {
            max_age_ms: DEFAULT_MAX_AGE_MS,
        }
    }
}

impl ReusePolicy {
    /// Create a policy with a custom staleness threshold.
    pub const fn with_max_age(max_age_ms: u64) -> Self {
        Self { max_age_ms }
    }

    /// Whether `graph` holds a valid build younger than the staleness
    /// threshold.
    ///
    /// This is the age half of [`can_reuse`](Self::can_reuse), usable on its
    /// own when the caller already knows the composition is unchanged (for
    /// example, re-enabling immediately after a disable with the same root
    /// set, where running discovery just to compare identity sets would
    /// defeat the point of reuse).
    pub fn fresh<K>(&self, graph: &NavGraph<K>, now_ms: u64) -> bool {
        if !graph.is_valid() {
            return false;
        }
        match graph.snapshot() {
            Some(snapshot) => now_ms.saturating_sub(snapshot.built_at_ms) < self.max_age_ms,
            None => false,
        }
    }

    /// Whether `graph` may serve a request for exactly the elements in
    /// `current` without rebuilding.
    ///
    /// All conditions are conjunctive: the graph must hold a valid build, the
    /// current identity set must have the same size as the last build's set,
    /// every current element must have been present in that build, the
    /// navigable count must match, and the build must be younger than
    /// [`max_age_ms`](Self::max_age_ms). Any miss forces a full rebuild.
    pub fn can_reuse<K>(&self, graph: &NavGraph<K>, current: &[K], now_ms: u64) -> bool
    where
        K: Copy + Eq + Hash,
    {
        if !graph.is_valid() {
            return false;
        }
        let Some(snapshot) = graph.snapshot() else {
            return false;
        };
        if current.len() != snapshot.identity.len() || current.len() != snapshot.count {
            return false;
        }
        if !current.iter().all(|h| snapshot.identity.contains(h)) {
            return false;
        }
        now_ms.saturating_sub(snapshot.built_at_ms) < self.max_age_ms
    }
}
