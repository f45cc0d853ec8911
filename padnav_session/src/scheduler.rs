// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced rebuild scheduling.
//!
//! Change notifications arrive at arbitrary frequency; the scheduler
//! coalesces a burst into a single rebuild evaluation. A monotonically
//! increasing generation counter gates one pending deadline: every request
//! bumps the generation and re-arms the deadline, and a timer callback whose
//! captured generation no longer matches is discarded as stale. The crate
//! owns no clock and no timer thread; the host arms a timer for the returned
//! deadline and pumps [`RebuildScheduler::take_fired`] when it goes off.

/// Default debounce window.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Generation token captured when a rebuild is requested.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Generation(u64);

/// Debounce scheduler for rebuild requests.
///
/// ## Example
///
/// ```rust
/// use padnav_session::RebuildScheduler;
///
/// let mut scheduler = RebuildScheduler::new();
///
/// // A burst of notifications: only the last generation survives.
/// let first = scheduler.request_rebuild(0);
/// let last = scheduler.request_rebuild(40);
///
/// assert!(scheduler.due(190).is_some());
/// assert!(!scheduler.take_fired(first), "superseded timer is discarded");
/// assert!(scheduler.take_fired(last));
/// assert!(scheduler.due(500).is_none(), "nothing pending after the fire");
/// ```
#[derive(Clone, Debug)]
pub struct RebuildScheduler {
    debounce_ms: u64,
    generation: u64,
    pending: Option<Pending>,
}

#[derive(Copy, Clone, Debug)]
struct Pending {
    generation: u64,
    deadline_ms: u64,
}

impl Default for RebuildScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RebuildScheduler {
    /// Create a scheduler with the default debounce window.
    pub const fn new() -> Self {
        Self::with_debounce(DEFAULT_DEBOUNCE_MS)
    }

    /// Create a scheduler with a custom debounce window.
    pub const fn with_debounce(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            generation: 0,
            pending: None,
        }
    }

    /// Note a change notification and (re)arm the single pending deadline.
    ///
    /// Callable arbitrarily often; each call supersedes the previous pending
    /// evaluation. The returned generation is what the host's timer callback
    /// must present to [`take_fired`](Self::take_fired).
    pub fn request_rebuild(&mut self, now_ms: u64) -> Generation {
        self.generation += 1;
        self.pending = Some(Pending {
            generation: self.generation,
            deadline_ms: now_ms + self.debounce_ms,
        });
        Generation(self.generation)
    }

    /// The generation whose deadline has passed, if any.
    ///
    /// For hosts that poll instead of arming exact timers.
    pub fn due(&self, now_ms: u64) -> Option<Generation> {
        self.pending
            .filter(|p| now_ms >= p.deadline_ms)
            .map(|p| Generation(p.generation))
    }

    /// Consume a fired timer.
    ///
    /// Returns `true` and clears the pending state when `generation` is the
    /// current one; returns `false` for a stale callback, which the caller
    /// must discard without acting.
    pub fn take_fired(&mut self, generation: Generation) -> bool {
        match self.pending {
            Some(p) if p.generation == generation.0 => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Whether an evaluation is pending.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
