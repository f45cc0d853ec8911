// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Padnav Session: transactional lifecycle for d-pad navigation.
//!
//! This crate sits on top of `padnav_graph` and owns everything stateful
//! about a navigation session:
//!
//! - **[`Session`]**: the all-or-nothing enable/disable transaction over the
//!   graph, input bindings, cursor, and overlay, with full rollback on any
//!   partial failure.
//! - **[`RebuildScheduler`]**: debounces bursts of change notifications into
//!   one coalesced rebuild evaluation, gated by a generation counter.
//! - **[`Cursor`]**: the focus-indicator state machine with auto-corrected
//!   transitions and a single visual update per request.
//! - **[`OverlayArbiter`]**: the one place allowed to decide whether the
//!   shared overlay element may be hidden.
//!
//! The host supplies collaborators through traits ([`InputDispatch`],
//! [`ExclusiveLock`], [`CursorVisual`], [`OverlayHost`], plus the discovery
//! and geometry traits from `padnav_graph`) and passes them explicitly into
//! each entry point. The crate is single-threaded and event-driven: every
//! entry point completes synchronously, timers are pumped by the host, and
//! timestamps are caller-supplied milliseconds.
//!
//! ## Control flow
//!
//! ```text
//! change events -> Session::request_rebuild -> (host timer)
//!     -> Session::on_timer -> enable / teardown / rebuild decision
//! d-pad input   -> Session::navigate -> adjacency -> cursor + overlay
//! lock asserted -> Session::on_lock_asserted -> immediate teardown
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for
//!   floating-point math.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cursor;
mod host;
mod overlay;
mod scheduler;
mod session;

pub use cursor::{Cursor, CursorState, Transition};
pub use host::{BindingId, Control, CursorVisual, ExclusiveLock, InputDispatch, OverlayHost, OverlayOwner};
pub use overlay::OverlayArbiter;
pub use scheduler::{DEFAULT_DEBOUNCE_MS, Generation, RebuildScheduler};
pub use session::{EnableError, NavOutcome, RebuildOutcome, Session, SessionStatus};
