// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Padnav Graph: spatial navigation graph for d-pad focus traversal.
//!
//! This crate turns a host-provided set of interactive elements into an
//! indexed, queryable graph and answers "what is the best neighbor of this
//! element in that direction". It is the lower half of the padnav workspace;
//! the session lifecycle, input bindings, and cursor live in
//! `padnav_session`.
//!
//! The pieces:
//!
//! - **Collaborator traits** ([`ElementDiscovery`], [`GeometrySource`]): the
//!   host owns the UI tree; the graph only ever sees opaque handles and live
//!   bounding boxes in one consistent normalized coordinate space.
//! - **[`NavGraph`]**: an ordered element snapshot with a bijective
//!   handle↔index map and a lazily-populated per-direction edge cache.
//! - **Adjacency resolution** ([`resolve`], [`validated`]): the
//!   angle-weighted multi-point scoring described in [`adjacency`], computed
//!   against current geometry and cached per `(node, direction)`.
//! - **[`ReusePolicy`]**: decides when an existing build may serve a new
//!   request without re-running discovery.
//!
//! ## Minimal example
//!
//! Two buttons side by side, navigated with `Right`:
//!
//! ```rust
//! use kurbo::Rect;
//! use padnav_graph::{
//!     Direction, Discovered, ElementCaps, ElementDiscovery, GeometrySource, NavGraph, resolve,
//! };
//!
//! struct TwoButtons;
//!
//! impl ElementDiscovery<u8> for TwoButtons {
//!     fn discover(&self, _roots: &[u8]) -> Vec<Discovered<u8>> {
//!         [1, 2]
//!             .into_iter()
//!             .map(|handle| Discovered {
//!                 handle,
//!                 clipping_ancestor: None,
//!                 caps: ElementCaps::INTERACTIVE,
//!             })
//!             .collect()
//!     }
//! }
//!
//! impl GeometrySource<u8> for TwoButtons {
//!     fn bounding_box(&self, handle: u8) -> Option<Rect> {
//!         match handle {
//!             1 => Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
//!             2 => Some(Rect::new(100.0, 0.0, 110.0, 10.0)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut graph = NavGraph::new();
//! assert!(graph.build(&[0], &TwoButtons, &TwoButtons, 0));
//!
//! let origin = graph.index_of(1).unwrap();
//! let neighbor = resolve(&mut graph, origin, Direction::Right, &TwoButtons).unwrap();
//! assert_eq!(graph.handle(neighbor), Some(2));
//! ```
//!
//! Timestamps are plain milliseconds supplied by the caller on every
//! time-aware entry point; the crate owns no clock.
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

pub mod adjacency;
mod graph;
mod host;
mod reuse;
mod types;

pub use adjacency::{resolve, validated};
pub use graph::NavGraph;
pub use host::{ElementDiscovery, GeometrySource};
pub use reuse::{DEFAULT_MAX_AGE_MS, ReusePolicy};
pub use types::{Direction, Discovered, ElementCaps, GraphError, NodeIndex};
