// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reserve_index --heading-base-level=0

//! Understory Reserve Index: an integer 2D AABB index for occupancy queries.
//!
//! This is the spatial building block behind screen-space reservations.
//!
//! - Insert and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Ask which entries overlap a rectangle, or just whether any does.
//! - Address entries by a generational [`Key`]; stale keys are ignored.
//!
//! Overlap is strict: boxes that only share an edge or a corner do not overlap, and a
//! zero-area box overlaps nothing. This matches half-open pixel ranges, where a box
//! `0..10` and a box `10..20` sit side by side.
//!
//! The index mutates in place. It is [`Clone`], so a caller that needs an old view to stay
//! queryable while the live index moves on can keep a snapshot.
//!
//! # Example
//!
//! ```rust
//! use understory_reserve_index::{Aabb2D, Index};
//!
//! let mut idx = Index::<i32, &str>::with_rtree();
//! let clock = idx.insert(Aabb2D::<i32>::from_xywh(0, 0, 10, 10), "clock");
//! let _map = idx.insert(Aabb2D::<i32>::from_xywh(10, 0, 10, 10), "minimap");
//!
//! // Touching the clock's right edge is not an overlap.
//! let hits: Vec<_> = idx.query_rect(Aabb2D::<i32>::from_xywh(5, 5, 10, 1)).map(|(_, p)| *p).collect();
//! assert_eq!(hits.len(), 2);
//! assert!(!idx.any_overlap(Aabb2D::<i32>::from_xywh(0, 10, 20, 5)));
//!
//! idx.remove(clock);
//! assert!(!idx.any_overlap(Aabb2D::<i32>::from_xywh(0, 0, 10, 10)));
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default for [`Index`]): linear scans. Good for a handful of entries.
//! - `RTreeI32`/`RTreeI64`: R-tree with SAH-like splits and widened metrics; the general-purpose
//!   choice when entries come and go frequently. See the [`backends`] docs for a brief SAH overview.

#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::rtree::{RTree, RTreeI32, RTreeI64};
pub use index::{Index, IndexGeneric, Key};
pub use types::Aabb2D;
