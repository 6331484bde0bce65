// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_reserve --heading-base-level=0

//! Understory Reserve: first-come claims on screen regions.
//!
//! Several independent HUD elements often want the same corner of the screen. This crate
//! lets each of them claim a rectangle before drawing there, and tells interested parties
//! when claims come and go.
//!
//! - Claim a [`Region`] for an owner with [`ReservationEngine::try_occupy`]; the claim is
//!   refused if another owner's region overlaps it.
//! - Release it with [`ReservationEngine::free`].
//! - Watch a region with [`ReservationEngine::watch`] and get a [`RegionChange`] callback,
//!   with the overlapping rectangle, whenever a claim touching it appears or disappears.
//!
//! Regions are half-open integer rectangles. Two regions conflict only when they share
//! area; elements laid out edge to edge never block each other.
//!
//! ## API overview
//!
//! - [`ReservationEngine`]: the facade; owns occupancy state and watchers.
//! - [`Region`] and [`RegionError`]: validated rectangles.
//! - [`RegionListener`]: callback capability; any `Fn(RegionChange, Region) + Send + Sync`
//!   closure qualifies.
//! - [`ChangeKinds`]: restrict a watch to claims or releases.
//! - [`OccupancyRegistry`] and [`ListenerRegistry`]: the two halves of engine state, usable
//!   on their own.
//!
//! Spatial queries run on [`understory_reserve_index`]. The engine defaults to its R-tree
//! backend; [`ReservationEngine::with_backend`] accepts any other, e.g. [`FlatVec`] for a
//! handful of claims.
//!
//! ## Threads
//!
//! The engine has no internal locking. It is `Send`, and mutation goes through `&mut self`,
//! so one `Mutex<ReservationEngine<_>>` serializes everything. Listeners run on the calling
//! thread, inside that lock.
//!
//! ## Features
//!
//! - `tracing`: log claims, releases, contention, and panicking listeners via `tracing`.
//! - `kurbo`: convert between [`Region`] and `kurbo::Rect`.
//!
//! ## Minimal usage
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use understory_reserve::{Region, RegionChange, ReservationEngine};
//!
//! let mut engine = ReservationEngine::new();
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&log);
//! engine.watch(
//!     Region::from_xywh(0, 0, 10, 10)?,
//!     Arc::new(move |change: RegionChange, overlap: Region| {
//!         sink.lock().unwrap().push((change, overlap));
//!     }),
//! );
//!
//! assert_eq!(engine.try_occupy_xywh("mod:a", 0, 0, 10, 10), Ok(true));
//! assert_eq!(engine.is_free_xywh(5, 5, 10, 10), Ok(false));
//! assert_eq!(engine.try_occupy_xywh("mod:b", 5, 5, 10, 10), Ok(false));
//!
//! engine.free(&"mod:a");
//! assert_eq!(engine.try_occupy_xywh("mod:b", 5, 5, 10, 10), Ok(true));
//!
//! let seen = log.lock().unwrap();
//! assert_eq!(seen.len(), 3);
//! assert_eq!(seen[2], (RegionChange::Occupied, Region::from_xywh(5, 5, 5, 5)?));
//! # Ok::<(), understory_reserve::RegionError>(())
//! ```

mod change;
mod engine;
mod listeners;
mod region;
mod registry;

pub use change::{ChangeKinds, RegionChange, RegionListener};
pub use engine::ReservationEngine;
pub use listeners::ListenerRegistry;
pub use region::{Region, RegionError};
pub use registry::OccupancyRegistry;

pub use understory_reserve_index::{FlatVec, RTreeI32};
