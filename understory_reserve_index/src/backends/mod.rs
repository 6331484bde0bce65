// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple).
//! - `rtree`: generic R-tree (`T: Scalar`) with SAH-like split (aliases: `RTreeI32`, `RTreeI64`).
//!
//! SAH note
//! --------
//! The R-tree uses an SAH-like split heuristic when a node overflows.
//! For a split point `k` along a sorted axis we minimize:
//!
//! `cost(k) = area(LB_k) * k + area(RB_k) * (n - k)`
//!
//! where `LB_k` and `RB_k` are the bounding boxes of the first `k` and remaining `n - k` items.
//! We evaluate all `k` in O(n) per axis using prefix/suffix bounding boxes, and pick the lowest cost.
//! Accumulators are widened (`i32`→`i64`, `i64`→`i128`) so costs never overflow.
//! The bulk builder uses an STR-like pass to seed packed leaves and parents.

pub mod flatvec;
pub mod rtree;

pub use flatvec::FlatVec;
pub use rtree::{RTree, RTreeI32, RTreeI64};
