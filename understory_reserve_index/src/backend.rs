// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;

use crate::types::Aabb2D;
use core::fmt::Debug;

/// Spatial backend abstraction used by `IndexGeneric`.
///
/// Backends only track slot numbers and boxes; payloads live in the index.
pub trait Backend<T: Copy + Ord + Debug> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Remove a slot from the spatial structure. Unknown slots are ignored.
    fn remove(&mut self, slot: usize);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Query slots whose AABB [overlaps](Aabb2D::overlaps) the rectangle.
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a>;

    /// Whether any slot overlaps the rectangle.
    ///
    /// Backends that can stop at the first hit should override this.
    fn any_overlap(&self, rect: Aabb2D<T>) -> bool {
        self.query_rect(rect).next().is_some()
    }
}
