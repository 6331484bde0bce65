// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::rtree::RTree;
use crate::types::{Aabb2D, Scalar};

/// Generational handle for entries.
///
/// A key stays valid until its entry is removed. Reusing a slot bumps its generation,
/// so stale keys never alias a newer entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct Slot<T, P> {
    generation: u32,
    live: Option<(Aabb2D<T>, P)>,
}

/// A generic AABB index parameterized by a spatial backend.
///
/// Inserts and removals take effect immediately. The index performs no duplicate
/// detection: inserting the same box twice yields two entries with distinct keys.
#[derive(Clone, Debug)]
pub struct IndexGeneric<T: Copy + Ord + Debug, P: Debug, B: Backend<T>> {
    slots: Vec<Slot<T, P>>,
    free_list: Vec<usize>,
    len: usize,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + Ord + Debug,
    P: Debug,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + Ord + Debug,
    P: Debug,
    B: Backend<T>,
{
    /// Create an empty index over an explicitly configured backend.
    ///
    /// The backend should be empty; entries it already holds are not addressable by key.
    pub fn with_backend(backend: B) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            backend,
        }
    }

    /// Reserve space for at least `n` additional entries.
    pub fn reserve(&mut self, n: usize) {
        self.slots.reserve(n);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a new AABB with payload. Returns a stable handle `Key`.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let idx = if let Some(idx) = self.free_list.pop() {
            let slot = &mut self.slots[idx];
            slot.generation = slot.generation.wrapping_add(1);
            slot.live = Some((aabb, payload));
            idx
        } else {
            self.slots.push(Slot {
                generation: 1,
                live: Some((aabb, payload)),
            });
            self.slots.len() - 1
        };
        self.backend.insert(idx, aabb);
        self.len += 1;
        Key::new(idx, self.slots[idx].generation)
    }

    /// Remove an entry, returning its box and payload. Stale keys are a no-op.
    pub fn remove(&mut self, key: Key) -> Option<(Aabb2D<T>, P)> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        let removed = slot.live.take()?;
        self.backend.remove(key.idx());
        self.free_list.push(key.idx());
        self.len -= 1;
        Some(removed)
    }

    /// Look up a live entry by key.
    pub fn get(&self, key: Key) -> Option<(Aabb2D<T>, &P)> {
        let slot = self.slots.get(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        slot.live.as_ref().map(|(aabb, p)| (*aabb, p))
    }

    /// Whether `key` refers to a live entry.
    pub fn contains_key(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
        self.backend.clear();
    }

    /// Iterate over all live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, Aabb2D<T>, &P)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.live
                .as_ref()
                .map(|(aabb, p)| (Key::new(i, s.generation), *aabb, p))
        })
    }

    /// Query for entries whose AABB [overlaps](Aabb2D::overlaps) the given rectangle.
    ///
    /// Result order is unspecified.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = (Key, &P)> + '_ {
        self.backend.query_rect(rect).filter_map(|i| {
            let s = self.slots.get(i)?;
            s.live.as_ref().map(|(_, p)| (Key::new(i, s.generation), p))
        })
    }

    /// Whether any entry overlaps the given rectangle, without collecting matches.
    pub fn any_overlap(&self, rect: Aabb2D<T>) -> bool {
        self.backend.any_overlap(rect)
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, FlatVec<T>>;

impl<T: Copy + Ord + Debug, P: Debug> Default for Index<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P: Debug> Index<T, P> {
    /// Create an R-tree-backed index.
    pub fn with_rtree() -> IndexGeneric<T, P, RTree<T>> {
        IndexGeneric::with_backend(RTree::default())
    }

    /// Build an R-tree-backed index in bulk from entries.
    pub fn with_rtree_bulk(entries: Vec<(Aabb2D<T>, P)>) -> IndexGeneric<T, P, RTree<T>> {
        let mut pairs: Vec<(usize, Aabb2D<T>)> = Vec::with_capacity(entries.len());
        let mut slots = Vec::with_capacity(entries.len());
        for (i, (aabb, payload)) in entries.into_iter().enumerate() {
            slots.push(Slot {
                generation: 1,
                live: Some((aabb, payload)),
            });
            pairs.push((i, aabb));
        }
        IndexGeneric {
            len: slots.len(),
            slots,
            free_list: Vec::new(),
            backend: RTree::bulk_build(&pairs),
        }
    }
}
