// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Flat vector backend with linear scans.
#[derive(Clone)]
pub struct FlatVec<T: Copy + Ord + Debug> {
    entries: Vec<Option<Aabb2D<T>>>,
}

impl<T: Copy + Ord + Debug> Default for FlatVec<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Copy + Ord + Debug> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + Ord + Debug> Backend<T> for FlatVec<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.entries.len() <= slot {
            self.entries.resize_with(slot + 1, || None);
        }
        self.entries[slot] = Some(aabb);
    }

    fn remove(&mut self, slot: usize) {
        if let Some(e) = self.entries.get_mut(slot) {
            *e = None;
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(
            self.entries
                .iter()
                .enumerate()
                .filter_map(move |(i, slot)| match slot {
                    Some(a) if a.overlaps(&rect) => Some(i),
                    _ => None,
                }),
        )
    }

    fn any_overlap(&self, rect: Aabb2D<T>) -> bool {
        self.entries
            .iter()
            .flatten()
            .any(|a| a.overlaps(&rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn removed_slots_are_skipped() {
        let mut b: FlatVec<i32> = FlatVec::default();
        b.insert(0, Aabb2D::new(0, 0, 10, 10));
        b.insert(3, Aabb2D::new(5, 5, 15, 15));
        b.remove(0);
        let hits: Vec<_> = b.query_rect(Aabb2D::new(0, 0, 20, 20)).collect();
        assert_eq!(hits, vec![3]);
        // Removing an unknown slot is a no-op.
        b.remove(42);
        assert!(b.any_overlap(Aabb2D::new(6, 6, 7, 7)));
        assert!(!b.any_overlap(Aabb2D::new(1, 1, 4, 4)));
    }
}
