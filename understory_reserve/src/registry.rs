// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Authoritative owner → region mapping, kept in lockstep with the spatial index.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use understory_reserve_index::{Backend, IndexGeneric, Key, RTreeI32};

use crate::region::Region;

#[derive(Copy, Clone, Debug)]
struct Occupied {
    region: Region,
    key: Key,
}

/// Occupied regions by owner, plus a spatial index over the same entries.
///
/// Every owner has at most one region, and the index holds exactly one entry per owner.
/// Both structures are only ever changed together, so after any call the set of
/// `(owner, region)` pairs in the map and in the index are the same.
#[derive(Clone, Debug)]
pub struct OccupancyRegistry<Id, B = RTreeI32>
where
    Id: Clone + Eq + Hash + Debug,
    B: Backend<i32>,
{
    entries: HashMap<Id, Occupied>,
    index: IndexGeneric<i32, Id, B>,
}

impl<Id, B> Default for OccupancyRegistry<Id, B>
where
    Id: Clone + Eq + Hash + Debug,
    B: Backend<i32> + Default,
{
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<Id, B> OccupancyRegistry<Id, B>
where
    Id: Clone + Eq + Hash + Debug,
    B: Backend<i32>,
{
    /// Create an empty registry over the given (empty) spatial backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: HashMap::new(),
            index: IndexGeneric::with_backend(backend),
        }
    }

    /// Record `id` as the owner of `region`.
    ///
    /// If `id` already owned a region, that claim is retracted from both the map and the
    /// index and returned.
    pub fn put(&mut self, id: Id, region: Region) -> Option<Region> {
        let previous = self.remove(&id);
        let key = self.index.insert(region.into(), id.clone());
        self.entries.insert(id, Occupied { region, key });
        previous
    }

    /// Retract the claim of `id`, returning its region.
    pub fn remove(&mut self, id: &Id) -> Option<Region> {
        let occupied = self.entries.remove(id)?;
        let retracted = self.index.remove(occupied.key);
        debug_assert!(
            retracted.is_some(),
            "registry entry for {id:?} had no index entry"
        );
        Some(occupied.region)
    }

    /// The region owned by `id`.
    pub fn get(&self, id: &Id) -> Option<Region> {
        self.entries.get(id).map(|o| o.region)
    }

    /// Whether `id` currently owns a region.
    pub fn contains_id(&self, id: &Id) -> bool {
        self.entries.contains_key(id)
    }

    /// Whether any owned region overlaps `region`.
    pub fn contains_overlap(&self, region: Region) -> bool {
        self.index.any_overlap(region.into())
    }

    /// Whether any region not owned by `id` overlaps `region`.
    pub fn contains_overlap_excluding(&self, region: Region, id: &Id) -> bool {
        if !self.entries.contains_key(id) {
            return self.contains_overlap(region);
        }
        self.index
            .query_rect(region.into())
            .any(|(_, owner)| owner != id)
    }

    /// Owners whose regions overlap `region`, in unspecified order.
    pub fn occupants(&self, region: Region) -> Vec<Id> {
        self.index
            .query_rect(region.into())
            .map(|(_, owner)| owner.clone())
            .collect()
    }

    /// Iterate over all `(owner, region)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, Region)> + '_ {
        self.entries.iter().map(|(id, o)| (id, o.region))
    }

    /// Number of owners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is occupied.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every claim, returning them.
    pub fn drain(&mut self) -> Vec<(Id, Region)> {
        self.index.clear();
        self.entries.drain().map(|(id, o)| (id, o.region)).collect()
    }

    /// The spatial index as it stands.
    pub fn index(&self) -> &IndexGeneric<i32, Id, B> {
        &self.index
    }
}
