// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watched regions and their listeners.
//!
//! The registry is a one-to-one mapping in both directions:
//!
//! - a region has at most one listener; registering another listener on the same region
//!   displaces the first,
//! - a listener watches at most one region; registering it on a new region moves it.
//!
//! Listeners are identified by their `Arc` allocation, so the same listener can be
//! removed with any clone of the `Arc` it was registered with.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::change::{ChangeKinds, RegionChange, RegionListener};
use crate::region::Region;

/// Identity of a registered listener: the address of its `Arc` allocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct ListenerKey(usize);

impl ListenerKey {
    fn of<L: RegionListener + ?Sized>(listener: &Arc<L>) -> Self {
        Self(Arc::as_ptr(listener).cast::<()>().addr())
    }
}

struct Watch {
    region: Region,
    kinds: ChangeKinds,
    listener: Arc<dyn RegionListener>,
}

/// Bidirectional region ⇄ listener registry.
#[derive(Default)]
pub struct ListenerRegistry {
    by_region: HashMap<Region, ListenerKey>,
    by_listener: HashMap<ListenerKey, Watch>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` on `region` for the given change kinds.
    ///
    /// If the listener already watched another region, that watch is dropped. Returns the
    /// listener previously registered on `region`, if it was a different one.
    pub fn insert(
        &mut self,
        region: Region,
        kinds: ChangeKinds,
        listener: Arc<dyn RegionListener>,
    ) -> Option<Arc<dyn RegionListener>> {
        let key = ListenerKey::of(&listener);
        if let Some(previous) = self.by_listener.remove(&key) {
            self.by_region.remove(&previous.region);
        }
        let displaced = self
            .by_region
            .insert(region, key)
            .and_then(|old| self.by_listener.remove(&old))
            .map(|w| w.listener);
        self.by_listener.insert(
            key,
            Watch {
                region,
                kinds,
                listener,
            },
        );
        displaced
    }

    /// Remove a listener, returning the region it watched.
    pub fn remove_listener<L: RegionListener + ?Sized>(
        &mut self,
        listener: &Arc<L>,
    ) -> Option<Region> {
        let watch = self.by_listener.remove(&ListenerKey::of(listener))?;
        self.by_region.remove(&watch.region);
        Some(watch.region)
    }

    /// Remove whatever listener watches exactly `region`.
    pub fn remove_region(&mut self, region: Region) -> Option<Arc<dyn RegionListener>> {
        let key = self.by_region.remove(&region)?;
        self.by_listener.remove(&key).map(|w| w.listener)
    }

    /// The region a listener currently watches.
    pub fn region_of<L: RegionListener + ?Sized>(&self, listener: &Arc<L>) -> Option<Region> {
        self.by_listener
            .get(&ListenerKey::of(listener))
            .map(|w| w.region)
    }

    /// The listener registered on exactly `region`.
    pub fn listener_for(&self, region: Region) -> Option<&Arc<dyn RegionListener>> {
        let key = self.by_region.get(&region)?;
        self.by_listener.get(key).map(|w| &w.listener)
    }

    /// Number of registered watches.
    pub fn len(&self) -> usize {
        self.by_listener.len()
    }

    /// True if nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.by_listener.is_empty()
    }

    /// Drop every watch.
    pub fn clear(&mut self) {
        self.by_region.clear();
        self.by_listener.clear();
    }

    /// Listeners to notify about `change` of `changed`, each paired with the part of its
    /// watched region that `changed` covers.
    ///
    /// Only watches that subscribed to this kind of change and whose region overlaps the
    /// changed region are returned.
    pub fn affected(
        &self,
        change: RegionChange,
        changed: Region,
    ) -> Vec<(Arc<dyn RegionListener>, Region)> {
        self.by_listener
            .values()
            .filter(|w| w.kinds.contains(change.kind()))
            .filter_map(|w| {
                w.region
                    .intersection(&changed)
                    .map(|overlap| (Arc::clone(&w.listener), overlap))
            })
            .collect()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("watches", &self.by_listener.len())
            .field("regions", &self.by_region.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region::from_xywh(x, y, w, h).unwrap()
    }

    fn noop() -> Arc<dyn RegionListener> {
        Arc::new(|_: RegionChange, _: Region| {})
    }

    #[test]
    fn last_registration_for_a_region_wins() {
        let mut reg = ListenerRegistry::new();
        let first = noop();
        let second = noop();
        assert!(reg.insert(region(0, 0, 10, 10), ChangeKinds::all(), first.clone()).is_none());
        let displaced = reg.insert(region(0, 0, 10, 10), ChangeKinds::all(), second.clone());
        assert!(displaced.is_some_and(|d| Arc::ptr_eq(&d, &first)));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.region_of(&first), None);
        assert_eq!(reg.region_of(&second), Some(region(0, 0, 10, 10)));
    }

    #[test]
    fn re_registering_a_listener_moves_it() {
        let mut reg = ListenerRegistry::new();
        let l = noop();
        let _ = reg.insert(region(0, 0, 10, 10), ChangeKinds::all(), l.clone());
        let _ = reg.insert(region(50, 50, 10, 10), ChangeKinds::all(), l.clone());
        assert_eq!(reg.len(), 1);
        assert!(reg.listener_for(region(0, 0, 10, 10)).is_none());
        assert_eq!(reg.region_of(&l), Some(region(50, 50, 10, 10)));
    }

    #[test]
    fn removal_by_either_side_keeps_maps_in_sync() {
        let mut reg = ListenerRegistry::new();
        let a = noop();
        let b = noop();
        let _ = reg.insert(region(0, 0, 10, 10), ChangeKinds::all(), a.clone());
        let _ = reg.insert(region(20, 0, 10, 10), ChangeKinds::all(), b.clone());

        assert_eq!(reg.remove_listener(&a), Some(region(0, 0, 10, 10)));
        assert!(reg.listener_for(region(0, 0, 10, 10)).is_none());
        assert_eq!(reg.remove_listener(&a), None);

        let removed = reg.remove_region(region(20, 0, 10, 10));
        assert!(removed.is_some_and(|r| Arc::ptr_eq(&r, &b)));
        assert_eq!(reg.region_of(&b), None);
        assert!(reg.is_empty());
    }

    #[test]
    fn identity_survives_unsizing() {
        struct Counter;
        impl RegionListener for Counter {
            fn on_region_change(&self, _: RegionChange, _: Region) {}
        }
        let mut reg = ListenerRegistry::new();
        let concrete = Arc::new(Counter);
        let _ = reg.insert(region(0, 0, 1, 1), ChangeKinds::all(), concrete.clone());
        assert_eq!(reg.remove_listener(&concrete), Some(region(0, 0, 1, 1)));
    }

    #[test]
    fn affected_filters_by_overlap_and_kind() {
        let mut reg = ListenerRegistry::new();
        let _ = reg.insert(region(0, 0, 10, 10), ChangeKinds::all(), noop());
        let _ = reg.insert(region(100, 100, 10, 10), ChangeKinds::all(), noop());
        let _ = reg.insert(region(5, 5, 10, 10), ChangeKinds::FREED, noop());

        let hits = reg.affected(RegionChange::Occupied, region(8, 8, 4, 4));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].1, region(8, 8, 2, 2));

        let mut freed: Vec<_> = reg
            .affected(RegionChange::Freed, region(8, 8, 4, 4))
            .into_iter()
            .map(|(_, overlap)| overlap)
            .collect();
        freed.sort_by_key(|r| r.width());
        assert_eq!(freed, [region(8, 8, 2, 2), region(8, 8, 4, 4)]);
    }
}
