// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reservation engine: occupy, free, query, and notify.

use std::fmt::Debug;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use understory_reserve_index::{Backend, IndexGeneric, RTreeI32};

use crate::change::{ChangeKinds, RegionChange, RegionListener};
use crate::listeners::ListenerRegistry;
use crate::region::{Region, RegionError};
use crate::registry::OccupancyRegistry;

/// Arbitrates claims on screen regions and tells watchers when occupancy changes.
///
/// Claims are first come, first served: [`try_occupy`](Self::try_occupy) succeeds only if no
/// other owner's region overlaps the requested one. [`force_occupy`](Self::force_occupy)
/// skips the check.
///
/// After every successful claim or release, each watcher whose region overlaps the changed
/// region is called with the change kind and the overlapping part of its watched region.
///
/// The engine is a plain owned value with no interior locking. Every mutating method takes
/// `&mut self`, so the occupancy map and the spatial index are always seen together, and
/// listeners cannot call back into the engine while it is delivering. The engine is `Send`;
/// wrap it in a single `Mutex` to share it across threads.
#[derive(Debug)]
pub struct ReservationEngine<Id, B = RTreeI32>
where
    Id: Clone + Eq + Hash + Debug,
    B: Backend<i32>,
{
    occupancy: OccupancyRegistry<Id, B>,
    listeners: ListenerRegistry,
}

impl<Id, B> Default for ReservationEngine<Id, B>
where
    Id: Clone + Eq + Hash + Debug,
    B: Backend<i32> + Default,
{
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl<Id> ReservationEngine<Id>
where
    Id: Clone + Eq + Hash + Debug,
{
    /// Create an empty engine backed by an R-tree.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<Id, B> ReservationEngine<Id, B>
where
    Id: Clone + Eq + Hash + Debug,
    B: Backend<i32>,
{
    /// Create an empty engine over an explicitly configured spatial backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            occupancy: OccupancyRegistry::with_backend(backend),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Claim `region` for `id` if no other owner's region overlaps it.
    ///
    /// Returns `false`, changing nothing, when the region is taken. If `id` already owns a
    /// region, a successful call moves the claim: the old region is released (with
    /// [`Freed`](RegionChange::Freed) notifications) before the new one is occupied. The
    /// owner's current region never blocks its own move.
    pub fn try_occupy(&mut self, id: Id, region: Region) -> bool {
        if self.occupancy.contains_overlap_excluding(region, &id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(owner = ?id, %region, "region is taken");
            return false;
        }
        self.occupy(id, region);
        true
    }

    /// [`try_occupy`](Self::try_occupy) with origin/size coordinates.
    pub fn try_occupy_xywh(
        &mut self,
        id: Id,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<bool, RegionError> {
        let region = Region::from_xywh(x, y, width, height)?;
        Ok(self.try_occupy(id, region))
    }

    /// Whether no owned region overlaps `region`.
    pub fn is_free(&self, region: Region) -> bool {
        !self.occupancy.contains_overlap(region)
    }

    /// [`is_free`](Self::is_free) with origin/size coordinates.
    pub fn is_free_xywh(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<bool, RegionError> {
        Ok(self.is_free(Region::from_xywh(x, y, width, height)?))
    }

    /// Claim `region` for `id` regardless of other owners.
    ///
    /// Overlapping claims may coexist afterwards. A previous claim by `id` is moved as in
    /// [`try_occupy`](Self::try_occupy).
    pub fn force_occupy(&mut self, id: Id, region: Region) {
        #[cfg(feature = "tracing")]
        if !self.is_free(region) {
            tracing::debug!(owner = ?id, %region, "forcing claim over occupied region");
        }
        self.occupy(id, region);
    }

    /// [`force_occupy`](Self::force_occupy) with origin/size coordinates.
    pub fn force_occupy_xywh(
        &mut self,
        id: Id,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), RegionError> {
        self.force_occupy(id, Region::from_xywh(x, y, width, height)?);
        Ok(())
    }

    /// Release the claim held by `id`. Unknown owners are ignored.
    pub fn free(&mut self, id: &Id) {
        if let Some(region) = self.occupancy.remove(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!(owner = ?id, %region, "freed");
            self.notify(RegionChange::Freed, region);
        }
    }

    /// Release every claim, notifying watchers for each.
    pub fn free_all(&mut self) {
        for (_id, region) in self.occupancy.drain() {
            self.notify(RegionChange::Freed, region);
        }
    }

    /// Watch `region` for all changes.
    ///
    /// Replaces any listener already watching exactly `region`; if `listener` was watching
    /// another region, it now watches this one instead.
    pub fn watch(&mut self, region: Region, listener: Arc<dyn RegionListener>) {
        self.watch_kinds(region, ChangeKinds::all(), listener);
    }

    /// Watch `region` for the given kinds of change only.
    pub fn watch_kinds(
        &mut self,
        region: Region,
        kinds: ChangeKinds,
        listener: Arc<dyn RegionListener>,
    ) {
        #[cfg_attr(
            not(feature = "tracing"),
            expect(unused_variables, reason = "Only read when logging.")
        )]
        let displaced = self.listeners.insert(region, kinds, listener);
        #[cfg(feature = "tracing")]
        if displaced.is_some() {
            tracing::debug!(%region, "replaced existing watcher");
        }
    }

    /// [`watch`](Self::watch) with origin/size coordinates.
    pub fn watch_xywh(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        listener: Arc<dyn RegionListener>,
    ) -> Result<(), RegionError> {
        self.watch(Region::from_xywh(x, y, width, height)?, listener);
        Ok(())
    }

    /// Stop notifying `listener`. Returns whether it was registered.
    pub fn unwatch<L: RegionListener + ?Sized>(&mut self, listener: &Arc<L>) -> bool {
        self.listeners.remove_listener(listener).is_some()
    }

    /// Remove the listener watching exactly `region`. Returns whether there was one.
    pub fn unwatch_region(&mut self, region: Region) -> bool {
        self.listeners.remove_region(region).is_some()
    }

    /// The region claimed by `id`.
    pub fn region_of(&self, id: &Id) -> Option<Region> {
        self.occupancy.get(id)
    }

    /// Whether `id` holds a claim.
    pub fn is_occupied(&self, id: &Id) -> bool {
        self.occupancy.contains_id(id)
    }

    /// Owners whose claims overlap `region`, in unspecified order.
    pub fn occupants(&self, region: Region) -> Vec<Id> {
        self.occupancy.occupants(region)
    }

    /// All claims, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, Region)> + '_ {
        self.occupancy.iter()
    }

    /// Number of live claims.
    pub fn occupied_len(&self) -> usize {
        self.occupancy.len()
    }

    /// Number of registered watchers.
    pub fn watcher_count(&self) -> usize {
        self.listeners.len()
    }

    /// A copy of the spatial index as it stands now.
    ///
    /// The copy is unaffected by later claims and releases.
    pub fn snapshot_index(&self) -> IndexGeneric<i32, Id, B>
    where
        B: Clone,
    {
        self.occupancy.index().clone()
    }

    fn occupy(&mut self, id: Id, region: Region) {
        #[cfg(feature = "tracing")]
        let owner = id.clone();
        let previous = self.occupancy.put(id, region);
        #[cfg(feature = "tracing")]
        match previous {
            Some(from) => tracing::debug!(owner = ?owner, %from, to = %region, "moved"),
            None => tracing::debug!(owner = ?owner, %region, "occupied"),
        }
        if let Some(previous) = previous {
            self.notify(RegionChange::Freed, previous);
        }
        self.notify(RegionChange::Occupied, region);
    }

    /// Deliver `change` of `region` to every overlapping watcher, isolating panics.
    fn notify(&self, change: RegionChange, region: Region) {
        for (listener, overlap) in self.listeners.affected(change, region) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?change, %overlap, "notifying watcher");
            let delivered =
                panic::catch_unwind(AssertUnwindSafe(|| listener.on_region_change(change, overlap)));
            if delivered.is_err() {
                #[cfg(feature = "tracing")]
                tracing::warn!(?change, %overlap, "region listener panicked");
            }
        }
    }
}
