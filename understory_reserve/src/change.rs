// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occupancy change events and the listener capability.

use crate::region::Region;

/// The kind of occupancy transition a listener is told about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegionChange {
    /// A region was claimed.
    Occupied,
    /// A claimed region was released.
    Freed,
}

impl RegionChange {
    /// The [`ChangeKinds`] flag matching this change.
    pub const fn kind(self) -> ChangeKinds {
        match self {
            Self::Occupied => ChangeKinds::OCCUPIED,
            Self::Freed => ChangeKinds::FREED,
        }
    }
}

bitflags::bitflags! {
    /// Which transitions a watcher wants to hear about.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ChangeKinds: u8 {
        /// Regions being claimed.
        const OCCUPIED = 0b0000_0001;
        /// Regions being released.
        const FREED    = 0b0000_0010;
    }
}

impl Default for ChangeKinds {
    fn default() -> Self {
        Self::all()
    }
}

/// Receives occupancy changes for a watched region.
///
/// `overlap` is the part of the watched region covered by the changed claim. Callbacks run
/// synchronously on the thread that changed the occupancy; a panic in one listener is
/// contained and does not stop delivery to the others.
///
/// Any `Fn(RegionChange, Region)` closure is a listener.
pub trait RegionListener: Send + Sync {
    /// Called once per matching change.
    fn on_region_change(&self, change: RegionChange, overlap: Region);
}

impl<F> RegionListener for F
where
    F: Fn(RegionChange, Region) + Send + Sync,
{
    fn on_region_change(&self, change: RegionChange, overlap: Region) {
        self(change, overlap);
    }
}
