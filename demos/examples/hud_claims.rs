// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Several HUD elements competing for the top-left corner.
//!
//! Run:
//! - `cargo run -p understory_reserve_demos --example hud_claims`

use understory_reserve::{Region, RegionError, ReservationEngine};

fn main() -> Result<(), RegionError> {
    let mut engine = ReservationEngine::new();

    // The clock gets there first.
    assert!(engine.try_occupy_xywh("clock", 0, 0, 80, 12)?);
    // The coordinates readout would overlap it, so it moves below.
    assert!(!engine.try_occupy_xywh("coords", 40, 0, 120, 12)?);
    assert!(engine.try_occupy_xywh("coords", 0, 12, 120, 12)?);
    // Edge to edge is fine.
    assert!(engine.try_occupy_xywh("fps", 80, 0, 40, 12)?);

    println!("== Claims ==");
    let mut claims: Vec<_> = engine.iter().collect();
    claims.sort_by_key(|(_, r)| (r.y(), r.x()));
    for (owner, region) in &claims {
        println!("  {owner:<8} {region}");
    }

    // A debug overlay insists on the whole corner.
    let overlay = Region::from_xywh(0, 0, 200, 40)?;
    engine.force_occupy("debug", overlay);
    let mut under = engine.occupants(overlay);
    under.sort_unstable();
    println!("== Under the overlay ==\n  {under:?}");
    assert_eq!(under, ["clock", "coords", "debug", "fps"]);

    // Once it is gone, the clock can grow into its own space.
    engine.free(&"debug");
    assert!(engine.try_occupy_xywh("clock", 0, 0, 80, 12)?);
    assert!(engine.is_free_xywh(120, 0, 80, 12)?);
    println!("== After overlay ==\n  {} claims", engine.occupied_len());
    Ok(())
}
