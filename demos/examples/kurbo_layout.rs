// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reserving space for layout output expressed in Kurbo rectangles.
//!
//! Fractional bounds are rounded outward to whole pixels before claiming, so two
//! widgets that overlap by a fraction of a pixel still collide.
//!
//! Run:
//! - `cargo run -p understory_reserve_demos --example kurbo_layout`

use kurbo::Rect;
use understory_reserve::{Region, RegionError, ReservationEngine};

fn main() -> Result<(), RegionError> {
    let mut engine = ReservationEngine::new();

    let panels = [
        ("health", Rect::new(4.0, 4.0, 120.5, 16.0)),
        ("armor", Rect::new(120.25, 4.0, 200.0, 16.0)),
        ("ammo", Rect::new(200.0, 4.0, 260.0, 16.0)),
    ];
    for (name, rect) in panels {
        let region = Region::from_kurbo_rect(rect)?;
        let won = engine.try_occupy(name, region);
        println!("  {name:<7} {rect:?} -> {region} {}", if won { "ok" } else { "taken" });
    }

    assert!(engine.is_occupied(&"health"));
    assert!(!engine.is_occupied(&"armor"));
    assert!(engine.is_occupied(&"ammo"));

    let health = engine.region_of(&"health").map(|r| r.to_kurbo_rect());
    assert_eq!(health, Some(Rect::new(4.0, 4.0, 121.0, 16.0)));
    Ok(())
}
