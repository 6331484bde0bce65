// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watching a region while other threads claim and release space.
//!
//! The engine lives behind one `Mutex`. Each worker claims a slot, and the minimap's
//! watcher hears about the part of every claim that falls inside its area.
//!
//! Run:
//! - `cargo run -p understory_reserve_demos --example region_watchers`

use std::sync::{Arc, Mutex};
use std::thread;

use understory_reserve::{ChangeKinds, Region, RegionChange, RegionError, ReservationEngine};

fn main() -> Result<(), RegionError> {
    let engine = Arc::new(Mutex::new(ReservationEngine::<String>::new()));
    let heard = Arc::new(Mutex::new(Vec::new()));

    let minimap = Region::from_xywh(100, 0, 100, 100)?;
    {
        let sink = Arc::clone(&heard);
        let mut engine = engine.lock().unwrap();
        engine.watch(
            minimap,
            Arc::new(move |change: RegionChange, overlap: Region| {
                sink.lock().unwrap().push((change, overlap));
            }),
        );
        // Only releases matter to the status bar.
        engine.watch_kinds(
            Region::from_xywh(0, 0, 400, 20)?,
            ChangeKinds::FREED,
            Arc::new(|_: RegionChange, overlap: Region| println!("  status bar freed {overlap}")),
        );
    }

    let workers: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let slot = Region::from_xywh(i * 60, 0, 60, 20)?;
                let mut engine = engine.lock().unwrap();
                let won = engine.try_occupy(format!("worker{i}"), slot);
                Ok::<_, RegionError>(won)
            })
        })
        .collect();
    for w in workers {
        assert!(w.join().unwrap()?, "slots are disjoint");
    }

    println!("== Releasing ==");
    {
        let mut engine = engine.lock().unwrap();
        engine.free(&"worker1".to_string());
        engine.free(&"worker2".to_string());
    }

    println!("== Minimap heard ==");
    let heard = heard.lock().unwrap();
    for (change, overlap) in heard.iter() {
        println!("  {change:?} {overlap}");
    }
    // Workers 1, 2 and 3 reach into the minimap; 1 and 2 then leave.
    assert_eq!(heard.len(), 5);
    Ok(())
}
