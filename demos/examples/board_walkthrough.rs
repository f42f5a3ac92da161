// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacking and area queries on the in-memory engine.
//!
//! This example shows:
//! - explicit z collisions shifting the run above them,
//! - automatic z stacking new widgets on top,
//! - area queries pruned by x and ordered by z.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p stackboard_demos --example board_walkthrough`

use stackboard_store::{Area, Engine, Widget, WidgetSpec};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_stack(label: &str, widgets: &[Widget]) {
    println!("{label}:");
    for w in widgets {
        println!(
            "  z={:>3} id={:>2} box=({}, {}) {}x{}",
            w.z, w.id, w.x, w.y, w.width, w.height
        );
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let engine = Engine::new();

    // Two widgets asking for the same z: the newer one wins the slot.
    let a = engine
        .create(WidgetSpec::new(1000, 1050, 100, 100).at_z(5))
        .expect("create a");
    let b = engine
        .create(WidgetSpec::new(1050, 1100, 100, 100).at_z(5))
        .expect("create b");
    // Landing on 6 pushes `a` (now at 6) to 7.
    let c = engine
        .create(WidgetSpec::new(1100, 1100, 100, 100).at_z(6))
        .expect("create c");
    info!(a = %a.id, b = %b.id, c = %c.id, "created three widgets");

    print_stack("stack", &engine.find_top(10).expect("find top"));

    let area = Area::new(1000, 1000, 1100, 1150).expect("valid area");
    print_stack(
        "inside (1000, 1000)-(1100, 1150)",
        &engine.find_in_area(area, 10).expect("find in area"),
    );

    // Slide `c` to the bottom of the stack and into the area.
    engine
        .update(c.id, WidgetSpec::new(1000, 1000, 50, 50).at_z(0))
        .expect("update c");
    print_stack(
        "inside after moving c",
        &engine.find_in_area(area, 10).expect("find in area"),
    );

    engine.delete(b.id).expect("delete b");
    print_stack("stack after deleting b", &engine.find_top(10).expect("find top"));
}
