// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Randomized checks of the ordering and containment guarantees.

use proptest::prelude::*;
use stackboard_store::{Area, Engine, Widget, WidgetId, WidgetRepository, WidgetSpec};

#[derive(Clone, Debug)]
enum Op {
    Create(WidgetSpec),
    Update(usize, WidgetSpec),
    Delete(usize),
}

fn spec() -> impl Strategy<Value = WidgetSpec> {
    (
        -50..50_i32,
        -50..50_i32,
        prop::option::of(-5..15_i32),
        1..40_i32,
        1..40_i32,
    )
        .prop_map(|(x, y, z, width, height)| WidgetSpec {
            x,
            y,
            z,
            width,
            height,
        })
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => spec().prop_map(Op::Create),
        2 => (any::<usize>(), spec()).prop_map(|(i, s)| Op::Update(i, s)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn area() -> impl Strategy<Value = Area> {
    (-60..60_i32, -60..60_i32, 1..80_i32, 1..80_i32).prop_map(|(x0, y0, w, h)| Area {
        x0,
        y0,
        x1: x0 + w,
        y1: y0 + h,
    })
}

/// Run `ops` against `repo`, picking update/delete targets among live ids.
fn run(repo: &dyn WidgetRepository, ops: &[Op]) -> Vec<WidgetId> {
    let mut live: Vec<WidgetId> = Vec::new();
    for op in ops {
        match op {
            Op::Create(spec) => live.push(repo.create(*spec).unwrap().id),
            Op::Update(i, spec) if !live.is_empty() => {
                let id = live[i % live.len()];
                repo.update(id, *spec).unwrap();
            }
            Op::Delete(i) if !live.is_empty() => {
                let id = live.remove(i % live.len());
                repo.delete(id).unwrap();
            }
            _ => {}
        }
    }
    live
}

#[cfg(feature = "sqlite")]
fn geometry(widgets: &[Widget]) -> Vec<(WidgetId, i32, i32, i32, i32, i32)> {
    widgets
        .iter()
        .map(|w| (w.id, w.x, w.y, w.z, w.width, w.height))
        .collect()
}

proptest! {
    #[test]
    fn z_stays_unique_and_ordered(ops in prop::collection::vec(op(), 0..60)) {
        let engine = Engine::new();
        let live = run(&engine, &ops);

        let all = engine.find_top(500).unwrap();
        prop_assert_eq!(all.len(), live.len());
        prop_assert!(all.windows(2).all(|pair| pair[0].z < pair[1].z));
        for w in &all {
            prop_assert_eq!(engine.get(w.id).unwrap(), w.clone());
        }
    }

    #[test]
    fn shift_preserves_count_and_relative_order(
        ops in prop::collection::vec(op(), 0..40),
        new in spec(),
        z in -5..15_i32,
    ) {
        let engine = Engine::new();
        run(&engine, &ops);
        let before = engine.find_top(500).unwrap();

        let placed = engine.create(WidgetSpec { z: Some(z), ..new }).unwrap();
        let after = engine.find_top(500).unwrap();
        prop_assert_eq!(after.len(), before.len() + 1);
        prop_assert_eq!(placed.z, z);

        // Length of the occupied run starting at `z`.
        let occupied: Vec<i32> = before.iter().map(|w| w.z).collect();
        let run_len = (0..).take_while(|k| occupied.contains(&(z + k))).count();

        let others: Vec<_> = after.iter().filter(|w| w.id != placed.id).collect();
        prop_assert_eq!(others.len(), before.len());
        for (old, moved) in before.iter().zip(others) {
            // Same relative order, so zipping by position pairs each widget with itself.
            prop_assert_eq!(old.id, moved.id);
            let in_run = old.z >= z && old.z < z + run_len as i32;
            let expected = if in_run { old.z + 1 } else { old.z };
            prop_assert_eq!(moved.z, expected);
        }
    }

    #[test]
    fn area_query_matches_brute_force(
        ops in prop::collection::vec(op(), 0..60),
        area in area(),
        limit in 1..20_usize,
    ) {
        let engine = Engine::new();
        run(&engine, &ops);

        let mut expected: Vec<Widget> = engine
            .find_top(500)
            .unwrap()
            .into_iter()
            .filter(|w| {
                w.x >= area.x0
                    && w.x + w.width <= area.x1
                    && w.y >= area.y0
                    && w.y + w.height <= area.y1
            })
            .collect();
        expected.truncate(limit);

        prop_assert_eq!(engine.find_in_area(area, limit).unwrap(), expected);
    }

    #[test]
    fn reads_are_idempotent(ops in prop::collection::vec(op(), 1..30)) {
        let engine = Engine::new();
        for id in run(&engine, &ops) {
            prop_assert_eq!(engine.get(id).unwrap(), engine.get(id).unwrap());
        }
    }
}

#[cfg(feature = "sqlite")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sqlite_agrees_with_memory(
        ops in prop::collection::vec(op(), 0..40),
        area in area(),
    ) {
        let engine = Engine::new();
        let sqlite = stackboard_store::SqliteRepository::open_in_memory(Default::default()).unwrap();
        run(&engine, &ops);
        run(&sqlite, &ops);

        prop_assert_eq!(
            geometry(&engine.find_top(500).unwrap()),
            geometry(&sqlite.find_top(500).unwrap())
        );
        prop_assert_eq!(
            geometry(&engine.find_in_area(area, 500).unwrap()),
            geometry(&sqlite.find_in_area(area, 500).unwrap())
        );
    }
}
