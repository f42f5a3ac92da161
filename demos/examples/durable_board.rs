// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picking a backend from configuration and driving it through the repository trait.
//!
//! The config is JSON here; any `serde` format works. With no path the SQLite
//! backend uses a private in-memory database.
//!
//! Run:
//! - `cargo run -p stackboard_demos --example durable_board`
//! - `cargo run -p stackboard_demos --example durable_board -- '{"backend":{"kind":"memory"}}'`

use stackboard_store::{EngineConfig, WidgetRepository, WidgetSpec, open_repository};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = r#"{ "first-z": 1, "backend": { "kind": "sqlite" } }"#;

fn fill(repo: &dyn WidgetRepository) -> stackboard_store::Result<()> {
    for i in 0..8 {
        repo.create(WidgetSpec::new(10 * i, 20, 30, 40))?;
    }
    // Lands on the bottom widget's slot and pushes the whole contiguous stack up.
    let bottom = repo.find_top(1)?.remove(0);
    repo.create(WidgetSpec::new(0, 0, 5, 5).at_z(bottom.z))?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let raw = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let config: EngineConfig = match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "bad config, falling back to defaults");
            EngineConfig::default()
        }
    };
    info!(backend = ?config.backend, first_z = config.first_z, "opening repository");

    let repo = open_repository(&config).expect("open repository");
    fill(repo.as_ref()).expect("fill board");

    for w in repo.find_top(3).expect("find top") {
        println!(
            "{}",
            serde_json::to_string(&w).expect("widgets always serialize")
        );
    }

    let missing = stackboard_store::WidgetId::new(999);
    match repo.delete(missing) {
        Err(err) => println!("delete {missing}: {err}"),
        Ok(()) => println!("delete {missing}: unexpectedly succeeded"),
    }
}
