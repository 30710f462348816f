// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

#[macro_use]
extern crate tracing;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .init();

    Ok(())
}

/// The column name a stored `RecurrentEventSet` document is expected to live
/// under, as emitted by [`tempora::json::to_json`].
const COLUMN_NAME: &str = "recurrent_event_set";
const TABLE_NAME: &str = "recurrent_event_sets";

fn main() -> Result<()> {
    init_tracing()?;

    info!(table = TABLE_NAME, "emitting storage DDL");

    println!(
        "CREATE TABLE {TABLE_NAME} (\n    \
             id BIGINT PRIMARY KEY GENERATED ALWAYS AS IDENTITY,\n    \
             {COLUMN_NAME} JSONB NOT NULL,\n    \
             created_at TIMESTAMPTZ NOT NULL DEFAULT now()\n\
         );"
    );

    Ok(())
}
