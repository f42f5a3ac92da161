// Copyright 2025 the Stackboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Durable backend over a single SQLite table.
//!
//! Each mutating call is one transaction. Shifting rewrites the contiguous
//! run of rows in descending z order, so the `UNIQUE` constraint on `z` holds
//! after every statement, not only at commit.

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use tracing::{debug, info, trace};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::repository::WidgetRepository;
use crate::widget::{Area, Widget, WidgetId, WidgetSpec, stamp};

// `z` is nullable only so a row being moved can vacate its slot mid-transaction.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS widget (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    x          INTEGER NOT NULL,
    y          INTEGER NOT NULL,
    z          INTEGER UNIQUE,
    width      INTEGER NOT NULL CHECK (width > 0),
    height     INTEGER NOT NULL CHECK (height > 0),
    updated_at INTEGER NOT NULL
);
";

const SELECT_COLUMNS: &str = "SELECT id, x, y, z, width, height, updated_at FROM widget";

/// [`WidgetRepository`] backed by an SQLite database.
pub struct SqliteRepository {
    conn: Mutex<Connection>,
    config: EngineConfig,
}

impl std::fmt::Debug for SqliteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SqliteRepository {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self> {
        Self::with_connection(Connection::open(path)?, config)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(config: EngineConfig) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, config)
    }

    fn with_connection(conn: Connection, config: EngineConfig) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            config,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM widget", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

impl WidgetRepository for SqliteRepository {
    fn create(&self, spec: WidgetSpec) -> Result<Widget> {
        spec.validate()?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let z = match spec.z {
            Some(z) => {
                shift_run(&tx, z)?;
                z
            }
            None => next_z(&tx, self.config.first_z)?,
        };
        let updated_at = stamp();
        tx.execute(
            "INSERT INTO widget (x, y, z, width, height, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                spec.x,
                spec.y,
                z,
                spec.width,
                spec.height,
                updated_at.timestamp_millis()
            ],
        )?;
        let row_id = tx.last_insert_rowid();
        tx.commit()?;

        let id = WidgetId::new(
            u64::try_from(row_id).expect("sqlite invariant violated: negative rowid"),
        );
        info!(%id, z, "created widget");
        Ok(Widget {
            id,
            x: spec.x,
            y: spec.y,
            z,
            width: spec.width,
            height: spec.height,
            updated_at,
        })
    }

    fn update(&self, id: WidgetId, spec: WidgetSpec) -> Result<Widget> {
        spec.validate()?;
        let row_id = row_id(id)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let current: i32 = tx
            .query_row("SELECT z FROM widget WHERE id = ?1", [row_id], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or(Error::NotFound(id))?;

        let z = match spec.z {
            Some(z) if z != current => {
                tx.execute("UPDATE widget SET z = NULL WHERE id = ?1", [row_id])?;
                shift_run(&tx, z)?;
                z
            }
            _ => current,
        };
        let updated_at = stamp();
        tx.execute(
            "UPDATE widget SET x = ?1, y = ?2, z = ?3, width = ?4, height = ?5, updated_at = ?6 \
             WHERE id = ?7",
            params![
                spec.x,
                spec.y,
                z,
                spec.width,
                spec.height,
                updated_at.timestamp_millis(),
                row_id
            ],
        )?;
        tx.commit()?;

        info!(%id, z, "updated widget");
        Ok(Widget {
            id,
            x: spec.x,
            y: spec.y,
            z,
            width: spec.width,
            height: spec.height,
            updated_at,
        })
    }

    fn delete(&self, id: WidgetId) -> Result<()> {
        let row_id = row_id(id)?;
        let conn = self.conn.lock();
        if conn.execute("DELETE FROM widget WHERE id = ?1", [row_id])? == 0 {
            return Err(Error::NotFound(id));
        }
        info!(%id, "deleted widget");
        Ok(())
    }

    fn get(&self, id: WidgetId) -> Result<Widget> {
        let row_id = row_id(id)?;
        let conn = self.conn.lock();
        let widget = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [row_id],
                decode_widget,
            )
            .optional()?
            .ok_or(Error::NotFound(id))?;
        trace!(%id, "found widget");
        Ok(widget)
    }

    fn find_top(&self, limit: usize) -> Result<Vec<Widget>> {
        self.config.check_limit(limit)?;
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY z LIMIT ?1"))?;
        let found = stmt
            .query_map([sql_limit(limit)], decode_widget)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        trace!(limit, found = found.len(), "found widgets by z");
        Ok(found)
    }

    fn find_in_area(&self, area: Area, limit: usize) -> Result<Vec<Widget>> {
        area.validate()?;
        self.config.check_limit(limit)?;
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "{SELECT_COLUMNS} \
             WHERE x >= ?1 AND x + width <= ?2 AND y >= ?3 AND y + height <= ?4 \
             ORDER BY z LIMIT ?5"
        ))?;
        let found = stmt
            .query_map(
                params![area.x0, area.x1, area.y0, area.y1, sql_limit(limit)],
                decode_widget,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        trace!(?area, limit, found = found.len(), "found widgets in area");
        Ok(found)
    }
}

/// Map one row of `SELECT_COLUMNS` onto a [`Widget`], by column name.
fn decode_widget(row: &Row<'_>) -> rusqlite::Result<Widget> {
    let id: i64 = row.get("id")?;
    let id = u64::try_from(id).map_err(|_| out_of_range(row, "id", id))?;
    let millis: i64 = row.get("updated_at")?;
    let updated_at = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| out_of_range(row, "updated_at", millis))?;
    Ok(Widget {
        id: WidgetId::new(id),
        x: row.get("x")?,
        y: row.get("y")?,
        z: row.get("z")?,
        width: row.get("width")?,
        height: row.get("height")?,
        updated_at,
    })
}

fn out_of_range(row: &Row<'_>, column: &str, value: i64) -> rusqlite::Error {
    let idx = row.as_ref().column_index(column).unwrap_or_default();
    rusqlite::Error::IntegralValueOutOfRange(idx, value)
}

/// Push the contiguous run of rows starting at `z` up by one. Returns the run length.
fn shift_run(tx: &Transaction<'_>, z: i32) -> Result<usize> {
    let run = {
        let mut stmt = tx.prepare_cached("SELECT id, z FROM widget WHERE z >= ?1 ORDER BY z")?;
        let mut rows = stmt.query([z])?;
        let mut run: Vec<i64> = Vec::new();
        let mut expected = z;
        while let Some(row) = rows.next()? {
            let at: i32 = row.get(1)?;
            if at != expected {
                break;
            }
            run.push(row.get(0)?);
            expected = expected.checked_add(1).ok_or(Error::ZOverflow)?;
        }
        run
    };

    let mut bump = tx.prepare_cached("UPDATE widget SET z = z + 1 WHERE id = ?1")?;
    for id in run.iter().rev() {
        bump.execute([id])?;
    }
    if !run.is_empty() {
        debug!(z, shifted = run.len(), "shifted widgets up to free z");
    }
    Ok(run.len())
}

fn next_z(tx: &Transaction<'_>, first_z: i32) -> Result<i32> {
    let max: Option<i32> = tx.query_row("SELECT MAX(z) FROM widget", [], |row| row.get(0))?;
    match max {
        Some(max) => max.checked_add(1).ok_or(Error::ZOverflow),
        None => Ok(first_z),
    }
}

// Ids past `i64::MAX` cannot exist in the table.
fn row_id(id: WidgetId) -> Result<i64> {
    i64::try_from(id.get()).map_err(|_| Error::NotFound(id))
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
