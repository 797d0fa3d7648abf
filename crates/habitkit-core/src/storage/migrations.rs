//! Database schema migrations for habitkit.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations to bring the database to the current schema
/// version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

/// Create the schema_version table if it doesn't exist.
fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// v1: habits and habit_instances, with the uniqueness constraints the
/// timeline and duplicate-name checks rely on.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS habits (
            id           TEXT PRIMARY KEY,
            name         TEXT NOT NULL,
            description  TEXT,
            recurrence   TEXT NOT NULL,
            weekday      INTEGER,
            date_created TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_habits_name ON habits(name);

        CREATE TABLE IF NOT EXISTS habit_instances (
            id           TEXT PRIMARY KEY,
            habit_id     TEXT NOT NULL REFERENCES habits(id),
            period_start TEXT NOT NULL,
            due_date     TEXT NOT NULL,
            completed_at TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_instances_habit_period
            ON habit_instances(habit_id, period_start);",
    )?;
    set_schema_version(conn, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_sets_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 1);
        // Tables exist and are usable after a re-run.
        conn.execute(
            "INSERT INTO habits (id, name, recurrence, date_created)
             VALUES ('h1', 'Read', 'daily', '2025-01-01T00:00:00+00:00')",
            [],
        )
        .unwrap();
    }
}
