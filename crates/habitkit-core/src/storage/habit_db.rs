//! SQLite-backed storage for habits and their instances.
//!
//! [`HabitDb`] is an explicitly constructed storage context passed into
//! every core operation; nothing in the crate holds a process-global handle.
//! The `(habit_id, period_start)` unique index backs the insert-if-absent
//! discipline shared by backfill and completion, and habit names are unique
//! at the schema level so a duplicate is a rejected write, not an overwrite.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, migrations};
use crate::error::{CoreError, DatabaseError, Result};
use crate::habit::{Habit, HabitInstance, Recurrence, RecurrenceKind};

// === Helper Functions ===

/// Format a recurrence for the `recurrence`/`weekday` columns.
fn format_recurrence(recurrence: Recurrence) -> (&'static str, Option<u8>) {
    match recurrence {
        Recurrence::Daily => ("daily", None),
        Recurrence::Weekly { weekday } => ("weekly", weekday),
    }
}

/// Parse the `recurrence`/`weekday` columns back into a rule.
fn parse_recurrence(kind: &str, weekday: Option<u8>) -> Recurrence {
    match kind {
        "weekly" => Recurrence::Weekly { weekday },
        _ => Recurrence::Daily,
    }
}

/// Format a recurrence kind filter for queries.
fn format_kind(kind: RecurrenceKind) -> &'static str {
    match kind {
        RecurrenceKind::Daily => "daily",
        RecurrenceKind::Weekly => "weekly",
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a calendar-date column.
///
/// Rows written by other tools sometimes carry a time component in date
/// columns; those are normalized to their calendar date so equality lookups
/// by `period_start` keep working.
fn parse_date(text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|dt| dt.date_naive()))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_timestamp(text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Build a Habit from a `SELECT id, name, description, recurrence, weekday,
/// date_created` row.
fn row_to_habit(row: &rusqlite::Row) -> rusqlite::Result<Habit> {
    let kind: String = row.get(3)?;
    let weekday: Option<u8> = row.get(4)?;
    let created: String = row.get(5)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        recurrence: parse_recurrence(&kind, weekday),
        date_created: parse_timestamp(&created)?,
    })
}

/// Build a HabitInstance from a `SELECT id, habit_id, period_start,
/// due_date, completed_at` row.
fn row_to_instance(row: &rusqlite::Row) -> rusqlite::Result<HabitInstance> {
    let period_start: String = row.get(2)?;
    let due_date: String = row.get(3)?;
    let completed_at: Option<String> = row.get(4)?;
    Ok(HabitInstance {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        period_start: parse_date(&period_start)?,
        due_date: parse_date(&due_date)?,
        completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
    })
}

/// SQLite database for habit and instance storage.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/habitkit.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("habitkit.db");
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // === Habits ===

    /// Insert a new habit.
    ///
    /// # Errors
    /// Returns `DuplicateName` when a habit with the same name exists.
    pub fn insert_habit(&self, habit: &Habit) -> Result<()> {
        let (kind, weekday) = format_recurrence(habit.recurrence);
        let result = self.conn.execute(
            "INSERT INTO habits (id, name, description, recurrence, weekday, date_created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id,
                habit.name,
                habit.description,
                kind,
                weekday,
                habit.date_created.to_rfc3339(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(CoreError::DuplicateName(habit.name.clone())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_habit_by_name(&self, name: &str) -> Result<Option<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, recurrence, weekday, date_created
             FROM habits WHERE name = ?1",
        )?;
        Ok(stmt.query_row(params![name], row_to_habit).optional()?)
    }

    /// List habits, optionally filtered by recurrence kind, in creation
    /// order.
    pub fn list_habits(&self, kind: Option<RecurrenceKind>) -> Result<Vec<Habit>> {
        let (sql, filter) = match kind {
            None => (
                "SELECT id, name, description, recurrence, weekday, date_created
                 FROM habits ORDER BY date_created, name",
                None,
            ),
            Some(k) => (
                "SELECT id, name, description, recurrence, weekday, date_created
                 FROM habits WHERE recurrence = ?1 ORDER BY date_created, name",
                Some(format_kind(k)),
            ),
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match filter {
            None => stmt.query_map([], row_to_habit)?,
            Some(f) => stmt.query_map(params![f], row_to_habit)?,
        };
        let mut habits = Vec::new();
        for habit in rows {
            habits.push(habit?);
        }
        Ok(habits)
    }

    /// Delete a habit and all of its instances in a single transaction.
    ///
    /// Returns whether the habit existed.
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<bool> {
        let tx = self.conn.transaction().map_err(DatabaseError::from)?;
        tx.execute(
            "DELETE FROM habit_instances WHERE habit_id = ?1",
            params![habit_id],
        )?;
        let deleted = tx.execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;
        tx.commit().map_err(DatabaseError::from)?;
        Ok(deleted > 0)
    }

    /// Delete all habits and instances (used by seeding).
    pub fn clear_all(&self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM habit_instances; DELETE FROM habits;")
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    // === Instances ===

    /// The instance with the maximum `period_start` for a habit.
    pub fn find_latest_instance(&self, habit_id: &str) -> Result<Option<HabitInstance>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, period_start, due_date, completed_at
             FROM habit_instances WHERE habit_id = ?1
             ORDER BY period_start DESC LIMIT 1",
        )?;
        Ok(stmt
            .query_row(params![habit_id], row_to_instance)
            .optional()?)
    }

    pub fn find_instance(
        &self,
        habit_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<HabitInstance>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, period_start, due_date, completed_at
             FROM habit_instances WHERE habit_id = ?1 AND period_start = ?2",
        )?;
        Ok(stmt
            .query_row(params![habit_id, format_date(period_start)], row_to_instance)
            .optional()?)
    }

    /// Insert an instance if none exists for its `(habit_id, period_start)`.
    ///
    /// The duplicate check and the insert are one statement, so backfill and
    /// completion can interleave within a session without duplicating a
    /// period. Returns whether a row was written.
    pub fn insert_instance(&self, instance: &HabitInstance) -> Result<bool> {
        let changed = self.conn.execute(
            "INSERT INTO habit_instances (id, habit_id, period_start, due_date, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(habit_id, period_start) DO NOTHING",
            params![
                instance.id,
                instance.habit_id,
                format_date(instance.period_start),
                format_date(instance.due_date),
                instance.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Persist an instance's completion state.
    pub fn update_instance(&self, instance: &HabitInstance) -> Result<()> {
        self.conn.execute(
            "UPDATE habit_instances SET completed_at = ?2 WHERE id = ?1",
            params![instance.id, instance.completed_at.map(|t| t.to_rfc3339())],
        )?;
        Ok(())
    }

    /// Instances of a habit ordered by `period_start`, optionally bounded
    /// from above (inclusive).
    pub fn list_instances(
        &self,
        habit_id: &str,
        upper_bound: Option<NaiveDate>,
    ) -> Result<Vec<HabitInstance>> {
        let mut instances = Vec::new();
        match upper_bound {
            Some(bound) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, habit_id, period_start, due_date, completed_at
                     FROM habit_instances
                     WHERE habit_id = ?1 AND period_start <= ?2
                     ORDER BY period_start",
                )?;
                let rows = stmt.query_map(params![habit_id, format_date(bound)], row_to_instance)?;
                for instance in rows {
                    instances.push(instance?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, habit_id, period_start, due_date, completed_at
                     FROM habit_instances
                     WHERE habit_id = ?1
                     ORDER BY period_start",
                )?;
                let rows = stmt.query_map(params![habit_id], row_to_instance)?;
                for instance in rows {
                    instances.push(instance?);
                }
            }
        }
        Ok(instances)
    }
}
