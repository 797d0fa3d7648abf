//! Completion state machine.
//!
//! An instance moves Pending -> Completed exactly once; Completed is
//! terminal and instances are never reopened. Completing a period also
//! materializes its successor, keeping the timeline one step ahead of
//! completion between backfill runs.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, Result};
use crate::habit::HabitInstance;
use crate::storage::HabitDb;

/// Mark the instance of `habit_name` starting on `on_date` as completed.
///
/// The caller is expected to have backfilled first; a missing instance is
/// an error rather than an implicit create. Returns the completed instance.
///
/// # Errors
/// `HabitNotFound` if no habit has that name, `InstanceNotFound` if no
/// instance starts on `on_date`, `AlreadyCompleted` on double completion.
pub fn complete(
    db: &HabitDb,
    habit_name: &str,
    on_date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<HabitInstance> {
    let habit = db
        .find_habit_by_name(habit_name)?
        .ok_or_else(|| CoreError::HabitNotFound(habit_name.to_string()))?;

    let mut instance = db.find_instance(&habit.id, on_date)?.ok_or_else(|| {
        CoreError::InstanceNotFound {
            habit: habit_name.to_string(),
            period_start: on_date,
        }
    })?;

    if instance.is_completed() {
        return Err(CoreError::AlreadyCompleted {
            habit: habit_name.to_string(),
            period_start: on_date,
        });
    }

    instance.mark_completed(now);
    db.update_instance(&instance)?;

    // Same insert-if-absent discipline as backfill: the successor may
    // already exist from an earlier backfill in this session.
    let next = habit.recurrence.next_period_start(on_date);
    db.insert_instance(&HabitInstance::new(&habit, next))?;

    Ok(instance)
}
