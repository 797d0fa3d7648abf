//! Habit and instance data model.
//!
//! A habit is a named recurring commitment whose recurrence rule is fixed at
//! creation. Each occurrence window of the rule ("period") is tracked by a
//! [`HabitInstance`], keyed by the calendar date the period starts on.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recurrence rule for a habit, fixed for the habit's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recurrence {
    /// One period per calendar day.
    Daily,
    /// One period per week. `weekday` pins the period to a day of the week
    /// (0 = Monday .. 6 = Sunday). Unpinned weekly habits schedule on
    /// Mondays but are due at the end of the week.
    Weekly { weekday: Option<u8> },
}

/// Filter projection of [`Recurrence`] used when listing habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    Daily,
    Weekly,
}

impl Recurrence {
    pub fn kind(&self) -> RecurrenceKind {
        match self {
            Recurrence::Daily => RecurrenceKind::Daily,
            Recurrence::Weekly { .. } => RecurrenceKind::Weekly,
        }
    }
}

/// A named recurring commitment.
///
/// Immutable after creation except for deletion, which cascades to all of
/// the habit's instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub recurrence: Recurrence,
    pub date_created: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with a fresh id and creation timestamp.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description,
            recurrence,
            date_created: Utc::now(),
        }
    }
}

/// The trackable record for one period of one habit.
///
/// `(habit_id, period_start)` is unique; per habit the period starts form a
/// strictly increasing, gap-free sequence under the recurrence step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitInstance {
    pub id: String,
    pub habit_id: String,
    pub period_start: NaiveDate,
    pub due_date: NaiveDate,
    /// `Some` means Completed, `None` means Pending.
    pub completed_at: Option<DateTime<Utc>>,
}

impl HabitInstance {
    /// Create a pending instance for the period of `habit` starting at
    /// `period_start`.
    pub fn new(habit: &Habit, period_start: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            habit_id: habit.id.clone(),
            period_start,
            due_date: habit.recurrence.due_date(period_start),
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Transition Pending -> Completed. Completed is terminal; instances are
    /// never reopened.
    pub fn mark_completed(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at);
    }
}
