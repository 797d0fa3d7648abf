//! Demo data seeding.
//!
//! Wipes habit data and loads sample habits whose instance histories carry
//! designed completion patterns (an active streak, a broken streak, an
//! alternating one). The last period of each pattern is the current one and
//! stays open.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::Result;
use crate::habit::{Habit, HabitInstance, Recurrence};
use crate::storage::HabitDb;

/// Start of the period containing `today` under `recurrence`.
fn current_period_start(recurrence: Recurrence, today: NaiveDate) -> NaiveDate {
    match recurrence {
        Recurrence::Daily => today,
        Recurrence::Weekly { weekday } => {
            let target = i64::from(weekday.unwrap_or(0));
            let current = i64::from(today.weekday().num_days_from_monday());
            today - Duration::days((current - target).rem_euclid(7))
        }
    }
}

/// Reset the database and load the sample habits.
///
/// Returns the created habits.
pub fn seed(db: &HabitDb, today: NaiveDate) -> Result<Vec<Habit>> {
    db.clear_all()?;

    let samples: [(&str, &str, Recurrence, [bool; 4]); 5] = [
        (
            "Brush Teeth",
            "Morning and night",
            Recurrence::Daily,
            [true, true, true, false],
        ),
        (
            "Meditate",
            "10 minutes daily",
            Recurrence::Daily,
            [true, true, false, false],
        ),
        (
            "Water Plants",
            "Every Monday",
            Recurrence::Weekly { weekday: Some(0) },
            [true, true, true, false],
        ),
        (
            "Grocery Shopping",
            "Weekend shopping",
            Recurrence::Weekly { weekday: Some(5) },
            [true, false, true, false],
        ),
        (
            "Review Goals",
            "Every Sunday",
            Recurrence::Weekly { weekday: Some(6) },
            [true, false, true, false],
        ),
    ];

    let mut habits = Vec::with_capacity(samples.len());
    for (name, description, recurrence, pattern) in samples {
        let habit = Habit::new(name, Some(description.to_string()), recurrence);
        db.insert_habit(&habit)?;

        // Three periods of history plus the open current period.
        let mut period = current_period_start(recurrence, today)
            - Duration::days(3 * recurrence.step_days());
        for completed in pattern {
            let mut instance = HabitInstance::new(&habit, period);
            if completed {
                let done_at = period.and_hms_opt(12, 0, 0).unwrap().and_utc();
                instance.mark_completed(done_at);
            }
            db.insert_instance(&instance)?;
            period = recurrence.next_period_start(period);
        }

        habits.push(habit);
    }

    Ok(habits)
}
