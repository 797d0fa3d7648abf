//! Streak analytics over a habit's instance timeline.
//!
//! The crux of the domain: the current period is always open before it is
//! due, so a pending, not-yet-due instance must never count as a broken
//! streak. Only a missed period (pending and past due) breaks one.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::habit::Habit;
use crate::storage::HabitDb;

/// Per-habit and overall streak report.
#[derive(Debug, Clone, Serialize)]
pub struct StreakSummary {
    pub per_habit: BTreeMap<String, u32>,
    pub overall: u32,
}

/// Length of the unbroken run of on-time completions ending at today's
/// period.
pub fn current_streak(db: &HabitDb, habit: &Habit, today: NaiveDate) -> Result<u32> {
    let mut instances = db.list_instances(&habit.id, Some(today))?;
    instances.reverse();

    let mut walk = instances.as_slice();
    if let Some(latest) = walk.first() {
        // The open current period neither counts nor breaks; the walk
        // starts at its predecessor.
        if !latest.is_completed() && latest.due_date >= today {
            walk = &walk[1..];
        }
    }

    let Some(head) = walk.first() else {
        return Ok(0);
    };

    let mut expected = head.period_start;
    let mut streak = 0;
    for instance in walk {
        if !instance.is_completed() || instance.period_start != expected {
            break;
        }
        streak += 1;
        expected = expected - Duration::days(habit.recurrence.step_days());
    }
    Ok(streak)
}

/// Longest historical run of consecutive on-time completions.
///
/// Unlike [`current_streak`] this scans the whole timeline: a broken streak
/// in the past still counts toward the maximum. The open current period
/// contributes nothing and breaks nothing.
pub fn longest_streak(db: &HabitDb, habit: &Habit, today: NaiveDate) -> Result<u32> {
    let instances = db.list_instances(&habit.id, Some(today))?;

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for instance in &instances {
        if instance.is_completed() {
            run = match prev {
                Some(p) if habit.recurrence.next_period_start(p) == instance.period_start => {
                    run + 1
                }
                _ => 1,
            };
            best = best.max(run);
        } else {
            run = 0;
        }
        prev = Some(instance.period_start);
    }
    Ok(best)
}

/// Streak summary across all habits: longest streak per habit and the
/// overall maximum (0 when no habits exist).
pub fn longest_streak_all(db: &HabitDb, today: NaiveDate) -> Result<StreakSummary> {
    let mut per_habit = BTreeMap::new();
    let mut overall = 0;
    for habit in db.list_habits(None)? {
        let streak = longest_streak(db, &habit, today)?;
        overall = overall.max(streak);
        per_habit.insert(habit.name.clone(), streak);
    }
    Ok(StreakSummary { per_habit, overall })
}
