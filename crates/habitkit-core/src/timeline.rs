//! Instance timeline backfill.
//!
//! Keeps every habit's instance sequence gap-free from its first period
//! through today's period, so read commands never observe a missing "today"
//! instance and no explicit "create occurrence" action exists. Re-running
//! when already up to date performs zero writes.

use chrono::NaiveDate;

use crate::error::Result;
use crate::habit::{Habit, HabitInstance};
use crate::storage::HabitDb;

/// Backfill missing instances for one habit up through today's period.
///
/// Returns the number of instances created.
pub fn backfill_habit(db: &HabitDb, habit: &Habit, today: NaiveDate) -> Result<usize> {
    let mut created = 0;

    let mut last = match db.find_latest_instance(&habit.id)? {
        Some(instance) => instance.period_start,
        None => {
            let first = habit.recurrence.first_period_start(today);
            if db.insert_instance(&HabitInstance::new(habit, first))? {
                created += 1;
            }
            first
        }
    };

    // Terminates: next_period_start strictly increases toward a fixed bound.
    while last < today {
        let next = habit.recurrence.next_period_start(last);
        if db.insert_instance(&HabitInstance::new(habit, next))? {
            created += 1;
        }
        last = next;
    }

    Ok(created)
}

/// Backfill every stored habit. Runs before any instance-reading command.
pub fn backfill_all(db: &HabitDb, today: NaiveDate) -> Result<usize> {
    let mut created = 0;
    for habit in db.list_habits(None)? {
        created += backfill_habit(db, &habit, today)?;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Recurrence;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_habit(db: &HabitDb, name: &str) -> Habit {
        let habit = Habit::new(name, None, Recurrence::Daily);
        db.insert_habit(&habit).unwrap();
        habit
    }

    #[test]
    fn backfill_creates_first_instance_for_fresh_habit() {
        let db = HabitDb::open_memory().unwrap();
        let habit = daily_habit(&db, "Read");
        let today = date(2025, 6, 4);

        assert_eq!(backfill_habit(&db, &habit, today).unwrap(), 1);
        let instances = db.list_instances(&habit.id, None).unwrap();
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].period_start, today);
    }

    #[test]
    fn backfill_fills_gap_up_to_today() {
        let db = HabitDb::open_memory().unwrap();
        let habit = daily_habit(&db, "Read");
        db.insert_instance(&HabitInstance::new(&habit, date(2025, 6, 1)))
            .unwrap();

        let today = date(2025, 6, 4);
        assert_eq!(backfill_habit(&db, &habit, today).unwrap(), 3);

        let starts: Vec<_> = db
            .list_instances(&habit.id, None)
            .unwrap()
            .iter()
            .map(|i| i.period_start)
            .collect();
        assert_eq!(
            starts,
            vec![
                date(2025, 6, 1),
                date(2025, 6, 2),
                date(2025, 6, 3),
                date(2025, 6, 4),
            ]
        );
    }

    #[test]
    fn backfill_is_idempotent() {
        let db = HabitDb::open_memory().unwrap();
        let habit = daily_habit(&db, "Read");
        let today = date(2025, 6, 4);

        backfill_habit(&db, &habit, today).unwrap();
        assert_eq!(backfill_habit(&db, &habit, today).unwrap(), 0);
    }

    #[test]
    fn weekly_backfill_covers_today_without_overshooting() {
        let db = HabitDb::open_memory().unwrap();
        let habit = Habit::new("Gym", None, Recurrence::Weekly { weekday: Some(0) });
        db.insert_habit(&habit).unwrap();
        // Last instance two Mondays ago; today is a Wednesday.
        db.insert_instance(&HabitInstance::new(&habit, date(2025, 5, 26)))
            .unwrap();
        let today = date(2025, 6, 4);

        backfill_habit(&db, &habit, today).unwrap();

        let latest = db.find_latest_instance(&habit.id).unwrap().unwrap();
        // The current period's Monday or the one right after today, never
        // a full period beyond it.
        assert!(latest.period_start >= today);
        assert!(latest.period_start < today + Duration::days(7));
        // Gap-free: every intermediate Monday exists.
        let starts: Vec<_> = db
            .list_instances(&habit.id, None)
            .unwrap()
            .iter()
            .map(|i| i.period_start)
            .collect();
        assert_eq!(
            starts,
            vec![date(2025, 5, 26), date(2025, 6, 2), date(2025, 6, 9)]
        );
    }

    #[test]
    fn backfill_leaves_future_first_period_alone() {
        let db = HabitDb::open_memory().unwrap();
        // Saturday-pinned habit created mid-week: the first instance is in
        // the future and backfill must not touch it.
        let habit = Habit::new("Shop", None, Recurrence::Weekly { weekday: Some(5) });
        db.insert_habit(&habit).unwrap();
        let today = date(2025, 6, 4);
        let first = habit.recurrence.first_period_start(today);
        db.insert_instance(&HabitInstance::new(&habit, first))
            .unwrap();

        assert_eq!(backfill_habit(&db, &habit, today).unwrap(), 0);
        assert_eq!(db.list_instances(&habit.id, None).unwrap().len(), 1);
    }

    #[test]
    fn backfill_all_covers_every_habit() {
        let db = HabitDb::open_memory().unwrap();
        daily_habit(&db, "Read");
        daily_habit(&db, "Meditate");
        let today = date(2025, 6, 4);

        assert_eq!(backfill_all(&db, today).unwrap(), 2);
        assert_eq!(backfill_all(&db, today).unwrap(), 0);
    }
}
