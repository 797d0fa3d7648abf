//! Cross-module scenarios: habit creation, backfill, completion, and the
//! streaks they produce, driven day by day with explicit dates.

use chrono::{Duration, NaiveDate, Utc};

use habitkit_core::habit::{Habit, HabitInstance, Recurrence};
use habitkit_core::storage::HabitDb;
use habitkit_core::{completion, streak, timeline};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Create a habit and its first instance, the way `habit add` does.
fn add_habit(db: &HabitDb, name: &str, recurrence: Recurrence, start: NaiveDate) -> Habit {
    let habit = Habit::new(name, None, recurrence);
    db.insert_habit(&habit).unwrap();
    let first = recurrence.first_period_start(start);
    db.insert_instance(&HabitInstance::new(&habit, first))
        .unwrap();
    habit
}

#[test]
fn three_daily_completions_in_a_row_make_a_streak_of_three() {
    let db = HabitDb::open_memory().unwrap();
    let created = date(2025, 6, 2);
    let habit = add_habit(&db, "Read", Recurrence::Daily, created);

    // Complete on three consecutive days, backfilling before each session
    // as the CLI does.
    for offset in 0..3 {
        let today = created + Duration::days(offset);
        timeline::backfill_all(&db, today).unwrap();
        completion::complete(&db, "Read", today, Utc::now()).unwrap();
    }

    let today = date(2025, 6, 4);
    assert_eq!(streak::current_streak(&db, &habit, today).unwrap(), 3);
    assert_eq!(streak::longest_streak(&db, &habit, today).unwrap(), 3);
}

#[test]
fn backfill_after_creation_leaves_the_first_instance_untouched() {
    let db = HabitDb::open_memory().unwrap();
    let today = date(2025, 6, 4);
    let habit = add_habit(&db, "Gym", Recurrence::Weekly { weekday: Some(5) }, today);

    let before = db.find_latest_instance(&habit.id).unwrap().unwrap();
    timeline::backfill_all(&db, today).unwrap();
    let after = db.find_latest_instance(&habit.id).unwrap().unwrap();

    assert_eq!(before.id, after.id);
    assert_eq!(before.period_start, after.period_start);
    assert_eq!(before.due_date, after.due_date);
}

#[test]
fn backfill_produces_no_duplicate_periods() {
    let db = HabitDb::open_memory().unwrap();
    let created = date(2025, 5, 26);
    let habit = add_habit(&db, "Read", Recurrence::Daily, created);

    let today = date(2025, 6, 4);
    timeline::backfill_all(&db, today).unwrap();
    timeline::backfill_all(&db, today).unwrap();

    let instances = db.list_instances(&habit.id, None).unwrap();
    let mut starts: Vec<_> = instances.iter().map(|i| i.period_start).collect();
    let len_before = starts.len();
    starts.dedup();
    assert_eq!(starts.len(), len_before);

    // Gap-free daily coverage from creation through today.
    assert_eq!(starts.first().copied(), Some(created));
    assert_eq!(starts.last().copied(), Some(today));
    assert_eq!(starts.len() as i64, (today - created).num_days() + 1);
}

#[test]
fn a_skipped_day_resets_the_current_streak_but_not_the_longest() {
    let db = HabitDb::open_memory().unwrap();
    let created = date(2025, 6, 1);
    let habit = add_habit(&db, "Read", Recurrence::Daily, created);

    // Complete June 1 and 2, skip June 3, complete June 4.
    for day in [date(2025, 6, 1), date(2025, 6, 2)] {
        timeline::backfill_all(&db, day).unwrap();
        completion::complete(&db, "Read", day, Utc::now()).unwrap();
    }
    let today = date(2025, 6, 4);
    timeline::backfill_all(&db, today).unwrap();
    completion::complete(&db, "Read", today, Utc::now()).unwrap();

    assert_eq!(streak::current_streak(&db, &habit, today).unwrap(), 1);
    assert_eq!(streak::longest_streak(&db, &habit, today).unwrap(), 2);
}

#[test]
fn completion_and_backfill_share_the_same_period_keyspace() {
    let db = HabitDb::open_memory().unwrap();
    let today = date(2025, 6, 4);
    let habit = add_habit(&db, "Read", Recurrence::Daily, today);

    // Complete first (creates tomorrow's instance), then backfill for
    // tomorrow: no duplicate may appear.
    completion::complete(&db, "Read", today, Utc::now()).unwrap();
    let tomorrow = date(2025, 6, 5);
    assert_eq!(timeline::backfill_all(&db, tomorrow).unwrap(), 0);
    assert_eq!(db.list_instances(&habit.id, None).unwrap().len(), 2);
}

#[test]
fn weekly_habit_streak_over_several_weeks() {
    let db = HabitDb::open_memory().unwrap();
    // Monday-pinned habit created on a Wednesday: first period is the
    // following Monday.
    let created = date(2025, 5, 7);
    let habit = add_habit(&db, "Plan", Recurrence::Weekly { weekday: Some(0) }, created);

    let first = db.find_latest_instance(&habit.id).unwrap().unwrap();
    assert_eq!(first.period_start, date(2025, 5, 12));

    // Complete three Mondays running.
    for monday in [date(2025, 5, 12), date(2025, 5, 19), date(2025, 5, 26)] {
        timeline::backfill_all(&db, monday).unwrap();
        completion::complete(&db, "Plan", monday, Utc::now()).unwrap();
    }

    // Wednesday after the third Monday: this week's Monday (June 2) was
    // backfilled and is still pending, so it is past due and the current
    // streak is gone, while the longest remembers the run.
    let today = date(2025, 6, 4);
    timeline::backfill_all(&db, today).unwrap();
    assert_eq!(streak::longest_streak(&db, &habit, today).unwrap(), 3);

    // On the Monday itself the open period does not break the streak.
    let monday = date(2025, 6, 2);
    assert_eq!(streak::current_streak(&db, &habit, monday).unwrap(), 3);
}
