//! Streak reporting commands.

use chrono::Local;
use clap::Subcommand;

use habitkit_core::storage::HabitDb;
use habitkit_core::streak::{self, StreakSummary};
use habitkit_core::timeline;

#[derive(Subcommand)]
pub enum StreakAction {
    /// Show streaks, for one habit or across all of them
    Show {
        /// Only this habit
        #[arg(long, short)]
        name: Option<String>,
        /// Report the current streak instead of the longest
        #[arg(long)]
        current: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StreakAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;
    let today = Local::now().date_naive();
    timeline::backfill_all(&db, today)?;

    let StreakAction::Show {
        name,
        current,
        json,
    } = action;

    match name {
        Some(name) => {
            let habit = db
                .find_habit_by_name(&name)?
                .ok_or_else(|| format!("Habit '{name}' not found"))?;
            let streak = if current {
                streak::current_streak(&db, &habit, today)?
            } else {
                streak::longest_streak(&db, &habit, today)?
            };
            if json {
                println!("{}", serde_json::json!({ "habit": name, "streak": streak }));
            } else {
                let which = if current { "Current" } else { "Longest" };
                println!("{which} streak for '{name}': {streak}");
            }
        }
        None => {
            let summary = if current {
                let mut per_habit = std::collections::BTreeMap::new();
                let mut overall = 0;
                for habit in db.list_habits(None)? {
                    let streak = streak::current_streak(&db, &habit, today)?;
                    overall = overall.max(streak);
                    per_habit.insert(habit.name.clone(), streak);
                }
                StreakSummary { per_habit, overall }
            } else {
                streak::longest_streak_all(&db, today)?
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let which = if current { "current" } else { "best" };
                println!("Overall {which} streak: {}", summary.overall);
                for (habit, streak) in &summary.per_habit {
                    println!("  {habit}: {streak}");
                }
            }
        }
    }
    Ok(())
}
