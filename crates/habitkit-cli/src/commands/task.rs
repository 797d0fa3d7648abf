//! Commands over the open habit instances.

use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;
use serde::Serialize;

use habitkit_core::storage::{Config, HabitDb};
use habitkit_core::{completion, timeline};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List open (pending) instances across habits
    List {
        /// Only instances of this habit
        #[arg(long, short)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a habit's instance as completed
    Complete {
        /// Habit name
        name: String,
        /// Period start date to complete (YYYY-MM-DD, default today)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },
}

#[derive(Serialize)]
struct OpenTask {
    habit: String,
    period_start: NaiveDate,
    due_date: NaiveDate,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = HabitDb::open()?;
    let today = Local::now().date_naive();
    timeline::backfill_all(&db, today)?;

    match action {
        TaskAction::List { name, json } => {
            let habits = match name {
                Some(n) => {
                    let habit = db
                        .find_habit_by_name(&n)?
                        .ok_or_else(|| format!("Habit '{n}' not found"))?;
                    vec![habit]
                }
                None => db.list_habits(None)?,
            };

            let mut open = Vec::new();
            for habit in &habits {
                for instance in db.list_instances(&habit.id, None)? {
                    if !instance.is_completed() {
                        open.push(OpenTask {
                            habit: habit.name.clone(),
                            period_start: instance.period_start,
                            due_date: instance.due_date,
                        });
                    }
                }
            }
            open.sort_by_key(|task| task.period_start);

            if json {
                println!("{}", serde_json::to_string_pretty(&open)?);
            } else if open.is_empty() {
                println!("No open habit instances.");
            } else {
                let config = Config::load_or_default();
                for task in &open {
                    println!(
                        "{}  starts {}  due {}",
                        task.habit,
                        task.period_start.format(&config.ui.date_format),
                        task.due_date.format(&config.ui.date_format)
                    );
                }
            }
        }
        TaskAction::Complete { name, date } => {
            let on_date = date.unwrap_or(today);
            let instance = completion::complete(&db, &name, on_date, Utc::now())?;
            println!("'{}' completed for {}.", name, instance.period_start);
        }
    }
    Ok(())
}
