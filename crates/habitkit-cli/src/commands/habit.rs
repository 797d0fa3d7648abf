//! Habit management commands.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use habitkit_core::habit::{Habit, HabitInstance, Recurrence, RecurrenceKind};
use habitkit_core::storage::{Config, HabitDb};
use habitkit_core::{seed, timeline};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new habit and its first instance
    Add {
        /// Habit name (must be unique)
        name: String,
        /// Optional description
        #[arg(long, short)]
        description: Option<String>,
        /// Periodicity: daily or weekly (default from config)
        #[arg(long, short)]
        period: Option<String>,
        /// For weekly habits, the day of the week (0 = Monday .. 6 = Sunday)
        #[arg(long, short, value_parser = clap::value_parser!(u8).range(0..=6))]
        weekday: Option<u8>,
        /// Earliest date the first period may start (YYYY-MM-DD, default today)
        #[arg(long, short)]
        start_date: Option<NaiveDate>,
    },
    /// List habits
    List {
        /// Filter by kind: all, daily or weekly
        #[arg(long, default_value = "all")]
        kind: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a habit and all of its instances
    Delete {
        /// Habit name
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Replace all data with sample habits and demo streak patterns
    Seed,
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = HabitDb::open()?;
    let today = Local::now().date_naive();

    match action {
        HabitAction::Add {
            name,
            description,
            period,
            weekday,
            start_date,
        } => {
            let config = Config::load_or_default();
            let period = period.unwrap_or(config.tracker.default_period);
            let recurrence = match period.as_str() {
                "daily" => {
                    if weekday.is_some() {
                        return Err("--weekday only applies to weekly habits".into());
                    }
                    Recurrence::Daily
                }
                "weekly" => Recurrence::Weekly { weekday },
                other => {
                    return Err(
                        format!("unknown period '{other}' (expected daily or weekly)").into(),
                    )
                }
            };

            let habit = Habit::new(name, description, recurrence);
            db.insert_habit(&habit)?;

            let first = recurrence.first_period_start(start_date.unwrap_or(today));
            db.insert_instance(&HabitInstance::new(&habit, first))?;
            println!(
                "Habit '{}' added; first period starts {first}.",
                habit.name
            );
        }
        HabitAction::List { kind, json } => {
            timeline::backfill_all(&db, today)?;
            let filter = match kind.as_str() {
                "daily" => Some(RecurrenceKind::Daily),
                "weekly" => Some(RecurrenceKind::Weekly),
                _ => None,
            };
            let habits = db.list_habits(filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("No habits found.");
            } else {
                for habit in &habits {
                    let kind = match habit.recurrence {
                        Recurrence::Daily => "daily".to_string(),
                        Recurrence::Weekly { weekday: Some(w) } => format!("weekly (weekday {w})"),
                        Recurrence::Weekly { weekday: None } => "weekly".to_string(),
                    };
                    println!(
                        "{}  [{}]  created {}",
                        habit.name,
                        kind,
                        habit.date_created.format("%Y-%m-%d")
                    );
                }
            }
        }
        HabitAction::Delete { name, yes } => {
            let habit = db
                .find_habit_by_name(&name)?
                .ok_or_else(|| format!("Habit '{name}' not found"))?;

            let config = Config::load_or_default();
            if !yes && config.tracker.confirm_delete {
                let prompt = format!("Delete habit '{name}' and all of its instances?");
                if !confirm(&prompt)? {
                    println!("Deletion cancelled.");
                    return Ok(());
                }
            }

            db.delete_habit(&habit.id)?;
            println!("Deleted habit '{name}'.");
        }
        HabitAction::Seed => {
            let habits = seed::seed(&db, today)?;
            println!("Seeded {} sample habits.", habits.len());
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> std::io::Result<bool> {
    use std::io::Write;
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
