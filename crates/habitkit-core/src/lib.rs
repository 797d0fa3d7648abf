//! # habitkit Core Library
//!
//! Core business logic for the habitkit habit tracker. The CLI binary is a
//! thin layer over this crate; all recurrence and streak semantics live
//! here.
//!
//! ## Key Components
//!
//! - [`Recurrence`]: period-boundary rules (daily, or weekly with an
//!   optional pinned weekday), fixed per habit at creation
//! - [`timeline`]: backfill that keeps each habit's instance sequence
//!   gap-free from its first period through today's
//! - [`completion`]: the Pending -> Completed transition, which also
//!   materializes the successor period
//! - [`streak`]: current and historical-longest streak analytics
//! - [`HabitDb`]: SQLite persistence behind an explicitly passed storage
//!   context
//! - [`Config`]: TOML-based application configuration

pub mod completion;
pub mod error;
pub mod habit;
pub mod recurrence;
pub mod seed;
pub mod storage;
pub mod streak;
pub mod timeline;

pub use error::{ConfigError, CoreError, DatabaseError, Result};
pub use habit::{Habit, HabitInstance, Recurrence, RecurrenceKind};
pub use storage::{Config, HabitDb};
pub use streak::StreakSummary;
