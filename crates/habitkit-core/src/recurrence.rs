//! Period-boundary computation for recurrence rules.
//!
//! "First" and "next" are deliberately distinct: the first period of a habit
//! may start on the reference date itself (distance 0), while advancing from
//! an existing period always moves forward by at least one day. Collapsing
//! the two would let the timeline produce a duplicate period start.

use chrono::{Datelike, Duration, NaiveDate};

use crate::habit::Recurrence;

impl Recurrence {
    /// Start of the first period on or after `after`.
    ///
    /// Daily rules start immediately. Weekly rules align forward to the
    /// pinned weekday (Monday when unpinned), 0..=6 days ahead.
    pub fn first_period_start(&self, after: NaiveDate) -> NaiveDate {
        match self {
            Recurrence::Daily => after,
            Recurrence::Weekly { weekday } => {
                let target = i64::from(weekday.unwrap_or(0));
                let current = i64::from(after.weekday().num_days_from_monday());
                after + Duration::days((target - current).rem_euclid(7))
            }
        }
    }

    /// Start of the period strictly after the one starting at `current`.
    ///
    /// Always advances by at least one day; a weekly rule on its own weekday
    /// advances by exactly seven.
    pub fn next_period_start(&self, current: NaiveDate) -> NaiveDate {
        match self {
            Recurrence::Daily => current + Duration::days(1),
            Recurrence::Weekly { .. } => self.first_period_start(current + Duration::days(1)),
        }
    }

    /// Last date on which completing the period starting at `period_start`
    /// counts as on time.
    pub fn due_date(&self, period_start: NaiveDate) -> NaiveDate {
        match self {
            Recurrence::Daily => period_start,
            // A pinned weekly period is a single-day event.
            Recurrence::Weekly { weekday: Some(_) } => period_start,
            // An unpinned weekly period spans the ISO week it starts in.
            Recurrence::Weekly { weekday: None } => {
                let to_sunday = 6 - i64::from(period_start.weekday().num_days_from_monday());
                period_start + Duration::days(to_sunday)
            }
        }
    }

    /// Length of one period in days.
    pub fn step_days(&self) -> i64 {
        match self {
            Recurrence::Daily => 1,
            Recurrence::Weekly { .. } => 7,
        }
    }
}
