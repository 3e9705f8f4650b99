//! Read-only projection of a plan onto concrete calendar dates.

use serde::Serialize;

use crate::date::day_to_date;
use crate::plan::{DayTask, GeneratedPlan};

/// Number of tasks surfaced per day in previews and pushed events.
pub const TASKS_PER_DAY: usize = 3;

/// One plan day pinned to a calendar date.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewDay {
    /// Concrete `YYYY-MM-DD` date for this day.
    pub date: String,
    /// 1-based day number.
    pub day: u32,
    /// At most [`TASKS_PER_DAY`] tasks.
    pub tasks: Vec<DayTask>,
}

/// Project each day of `plan` onto dates counting from `start_date`.
/// Day 1 of the plan lands on the start date itself. Never mutates the
/// source plan.
pub fn project(plan: &GeneratedPlan, start_date: &str) -> Vec<PreviewDay> {
    plan.days
        .iter()
        .enumerate()
        .map(|(idx, d)| PreviewDay {
            date: day_to_date(start_date, idx as u64),
            day: d.day.unwrap_or(idx as u32 + 1),
            tasks: d.tasks.iter().take(TASKS_PER_DAY).cloned().collect(),
        })
        .collect()
}

/// Single-day viewport over a projected preview.
///
/// Navigation saturates at both ends; `reset` returns to the first day
/// whenever the underlying preview changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCursor {
    index: usize,
    len: usize,
}

impl DayCursor {
    pub fn new(len: usize) -> Self {
        DayCursor { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next day. No-op on the last day.
    pub fn next(&mut self) -> bool {
        if self.len > 0 && self.index + 1 < self.len {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous day. No-op on the first day.
    pub fn prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Back to the first day, adopting a new preview length.
    pub fn reset(&mut self, len: usize) {
        self.index = 0;
        self.len = len;
    }
}
