use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Category, Priority};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_tickets: u64,
    pub open_tickets: u64,
    pub avg_per_day: f64,
    pub by_priority: Vec<PriorityCount>,
    pub by_category: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: u64,
}

/// A breakdown section. Empty sections are `NoData`, never omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown<'a, T> {
    NoData,
    Rows(&'a [T]),
}

impl<'a, T> Breakdown<'a, T> {
    fn of(rows: &'a [T]) -> Self {
        if rows.is_empty() {
            Breakdown::NoData
        } else {
            Breakdown::Rows(rows)
        }
    }
}

impl StatsSnapshot {
    pub fn priority_breakdown(&self) -> Breakdown<'_, PriorityCount> {
        Breakdown::of(&self.by_priority)
    }

    pub fn category_breakdown(&self) -> Breakdown<'_, CategoryCount> {
        Breakdown::of(&self.by_category)
    }
}
