pub mod config;
pub mod session;
pub mod stats;
pub mod ticket;

use clap::Args;

use crate::domain::filter::FilterState;
use crate::domain::ticket::{Category, Priority, Status};

/// Rendered result of a one-shot command and whether it succeeded.
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only tickets in this category (billing, technical, account, general).
    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,
    /// Only tickets with this priority (low, medium, high, critical).
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    /// Only tickets with this status (open, in_progress, resolved, closed).
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,
    /// Free-text search over title and description.
    #[arg(long, default_value = "")]
    pub search: String,
}

impl FilterArgs {
    pub fn into_filters(self) -> FilterState {
        FilterState {
            category: self.category,
            priority: self.priority,
            status: self.status,
            search: self.search,
        }
    }
}

fn one_of(values: impl IntoIterator<Item = &'static str>) -> String {
    values.into_iter().collect::<Vec<_>>().join(", ")
}

pub fn parse_category(value: &str) -> Result<Category, String> {
    Category::from_str(value).ok_or_else(|| {
        let expected = one_of(Category::ALL.iter().map(Category::as_str));
        format!("unknown category '{value}' (expected one of: {expected})")
    })
}

pub fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::from_str(value).ok_or_else(|| {
        let expected = one_of(Priority::ALL.iter().map(Priority::as_str));
        format!("unknown priority '{value}' (expected one of: {expected})")
    })
}

pub fn parse_status(value: &str) -> Result<Status, String> {
    Status::from_str(value).ok_or_else(|| {
        let expected = one_of(Status::ALL.iter().map(Status::as_str));
        format!("unknown status '{value}' (expected one of: {expected})")
    })
}
