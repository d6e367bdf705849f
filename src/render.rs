use std::fmt::Write as _;

use crate::domain::stats::Breakdown;
use crate::domain::ticket::Ticket;
use crate::workflow::{FormView, ListView, StatsView};

const NO_DATA: &str = "  (no data)";

pub fn ticket_line(ticket: &Ticket) -> String {
    format!(
        "#{:<5} [{}] {} | {} | {} | {}\n       {}",
        ticket.id,
        ticket.status.label(),
        ticket.title,
        ticket.category.label(),
        ticket.priority.label(),
        ticket.created_at.format("%Y-%m-%d %H:%M"),
        ticket.excerpt(),
    )
}

pub fn ticket_list(view: &ListView) -> String {
    let mut out = String::new();
    let query = view.filters.to_query();
    if !query.is_unconstrained() {
        let active = query
            .params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Filters: {active}");
    }
    if let Some(alert) = &view.alert {
        let _ = writeln!(out, "! {alert}");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
    }
    if view.loading {
        let _ = writeln!(out, "Loading tickets...");
    }
    if view.tickets.is_empty() && !view.loading {
        let _ = writeln!(out, "No tickets found.");
    }
    for ticket in &view.tickets {
        let _ = writeln!(out, "{}", ticket_line(ticket));
    }
    out
}

pub fn stats(view: &StatsView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "! {error}");
        return out;
    }
    let Some(snapshot) = &view.snapshot else {
        let _ = writeln!(out, "Loading stats...");
        return out;
    };

    let _ = writeln!(out, "Total tickets: {}", snapshot.total_tickets);
    let _ = writeln!(out, "Open tickets:  {}", snapshot.open_tickets);
    let _ = writeln!(out, "Avg per day:   {:.2}", snapshot.avg_per_day);

    let _ = writeln!(out, "By priority:");
    match snapshot.priority_breakdown() {
        Breakdown::NoData => {
            let _ = writeln!(out, "{NO_DATA}");
        }
        Breakdown::Rows(rows) => {
            for row in rows {
                let _ = writeln!(out, "  {:<10} {}", row.priority.label(), row.count);
            }
        }
    }

    let _ = writeln!(out, "By category:");
    match snapshot.category_breakdown() {
        Breakdown::NoData => {
            let _ = writeln!(out, "{NO_DATA}");
        }
        Breakdown::Rows(rows) => {
            for row in rows {
                let _ = writeln!(out, "  {:<10} {}", row.category.label(), row.count);
            }
        }
    }
    out
}

pub fn form(view: &FormView) -> String {
    let mut out = String::new();
    let selector = |value: Option<&'static str>| value.unwrap_or("<none>");
    let lock_note = if view.classifying {
        " (classifying...)"
    } else if !view.selectors_enabled() {
        " (locked)"
    } else {
        ""
    };
    if !view.text_enabled() {
        let _ = writeln!(out, "Submitting ticket...");
    }

    let _ = writeln!(out, "Title:       {}", view.draft.title);
    let _ = writeln!(out, "Description: {}", view.draft.description);
    let _ = writeln!(
        out,
        "Category:    {}{lock_note}",
        selector(view.draft.category.map(|c| c.label())),
    );
    let _ = writeln!(
        out,
        "Priority:    {}{lock_note}",
        selector(view.draft.priority.map(|p| p.label())),
    );
    for (field, message) in view.errors.iter() {
        let _ = writeln!(out, "  {}: {message}", field.as_str());
    }
    if let Some(error) = &view.api_error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{notice}");
    }
    if view.text_enabled() && !view.submit_enabled() {
        let _ = writeln!(out, "Submit is disabled until classification finishes.");
    }
    out
}
