//! In-memory collaborators for controller tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::time::{Instant, sleep};

use crate::domain::classification::ClassificationSuggestion;
use crate::domain::filter::TicketQuery;
use crate::domain::stats::{CategoryCount, PriorityCount, StatsSnapshot};
use crate::domain::ticket::{Category, NewTicket, Priority, Status, Ticket};
use crate::error::{AppError, AppResult};
use crate::services::{ClassificationService, TicketService};

#[derive(Debug, Clone)]
pub enum Failure {
    Network,
    Server(u16, &'static str),
}

impl Failure {
    fn to_error(&self) -> AppError {
        match self {
            Failure::Network => AppError::Network("connection refused".to_string()),
            Failure::Server(status, body) => AppError::Server {
                status: *status,
                body: body.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListCall {
    pub query: TicketQuery,
    pub at: Duration,
}

pub fn ticket(id: u64, title: &str, category: Category, priority: Priority, status: Status) -> Ticket {
    Ticket {
        id,
        title: title.to_string(),
        description: format!("{title} (details)"),
        category,
        priority,
        status,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
    }
}

/// Ticket backend that filters an in-memory collection the way the server
/// does and records every call with its offset from construction.
pub struct FakeTicketService {
    started: Instant,
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    tickets: Vec<Ticket>,
    list_calls: Vec<ListCall>,
    list_delays: VecDeque<Duration>,
    list_failure: Option<Failure>,
    created: Vec<NewTicket>,
    create_delay: Duration,
    create_failure: Option<Failure>,
    patches: Vec<(u64, Status)>,
    patch_failure: Option<Failure>,
    stats_calls: usize,
    stats_failure: Option<Failure>,
}

impl FakeTicketService {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            started: Instant::now(),
            state: Mutex::new(FakeState {
                tickets,
                ..FakeState::default()
            }),
        }
    }

    /// Delays applied to successive list calls, in order.
    pub fn delay_lists(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().unwrap().list_delays.extend(delays);
    }

    pub fn delay_creates(&self, delay: Duration) {
        self.state.lock().unwrap().create_delay = delay;
    }

    pub fn fail_lists(&self, failure: Option<Failure>) {
        self.state.lock().unwrap().list_failure = failure;
    }

    pub fn fail_creates(&self, failure: Option<Failure>) {
        self.state.lock().unwrap().create_failure = failure;
    }

    pub fn fail_patches(&self, failure: Option<Failure>) {
        self.state.lock().unwrap().patch_failure = failure;
    }

    pub fn fail_stats(&self, failure: Option<Failure>) {
        self.state.lock().unwrap().stats_failure = failure;
    }

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.state.lock().unwrap().list_calls.clone()
    }

    pub fn created(&self) -> Vec<NewTicket> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn patches(&self) -> Vec<(u64, Status)> {
        self.state.lock().unwrap().patches.clone()
    }

    pub fn stats_calls(&self) -> usize {
        self.state.lock().unwrap().stats_calls
    }

    fn matches(ticket: &Ticket, query: &TicketQuery) -> bool {
        let field = |key: &str, value: &str| query.get(key).is_none_or(|wanted| wanted == value);
        let search = query.get("search").is_none_or(|needle| {
            let needle = needle.to_lowercase();
            ticket.title.to_lowercase().contains(&needle)
                || ticket.description.to_lowercase().contains(&needle)
        });
        field("category", ticket.category.as_str())
            && field("priority", ticket.priority.as_str())
            && field("status", ticket.status.as_str())
            && search
    }
}

#[async_trait]
impl TicketService for FakeTicketService {
    async fn create_ticket(&self, new_ticket: NewTicket) -> AppResult<Ticket> {
        let delay = self.state.lock().unwrap().create_delay;
        if !delay.is_zero() {
            sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = &state.create_failure {
            return Err(failure.to_error());
        }
        let id = state.tickets.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let created = Ticket {
            id,
            title: new_ticket.title.clone(),
            description: new_ticket.description.clone(),
            category: new_ticket.category,
            priority: new_ticket.priority,
            status: Status::Open,
            created_at: Utc::now(),
        };
        state.tickets.push(created.clone());
        state.created.push(new_ticket);
        Ok(created)
    }

    async fn list_tickets(&self, query: &TicketQuery) -> AppResult<Vec<Ticket>> {
        let (delay, outcome) = {
            let mut state = self.state.lock().unwrap();
            state.list_calls.push(ListCall {
                query: query.clone(),
                at: self.started.elapsed(),
            });
            let delay = state.list_delays.pop_front().unwrap_or_default();
            let outcome = match &state.list_failure {
                Some(failure) => Err(failure.to_error()),
                None => Ok(state
                    .tickets
                    .iter()
                    .filter(|ticket| Self::matches(ticket, query))
                    .cloned()
                    .collect()),
            };
            (delay, outcome)
        };
        if !delay.is_zero() {
            sleep(delay).await;
        }
        outcome
    }

    async fn update_status(&self, id: u64, status: Status) -> AppResult<Ticket> {
        let mut state = self.state.lock().unwrap();
        if let Some(failure) = &state.patch_failure {
            return Err(failure.to_error());
        }
        state.patches.push((id, status));
        let ticket = state
            .tickets
            .iter_mut()
            .find(|ticket| ticket.id == id)
            .ok_or(AppError::Server {
                status: 404,
                body: r#"{"detail":"Not found."}"#.to_string(),
            })?;
        ticket.status = status;
        Ok(ticket.clone())
    }

    async fn fetch_stats(&self) -> AppResult<StatsSnapshot> {
        let mut state = self.state.lock().unwrap();
        state.stats_calls += 1;
        if let Some(failure) = &state.stats_failure {
            return Err(failure.to_error());
        }
        let count_priority = |priority: Priority| {
            state.tickets.iter().filter(|t| t.priority == priority).count() as u64
        };
        let count_category = |category: Category| {
            state.tickets.iter().filter(|t| t.category == category).count() as u64
        };
        Ok(StatsSnapshot {
            total_tickets: state.tickets.len() as u64,
            open_tickets: state.tickets.iter().filter(|t| t.status == Status::Open).count() as u64,
            avg_per_day: state.tickets.len() as f64,
            by_priority: Priority::ALL
                .into_iter()
                .map(|priority| PriorityCount {
                    priority,
                    count: count_priority(priority),
                })
                .filter(|row| row.count > 0)
                .collect(),
            by_category: Category::ALL
                .into_iter()
                .map(|category| CategoryCount {
                    category,
                    count: count_category(category),
                })
                .filter(|row| row.count > 0)
                .collect(),
        })
    }
}

/// Classifier answering from a script of `(delay, outcome)` pairs; an empty
/// script answers with no suggestion.
#[derive(Default)]
pub struct FakeClassifier {
    script: Mutex<VecDeque<(Duration, Result<ClassificationSuggestion, String>)>>,
    calls: Mutex<Vec<String>>,
}

impl FakeClassifier {
    pub fn respond(&self, delay: Duration, outcome: Result<ClassificationSuggestion, String>) {
        self.script.lock().unwrap().push_back((delay, outcome));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClassificationService for FakeClassifier {
    async fn classify(&self, description: &str) -> AppResult<ClassificationSuggestion> {
        self.calls.lock().unwrap().push(description.to_string());
        let next = self.script.lock().unwrap().pop_front();
        let (delay, outcome) = next.unwrap_or((Duration::ZERO, Ok(ClassificationSuggestion::default())));
        if !delay.is_zero() {
            sleep(delay).await;
        }
        outcome.map_err(AppError::Classification)
    }
}
