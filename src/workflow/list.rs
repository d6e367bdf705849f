use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::filter::FilterState;
use crate::domain::ticket::{Category, Priority, Status, Ticket};
use crate::error::{AppError, AppResult};
use crate::services::TicketService;
use crate::workflow::debounce::Debouncer;
use crate::workflow::freshness::FreshnessGuard;
use crate::workflow::lock;
use crate::workflow::refresh::RefreshBus;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub filters: FilterState,
    pub tickets: Vec<Ticket>,
    pub loading: bool,
    pub error: Option<String>,
    pub alert: Option<String>,
}

/// Filterable ticket list. Structural filters and refresh signals refetch
/// immediately, search text refetches after a quiet period, and only the
/// response to the latest request is ever applied.
#[derive(Clone)]
pub struct ListController {
    inner: Arc<ListInner>,
}

struct ListInner {
    service: Arc<dyn TicketService>,
    search_debounce: Debouncer,
    state: Mutex<ListState>,
}

#[derive(Default)]
struct ListState {
    filters: FilterState,
    tickets: Vec<Ticket>,
    loading: bool,
    error: Option<String>,
    alert: Option<String>,
    freshness: FreshnessGuard,
}

impl ListController {
    pub fn new(service: Arc<dyn TicketService>, search_debounce: Duration) -> Self {
        Self {
            inner: Arc::new(ListInner {
                service,
                search_debounce: Debouncer::new(search_debounce),
                state: Mutex::new(ListState::default()),
            }),
        }
    }

    /// Seeds the filters without fetching; meant for use before `mount`.
    pub fn with_filters(self, filters: FilterState) -> Self {
        lock(&self.inner.state).filters = filters;
        self
    }

    pub fn view(&self) -> ListView {
        let state = lock(&self.inner.state);
        ListView {
            filters: state.filters.clone(),
            tickets: state.tickets.clone(),
            loading: state.loading,
            error: state.error.clone(),
            alert: state.alert.clone(),
        }
    }

    /// Initial fetch, then one immediate refetch per refresh signal.
    pub fn mount(&self, refresh: &RefreshBus) -> JoinHandle<()> {
        let mut subscription = refresh.subscribe();
        self.refetch();

        let controller = self.clone();
        tokio::spawn(async move {
            while let Some(signal) = subscription.changed().await {
                tracing::debug!(signal, "refresh signal, reloading tickets");
                controller.refetch();
            }
        })
    }

    pub fn set_category(&self, category: Option<Category>) {
        self.update_structural(|filters| {
            let changed = filters.category != category;
            filters.category = category;
            changed
        });
    }

    pub fn set_priority(&self, priority: Option<Priority>) {
        self.update_structural(|filters| {
            let changed = filters.priority != priority;
            filters.priority = priority;
            changed
        });
    }

    pub fn set_status_filter(&self, status: Option<Status>) {
        self.update_structural(|filters| {
            let changed = filters.status != status;
            filters.status = status;
            changed
        });
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        {
            let mut state = lock(&self.inner.state);
            if state.filters.search == search {
                return;
            }
            state.filters.search = search;
        }

        let controller = self.clone();
        self.inner.search_debounce.schedule(move || {
            controller.refetch();
        });
    }

    pub fn search_pending(&self) -> bool {
        self.inner.search_debounce.is_pending()
    }

    fn update_structural(&self, apply: impl FnOnce(&mut FilterState) -> bool) {
        let changed = apply(&mut lock(&self.inner.state).filters);
        if changed {
            self.refetch();
        }
    }

    /// Starts a fetch for the current filters without waiting for it.
    pub fn refetch(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move { controller.refresh().await })
    }

    /// Fetches the list for the current filters and applies the response if
    /// no newer fetch was issued in the meantime.
    pub async fn refresh(&self) {
        let (tag, query) = {
            let mut state = lock(&self.inner.state);
            state.loading = true;
            state.error = None;
            (state.freshness.issue(), state.filters.to_query())
        };
        tracing::debug!(?query, unconstrained = query.is_unconstrained(), "fetching tickets");

        let outcome = self.inner.service.list_tickets(&query).await;

        let mut state = lock(&self.inner.state);
        if !state.freshness.is_current(tag) {
            tracing::debug!(?query, "discarding stale ticket list");
            return;
        }
        state.loading = false;
        match outcome {
            Ok(tickets) => {
                tracing::debug!(count = tickets.len(), "ticket list applied");
                state.tickets = tickets;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch tickets");
                state.error = Some(if matches!(err, AppError::Network(_)) {
                    err.user_message()
                } else {
                    format!("Failed to fetch tickets: {}", err.user_message())
                });
            }
        }
    }

    /// Patches a single ticket's status. Success reloads the whole list so the
    /// ticket is re-evaluated against the active filters; failure leaves the
    /// list as it was and raises an alert.
    pub async fn update_status(&self, id: u64, status: Status) -> AppResult<Ticket> {
        lock(&self.inner.state).alert = None;

        match self.inner.service.update_status(id, status).await {
            Ok(ticket) => {
                tracing::info!(id, status = status.as_str(), "ticket status updated");
                self.refresh().await;
                Ok(ticket)
            }
            Err(err) => {
                tracing::error!(id, error = %err, "failed to update ticket status");
                lock(&self.inner.state).alert =
                    Some(format!("Failed to update status: {}", err.user_message()));
                Err(err)
            }
        }
    }
}
