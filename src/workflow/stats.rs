use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::domain::stats::StatsSnapshot;
use crate::services::TicketService;
use crate::workflow::freshness::FreshnessGuard;
use crate::workflow::lock;
use crate::workflow::refresh::RefreshBus;

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub snapshot: Option<StatsSnapshot>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct StatsController {
    inner: Arc<StatsInner>,
}

struct StatsInner {
    service: Arc<dyn TicketService>,
    state: Mutex<StatsState>,
}

#[derive(Default)]
struct StatsState {
    snapshot: Option<StatsSnapshot>,
    loading: bool,
    error: Option<String>,
    freshness: FreshnessGuard,
}

impl StatsController {
    pub fn new(service: Arc<dyn TicketService>) -> Self {
        Self {
            inner: Arc::new(StatsInner {
                service,
                state: Mutex::new(StatsState::default()),
            }),
        }
    }

    pub fn view(&self) -> StatsView {
        let state = lock(&self.inner.state);
        StatsView {
            snapshot: state.snapshot.clone(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    pub fn mount(&self, refresh: &RefreshBus) -> JoinHandle<()> {
        let mut subscription = refresh.subscribe();
        self.refetch();

        let controller = self.clone();
        tokio::spawn(async move {
            while let Some(signal) = subscription.changed().await {
                tracing::debug!(signal, "refresh signal, reloading stats");
                controller.refetch();
            }
        })
    }

    pub fn refetch(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move { controller.refresh().await })
    }

    /// Replaces the snapshot wholesale; a failure drops it entirely.
    pub async fn refresh(&self) {
        let tag = {
            let mut state = lock(&self.inner.state);
            state.loading = true;
            state.error = None;
            state.freshness.issue()
        };

        let outcome = self.inner.service.fetch_stats().await;

        let mut state = lock(&self.inner.state);
        if !state.freshness.is_current(tag) {
            tracing::debug!("discarding stale stats snapshot");
            return;
        }
        state.loading = false;
        match outcome {
            Ok(snapshot) => state.snapshot = Some(snapshot),
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch stats");
                state.snapshot = None;
                state.error = Some(format!("Failed to fetch stats: {}", err.user_message()));
            }
        }
    }
}
