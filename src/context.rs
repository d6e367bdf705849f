use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{ClassificationService, TicketService};
use crate::workflow::{FormController, ListController, RefreshBus, StatsController};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub tickets: Arc<dyn TicketService>,
    pub classifier: Arc<dyn ClassificationService>,
    pub refresh: RefreshBus,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        tickets: Arc<dyn TicketService>,
        classifier: Arc<dyn ClassificationService>,
    ) -> Self {
        Self {
            config,
            tickets,
            classifier,
            refresh: RefreshBus::new(),
        }
    }

    pub fn form(&self) -> FormController {
        FormController::new(
            self.tickets.clone(),
            self.classifier.clone(),
            self.refresh.clone(),
        )
    }

    pub fn list(&self) -> ListController {
        ListController::new(self.tickets.clone(), self.config.search_debounce)
    }

    pub fn stats(&self) -> StatsController {
        StatsController::new(self.tickets.clone())
    }
}
