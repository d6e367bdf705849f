use async_trait::async_trait;

use crate::domain::filter::TicketQuery;
use crate::domain::stats::StatsSnapshot;
use crate::domain::ticket::{NewTicket, Status, Ticket};
use crate::error::AppResult;

#[async_trait]
pub trait TicketService: Send + Sync {
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket>;
    async fn list_tickets(&self, query: &TicketQuery) -> AppResult<Vec<Ticket>>;
    async fn update_status(&self, id: u64, status: Status) -> AppResult<Ticket>;
    async fn fetch_stats(&self) -> AppResult<StatsSnapshot>;
}
