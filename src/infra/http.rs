use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url, header::ACCEPT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::classification::ClassificationSuggestion;
use crate::domain::filter::TicketQuery;
use crate::domain::stats::StatsSnapshot;
use crate::domain::ticket::{Category, NewTicket, Priority, Status, Ticket};
use crate::error::{AppError, AppResult};
use crate::services::{ClassificationService, TicketService};

/// JSON-over-HTTP client for the ticket backend and its classification
/// endpoint.
pub struct TicketApiClient {
    http: Client,
    base_url: String,
}

impl TicketApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        Url::parse(base_url).map_err(|err| {
            AppError::Configuration(format!("invalid base URL '{base_url}': {err}"))
        })?;
        let http = Client::builder().timeout(timeout).build().map_err(|err| {
            AppError::Configuration(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> AppResult<T> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::Network(format!("failed to {action}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = render_error_body(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(AppError::Server {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|err| AppError::Decode(format!("failed to {action}: {err}")))
    }
}

/// Compact JSON when the body parses, the raw text otherwise.
fn render_error_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => Some(value.to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl TicketService for TicketApiClient {
    async fn create_ticket(&self, ticket: NewTicket) -> AppResult<Ticket> {
        let request = self.http.post(self.endpoint("tickets/create/")).json(&ticket);
        self.send(request, "create ticket").await
    }

    async fn list_tickets(&self, query: &TicketQuery) -> AppResult<Vec<Ticket>> {
        let request = self.http.get(self.endpoint("tickets/")).query(query.params());
        self.send(request, "list tickets").await
    }

    async fn update_status(&self, id: u64, status: Status) -> AppResult<Ticket> {
        let request = self
            .http
            .patch(self.endpoint(&format!("tickets/{id}/")))
            .json(&StatusPatch { status });
        self.send(request, "update ticket status").await
    }

    async fn fetch_stats(&self) -> AppResult<StatsSnapshot> {
        let request = self.http.get(self.endpoint("tickets/stats/"));
        self.send(request, "fetch stats").await
    }
}

#[async_trait]
impl ClassificationService for TicketApiClient {
    async fn classify(&self, description: &str) -> AppResult<ClassificationSuggestion> {
        let request = self
            .http
            .post(self.endpoint("tickets/classify/"))
            .json(&ClassifyRequest { description });
        let payload: ClassifyResponse = self
            .send(request, "classify description")
            .await
            .map_err(|err| AppError::Classification(err.to_string()))?;

        Ok(payload.into_suggestion())
    }
}

#[derive(Serialize)]
struct StatusPatch {
    status: Status,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    description: &'a str,
}

#[derive(Deserialize)]
struct ClassifyResponse {
    suggested_category: Option<String>,
    suggested_priority: Option<String>,
}

impl ClassifyResponse {
    fn into_suggestion(self) -> ClassificationSuggestion {
        let category = self.suggested_category.and_then(|raw| {
            let parsed = Category::from_str(&raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "ignoring unknown suggested category");
            }
            parsed
        });
        let priority = self.suggested_priority.and_then(|raw| {
            let parsed = Priority::from_str(&raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "ignoring unknown suggested priority");
            }
            parsed
        });
        ClassificationSuggestion { category, priority }
    }
}
