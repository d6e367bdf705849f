use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;

use crate::domain::ticket::{Category, FieldErrors, Priority, Ticket, TicketDraft};
use crate::error::{AppError, AppResult};
use crate::services::{ClassificationService, TicketService};
use crate::workflow::lock;
use crate::workflow::refresh::RefreshBus;

pub const CREATED_NOTICE: &str = "Ticket created successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub draft: TicketDraft,
    pub phase: FormPhase,
    pub errors: FieldErrors,
    pub api_error: Option<String>,
    pub notice: Option<String>,
    pub classifying: bool,
}

impl FormView {
    pub fn text_enabled(&self) -> bool {
        self.phase != FormPhase::Submitting
    }

    pub fn selectors_enabled(&self) -> bool {
        self.phase != FormPhase::Submitting && !self.classifying
    }

    pub fn submit_enabled(&self) -> bool {
        self.selectors_enabled()
    }
}

/// Owns the ticket draft: validation, the classification side-channel and
/// submission. Publishes on the refresh bus after every successful creation.
#[derive(Clone)]
pub struct FormController {
    inner: Arc<FormInner>,
}

struct FormInner {
    tickets: Arc<dyn TicketService>,
    classifier: Arc<dyn ClassificationService>,
    refresh: RefreshBus,
    state: Mutex<FormState>,
}

struct FormState {
    draft: TicketDraft,
    phase: FormPhase,
    errors: FieldErrors,
    api_error: Option<String>,
    notice: Option<String>,
    classifications_in_flight: usize,
}

impl FormState {
    fn view(&self) -> FormView {
        FormView {
            draft: self.draft.clone(),
            phase: self.phase,
            errors: self.errors.clone(),
            api_error: self.api_error.clone(),
            notice: self.notice.clone(),
            classifying: self.classifications_in_flight > 0,
        }
    }

    fn ensure_text_enabled(&self) -> AppResult<()> {
        if self.phase == FormPhase::Submitting {
            return Err(AppError::Busy("form is disabled while the ticket is submitted"));
        }
        Ok(())
    }

    fn ensure_selectors_enabled(&self) -> AppResult<()> {
        self.ensure_text_enabled()?;
        if self.classifications_in_flight > 0 {
            return Err(AppError::Busy("selectors are disabled while classification runs"));
        }
        Ok(())
    }
}

impl FormController {
    pub fn new(
        tickets: Arc<dyn TicketService>,
        classifier: Arc<dyn ClassificationService>,
        refresh: RefreshBus,
    ) -> Self {
        Self {
            inner: Arc::new(FormInner {
                tickets,
                classifier,
                refresh,
                state: Mutex::new(FormState {
                    draft: TicketDraft::default(),
                    phase: FormPhase::Idle,
                    errors: FieldErrors::default(),
                    api_error: None,
                    notice: None,
                    classifications_in_flight: 0,
                }),
            }),
        }
    }

    pub fn view(&self) -> FormView {
        lock(&self.inner.state).view()
    }

    pub fn set_title(&self, title: impl Into<String>) -> AppResult<()> {
        let mut state = lock(&self.inner.state);
        state.ensure_text_enabled()?;
        state.draft.title = title.into();
        Ok(())
    }

    pub fn set_description(&self, description: impl Into<String>) -> AppResult<()> {
        let mut state = lock(&self.inner.state);
        state.ensure_text_enabled()?;
        state.draft.description = description.into();
        Ok(())
    }

    pub fn set_category(&self, category: Option<Category>) -> AppResult<()> {
        let mut state = lock(&self.inner.state);
        state.ensure_selectors_enabled()?;
        state.draft.category = category;
        Ok(())
    }

    pub fn set_priority(&self, priority: Option<Priority>) -> AppResult<()> {
        let mut state = lock(&self.inner.state);
        state.ensure_selectors_enabled()?;
        state.draft.priority = priority;
        Ok(())
    }

    pub fn validate(&self) -> FieldErrors {
        lock(&self.inner.state).draft.validate()
    }

    /// Description lost focus. Starts a classification request when the
    /// description is non-blank and the form is not submitting, and returns
    /// its task; the draft keeps accepting text meanwhile.
    pub fn description_blurred(&self) -> Option<JoinHandle<()>> {
        let description = {
            let mut state = lock(&self.inner.state);
            if state.phase == FormPhase::Submitting || state.draft.description.trim().is_empty() {
                return None;
            }
            state.classifications_in_flight += 1;
            state.api_error = None;
            state.draft.description.clone()
        };

        let inner = self.inner.clone();
        Some(tokio::spawn(async move {
            let outcome = inner.classifier.classify(&description).await;

            let mut state = lock(&inner.state);
            state.classifications_in_flight -= 1;
            match outcome {
                Ok(suggestion) => {
                    tracing::debug!(?suggestion, "applying classification");
                    suggestion.apply_to(&mut state.draft);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "classification failed, keeping draft as is");
                }
            }
        }))
    }

    /// Validates and submits the draft. Field errors never reach the network.
    pub async fn submit(&self) -> AppResult<Ticket> {
        let new_ticket = {
            let mut state = lock(&self.inner.state);
            state.ensure_selectors_enabled()?;
            state.phase = FormPhase::Validating;
            state.notice = None;

            match state.draft.to_new_ticket() {
                Ok(new_ticket) => {
                    state.errors = FieldErrors::default();
                    state.api_error = None;
                    state.phase = FormPhase::Submitting;
                    new_ticket
                }
                Err(errors) => {
                    tracing::debug!(%errors, "draft rejected by validation");
                    state.errors = errors.clone();
                    state.phase = FormPhase::Idle;
                    return Err(AppError::Validation(errors));
                }
            }
        };

        let outcome = self.inner.tickets.create_ticket(new_ticket).await;

        let mut state = lock(&self.inner.state);
        state.phase = FormPhase::Idle;
        match outcome {
            Ok(ticket) => {
                state.draft = TicketDraft::default();
                state.notice = Some(CREATED_NOTICE.to_string());
                drop(state);

                let signal = self.inner.refresh.publish();
                tracing::info!(id = ticket.id, signal, "ticket created");
                Ok(ticket)
            }
            Err(err) => {
                tracing::error!(error = %err, "ticket creation failed");
                state.api_error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
