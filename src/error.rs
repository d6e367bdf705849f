use std::io;

use thiserror::Error;

use crate::domain::ticket::FieldErrors;

pub const CONNECTIVITY_MESSAGE: &str = "Failed to connect to the server. Is the backend running?";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with {status}: {body}")]
    Server { status: u16, body: String },
    #[error("unexpected response from server: {0}")]
    Decode(String),
    #[error("classification error: {0}")]
    Classification(String),
    #[error("{0}")]
    Busy(&'static str),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl AppError {
    /// Text shown to the user in a banner or alert.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => CONNECTIVITY_MESSAGE.to_string(),
            AppError::Server { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_render_body_verbatim() {
        let err = AppError::Server {
            status: 400,
            body: r#"{"title":["This field may not be blank."]}"#.to_string(),
        };
        assert_eq!(
            err.user_message(),
            r#"{"title":["This field may not be blank."]}"#
        );
    }

    #[test]
    fn network_errors_render_generic_message() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), CONNECTIVITY_MESSAGE);
    }
}
