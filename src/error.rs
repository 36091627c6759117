// src/error.rs

use thiserror::Error;

/// Request-level failures of the report engine.
///
/// A failed sub-view fetch or an unparseable number never shows up here:
/// those are recovered where they happen (skip + log, or `None`).
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("upstream unavailable: {detail}")]
    UpstreamUnavailable { status: Option<u16>, detail: String },

    #[error("data table not found")]
    TableNotFound,

    #[error("{0}")]
    Internal(String),
}

impl ScrapeError {
    pub fn upstream_status(status: u16) -> Self {
        ScrapeError::UpstreamUnavailable {
            status: Some(status),
            detail: format!("HTTP {}", status),
        }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            ScrapeError::InvalidInput(_) => 400,
            ScrapeError::TableNotFound => 404,
            ScrapeError::UpstreamUnavailable { .. } | ScrapeError::Internal(_) => 500,
        }
    }

    /// Short message for the `{"error": ...}` body. Never carries the
    /// upstream transport error chain.
    pub fn public_message(&self) -> String {
        match self {
            ScrapeError::UpstreamUnavailable { .. } => "Could not reach the upstream site".to_string(),
            ScrapeError::TableNotFound => "Data table not found".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ScrapeError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(ScrapeError::upstream_status(503).status_code(), 500);
        assert_eq!(ScrapeError::TableNotFound.status_code(), 404);
        assert_eq!(ScrapeError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_detail() {
        let err = ScrapeError::UpstreamUnavailable {
            status: None,
            detail: "error trying to connect: dns error".into(),
        };
        assert!(!err.public_message().contains("dns"));
        assert_eq!(
            ScrapeError::Internal("boom".into()).public_message(),
            "boom"
        );
    }
}
