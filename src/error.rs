use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, warn};

pub type ReportResult<T> = Result<T, ReportError>;

/// Failures coming from the remote boundary. Kept apart from [`ReportError`] so callers can
/// tell "the service misbehaved" from "the data is wrong".
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote service answered {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("invalid response from remote service: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("there is no report written on {date}")]
    NotFound { date: NaiveDate },

    #[error("{count} reports were written on {date}, expected exactly one")]
    Ambiguous { date: NaiveDate, count: usize },

    #[error("report {report_id} must contain exactly one nested database, found {found}")]
    MalformedReport { report_id: String, found: usize },

    #[error("invalid field `{field}`{}: {detail}", record_suffix(.record_id))]
    Validation {
        field: String,
        record_id: Option<String>,
        detail: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn record_suffix(record_id: &Option<String>) -> String {
    record_id
        .as_deref()
        .map(|id| format!(" on record {id}"))
        .unwrap_or_default()
}

impl ReportError {
    pub fn not_found(date: NaiveDate) -> Self {
        warn!(target: "parte::error", %date, "no report for date");
        ReportError::NotFound { date }
    }

    pub fn ambiguous(date: NaiveDate, count: usize) -> Self {
        warn!(target: "parte::error", %date, count, "several reports for date");
        ReportError::Ambiguous { date, count }
    }

    pub fn malformed(report_id: impl Into<String>, found: usize) -> Self {
        let report_id = report_id.into();
        warn!(target: "parte::error", %report_id, found, "unexpected nested database count");
        ReportError::MalformedReport { report_id, found }
    }

    pub fn missing(field: impl Into<String>, record_id: Option<&str>) -> Self {
        Self::validation(field, record_id, "mandatory field is missing or empty")
    }

    pub fn validation(
        field: impl Into<String>,
        record_id: Option<&str>,
        detail: impl Into<String>,
    ) -> Self {
        let field = field.into();
        let detail = detail.into();
        let record_id = record_id.map(str::to_string);
        warn!(
            target: "parte::error",
            %field,
            record_id = ?record_id,
            %detail,
            "validation error"
        );
        ReportError::Validation {
            field,
            record_id,
            detail,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "parte::error", %message, "configuration error");
        ReportError::Config(message)
    }

    /// Field name carried by a validation failure.
    pub fn field(&self) -> Option<&str> {
        match self {
            ReportError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ReportError {
    fn from(error: reqwest::Error) -> Self {
        error!(target: "parte::error", error = ?error, "transport error");
        ReportError::Transport(TransportError::Http(error))
    }
}
