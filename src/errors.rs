use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Failure to read a resource from the data source. Callers pick their own
/// fallback; none of these reach the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {name} failed: {source}")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{name} answered with status {status}")]
    Status { name: String, status: u16 },

    #[error("{name} is not valid JSON: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid resource name {0:?}")]
    InvalidName(String),
}

/// Rejected upload. The store is left untouched.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid JSON: expected an object with an \"entries\" array")]
    MissingEntries,
}
