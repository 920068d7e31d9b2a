//! Failure taxonomy for API calls.
//!
//! ERROR HANDLING
//! ==============
//! Business failures come from a transport-successful response whose
//! envelope code is not the success sentinel; the caller presents those.
//! Transport failures are classified by HTTP status, and their `Display`
//! text is the user-facing notification message.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

const FALLBACK_MESSAGE: &str = "request failed";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Business { code: i64, message: String },
    #[error("bad request parameters")]
    BadRequest,
    #[error("unauthorized, please sign in again")]
    Unauthorized,
    #[error("access denied")]
    Forbidden,
    #[error("requested resource does not exist")]
    NotFound,
    #[error("internal server error")]
    Server,
    #[error("request failed: {0}")]
    Status(u16),
    #[error("network connection failed, please check your network")]
    Network { detail: String },
    #[error("{0}")]
    Request(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Business failure from a non-success envelope.
    #[must_use]
    pub fn business(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() { FALLBACK_MESSAGE.to_owned() } else { message };
        Self::Business { code, message }
    }

    /// Classify a non-2xx HTTP status.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::Server,
            other => Self::Status(other),
        }
    }

    /// Request construction failure, falling back to a generic message.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() { Self::Request(FALLBACK_MESSAGE.to_owned()) } else { Self::Request(message) }
    }

    /// True for failures raised below the envelope (status, network, build).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Business { .. } | Self::Decode(_))
    }

    /// True when the server rejected the presented credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// HTTP status or envelope code associated with this failure, if any.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Business { code, .. } => Some(*code),
            Self::BadRequest => Some(400),
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::Server => Some(500),
            Self::Status(status) => Some(i64::from(*status)),
            Self::Network { .. } | Self::Request(_) | Self::Decode(_) => None,
        }
    }
}
