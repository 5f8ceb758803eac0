use serde_json::Value;
use thiserror::Error;

/// Failure of a single API call. The client never retries; callers decide.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was obtained (unreachable, reset, timeout).
    #[error("request failed: {message}")]
    Transport { message: String },

    /// Non-2xx status.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: Option<Value>,
    },

    /// 2xx response whose JSON body carries an `error` field.
    #[error("{message}")]
    Application {
        status: u16,
        message: String,
        body: Value,
    },

    /// The body did not have the expected shape.
    #[error("unexpected response: {message}")]
    Decode { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } | ApiError::Application { status, .. } => Some(*status),
            ApiError::Transport { .. } | ApiError::Decode { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Status { body, .. } => body.as_ref(),
            ApiError::Application { body, .. } => Some(body),
            ApiError::Transport { .. } | ApiError::Decode { .. } => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }
}
