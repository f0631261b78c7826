#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
}

/// Failure of a single API call.
///
/// `Status` carries the human-readable message extracted from the error body,
/// so `to_string()` is what callers show to the user.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("invalid request body: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Server,
    Transport,
    Decode,
    Other,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Transport(_) => ApiErrorKind::Transport,
            ApiError::Decode(_) | ApiError::Encode(_) => ApiErrorKind::Decode,
            ApiError::Status { status, .. } => match status {
                401 => ApiErrorKind::Unauthorized,
                403 => ApiErrorKind::Forbidden,
                404 => ApiErrorKind::NotFound,
                400 | 422 => ApiErrorKind::Validation,
                500..=599 => ApiErrorKind::Server,
                _ => ApiErrorKind::Other,
            },
        }
    }

    /// Permission failure, e.g. reviewing without a confirmed booking.
    ///
    /// The status code decides when there is one; the message text is only
    /// consulted for failures that never produced a status.
    pub fn is_forbidden(&self) -> bool {
        match self.status() {
            Some(status) => status == 403,
            None => {
                let message = self.to_string();
                message.to_lowercase().contains("forbidden") || message.contains("403")
            }
        }
    }
}
