use thiserror::Error;

/// Failure categories for calls to the Elo service.
///
/// Every category is logged and swallowed by the console; the kind only
/// decides how loudly it is logged and what the caller reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Service unreachable, timed out or the connection broke
    Network,
    /// Missing or rejected credential
    Authorization,
    /// The service refused the request (e.g. duplicate player name)
    Rejected,
    /// The response could not be understood
    Malformed,
    /// The request was abandoned because its owner closed
    Cancelled,
    /// The local credential store could not be read or written
    Storage,
}

/// Errors produced at the Elo service boundary
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {detail}")]
    Status {
        endpoint: &'static str,
        status: u16,
        detail: String,
    },
    #[error("malformed response from {endpoint}: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
    #[error("no credential available for a privileged request")]
    MissingToken,
    #[error("request cancelled")]
    Cancelled,
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::Transport { source, .. } if source.is_decode() => FailureKind::Malformed,
            ServiceError::Transport { .. } => FailureKind::Network,
            ServiceError::Status { status: 401 | 403, .. } => FailureKind::Authorization,
            ServiceError::Status { status: 502..=504, .. } => FailureKind::Network,
            ServiceError::Status { .. } => FailureKind::Rejected,
            ServiceError::Malformed { .. } => FailureKind::Malformed,
            ServiceError::MissingToken => FailureKind::Authorization,
            ServiceError::Cancelled => FailureKind::Cancelled,
        }
    }

    pub fn status(endpoint: &'static str, status: u16, detail: impl Into<String>) -> Self {
        ServiceError::Status {
            endpoint,
            status,
            detail: detail.into(),
        }
    }

    pub fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        ServiceError::Malformed {
            endpoint,
            reason: reason.into(),
        }
    }
}

/// Invalid match selections, caught before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("winner and loser must be different players (both are {0})")]
    SamePlayer(String),
    #[error("player {0} is not in the current roster")]
    UnknownPlayer(String),
    #[error("both a winner and a loser must be selected")]
    Incomplete,
    #[error("player name must not be empty")]
    EmptyName,
}
