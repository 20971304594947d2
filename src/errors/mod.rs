use std::fmt;

/// Failure talking to the code server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Network unreachable, connection reset, or a body that is not the expected JSON
    Transport(String),
    /// The server answered but refused: non-2xx status or `ok: false`
    Rejected {
        status: u16,
        reason: Option<String>,
    },
}

impl ApiError {
    /// Whether the server was reached and said no, as opposed to never answering.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "Transport error: {msg}"),
            Self::Rejected {
                status,
                reason: Some(reason),
            } => write!(f, "Rejected by server ({status}): {reason}"),
            Self::Rejected { status, reason: None } => write!(f, "Rejected by server ({status})"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Convert `reqwest` failures (connect, timeout, body decode) to `ApiError`
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Transport(format!("malformed JSON body: {err}"))
    }
}
