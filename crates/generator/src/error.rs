#![forbid(unsafe_code)]

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("http status {0}")]
    Status(u16),
    #[error("empty response")]
    EmptyResponse,
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response is not a JSON array")]
    NotAnArray,
}

impl GenerateError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "TRANSPORT",
            Self::Timeout(_) => "TIMEOUT",
            Self::Status(_) => "HTTP_STATUS",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::Json(_) => "JSON",
            Self::NotAnArray => "NOT_AN_ARRAY",
        }
    }
}

impl From<ureq::Error> for GenerateError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, _) => Self::Status(status),
            ureq::Error::Transport(transport) => {
                let timed_out = matches!(
                    transport.kind(),
                    ureq::ErrorKind::Io | ureq::ErrorKind::ConnectionFailed
                ) && std::error::Error::source(&transport)
                    .and_then(|source| source.downcast_ref::<io::Error>())
                    .is_some_and(is_timeout);
                if timed_out {
                    Self::Timeout(transport.to_string())
                } else {
                    Self::Transport(format!("{:?} {}", transport.kind(), transport))
                }
            }
        }
    }
}

/// Body read failures; ureq reports read timeouts as `TimedOut`.
impl From<io::Error> for GenerateError {
    fn from(err: io::Error) -> Self {
        if is_timeout(&err) {
            Self::Timeout(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
