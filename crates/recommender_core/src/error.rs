use std::fmt;

/// Closed set of failures a pipeline stage can end in.
///
/// Every transport or decoding problem is folded into one of these variants
/// before it reaches the state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Bad input, detected before any request was sent or reported by the
    /// service as an unusable document.
    #[error("validation failed: {0}")]
    Validation(String),
    /// No response at all: connection refused, DNS failure or timeout.
    #[error("service unreachable: {0}")]
    Unreachable(String),
    /// The service answered with a non-success status.
    #[error("server rejected the request with status {status}: {detail}")]
    Server { status: u16, detail: String },
    /// The service answered 2xx but the payload is missing required parts.
    #[error("incomplete response: {0}")]
    IncompleteResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Unreachable,
    Server,
    IncompleteResponse,
}

impl ServiceError {
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::Unreachable(detail.into())
    }

    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        Self::Server {
            status,
            detail: detail.into(),
        }
    }

    pub fn incomplete(detail: impl Into<String>) -> Self {
        Self::IncompleteResponse(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unreachable(_) => ErrorKind::Unreachable,
            Self::Server { .. } => ErrorKind::Server,
            Self::IncompleteResponse(_) => ErrorKind::IncompleteResponse,
        }
    }

    /// Message meant for the person using the app rather than for logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(detail) => format!("The request was rejected as invalid: {detail}"),
            Self::Unreachable(_) => {
                "No response from the server. Is the backend running?".to_string()
            }
            Self::Server { status, detail } if detail.is_empty() => {
                format!("The server rejected the request (HTTP {status}).")
            }
            Self::Server { status, detail } => {
                format!("The server rejected the request (HTTP {status}): {detail}")
            }
            Self::IncompleteResponse(_) => {
                "The server returned an incomplete or malformed response.".to_string()
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Unreachable => write!(f, "unreachable"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::IncompleteResponse => write!(f, "incomplete response"),
        }
    }
}
