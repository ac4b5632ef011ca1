//! Domain error types for the character catalog.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

/// Message shown when no response reached the client.
pub const NETWORK_ERROR_MESSAGE: &str =
    "A network error occurred while fetching characters. Please check your connection.";

/// A page call failed.
///
/// `Display` is the user-facing message and is surfaced verbatim by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote answered with a non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// No response reached the client
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Connection { detail: String },

    /// A success response whose body is not a page result
    #[error("Invalid response from character API: {detail}")]
    Decode { detail: String },
}

impl RemoteError {
    /// Build an HTTP error from the status and raw response body.
    ///
    /// Uses the body's `error` field when present, otherwise the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("API error: {}", status));
        RemoteError::Http { status, message }
    }

    /// HTTP status code, when the remote answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body the remote API sends with non-2xx responses.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// A rejected query-state intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Page size {0} is not allowed (choose 5, 10, 20, 50, 100 or 250)")]
    InvalidPageSize(u32),

    #[error("Sort order requires a sort key")]
    SortOrderWithoutKey,

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    #[error("Unknown gender: {0}")]
    UnknownGender(String),
}

/// Convenience type alias for Results with RemoteError.
pub type RemoteResult<T> = Result<T, RemoteError>;
