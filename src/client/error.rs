//! Error types for REST client operations

/// Error returned by [`InventoryApi`](super::InventoryApi) calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token configured; nothing was sent
    Unauthenticated,
    /// The backend answered with a non-success status
    Status { code: u16, body: String },
    /// Connection, TLS or timeout failure
    Transport(String),
    /// The response body did not match the expected shape
    Decode { path: String, message: String },
}

impl ApiError {
    /// `true` for 401/403 responses and missing tokens
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthenticated | ApiError::Status { code: 401 | 403, .. }
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthenticated => {
                write!(f, "No API token configured; set LABSTOCK__API__TOKEN or pass --token")
            }
            ApiError::Status { code, body } => {
                if body.is_empty() {
                    write!(f, "API returned status {}", code)
                } else {
                    write!(f, "API returned status {}: {}", code, body)
                }
            }
            ApiError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ApiError::Decode { path, message } => {
                write!(f, "Unexpected response from {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for ApiError {}
