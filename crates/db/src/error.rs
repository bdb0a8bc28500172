/// Errors from the backend gateway (REST, storage and auth endpoints).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A single-row lookup matched nothing.
    #[error("No matching row in {table}")]
    NotFound { table: &'static str },

    /// An update or delete was issued without any row filter.
    #[error("Refusing unfiltered {operation} on {table}")]
    Unfiltered {
        operation: &'static str,
        table: &'static str,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DbError {
    /// 401/403 from the backend: missing or expired session, or a row
    /// policy rejected the caller.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DbError::Api { status: 401 | 403, .. })
    }
}
