use thiserror::Error;

/// Errors returned by the marketplace and partner API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 401: the token is missing, expired or revoked.
    #[error("not authenticated: session expired or token rejected")]
    Unauthorized,

    /// Any other non-2xx answer, with the server's `message` when it sent one.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("not found: {url}: {message}")]
    NotFound { url: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A document selected for upload could not be read from disk.
    #[error("cannot read upload file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Login succeeded but the account is not a merchant account.
    #[error("account {email} has role '{role}'; only merchant accounts can sign in here")]
    NotMerchant { email: String, role: String },

    #[error("state store error: {0}")]
    Store(#[from] paya_core::StoreError),
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
