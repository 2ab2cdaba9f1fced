use thiserror::Error;

/// Authentication failures. All of them end the run.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed login: invalid username or password")]
    BadCredentials,

    #[error("Second-factor code was rejected")]
    SecondFactorRejected,

    #[error("Authentication protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AuthError {
    /// Bad credentials get a dedicated user-facing message; every other
    /// variant is reported as a generic service problem.
    pub fn is_bad_credentials(&self) -> bool {
        matches!(self, AuthError::BadCredentials)
    }
}

/// Failure to enumerate the remote library. Ends the run.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("API error (HTTP {status}): {message}")]
    ApiStatus { status: u16, message: String },

    #[error("Unexpected asset listing: {0}")]
    Malformed(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Failure while opening or reading one asset's byte stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("HTTP error {status}")]
    HttpStatus { status: u16 },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}
