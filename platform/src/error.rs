//! Error taxonomy for client operations.
//!
//! Network and timeout failures stay retryable by the user, authorization
//! failures are intercepted globally by [`crate::ApiClient`], and validation
//! failures are caught before anything is sent.

/// Failure of a single API request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// No response within the client-side timeout.
    #[error("request timed out")]
    Timeout,
    /// The server answered 401; credentials have already been cleared.
    #[error("unauthorized")]
    Unauthorized,
    /// Any other non-success status, passed through unmodified.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message suitable for inline display next to the failed action.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Failure of a session operation. Prior session state is left untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The token could not be decoded into claims.
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// The server signed us in without issuing a token.
    #[error("server returned an empty token")]
    EmptyToken,
    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,
}

/// Client-side input rejection, raised before any request goes out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Insufficient balance. You have {available:.2} LLL available.")]
    InsufficientBalance { available: f64 },
    #[error("Insufficient LLL balance")]
    InsufficientWalletBalance,
    #[error("Insufficient staked amount")]
    InsufficientStake,
    #[error("Market title is required")]
    MissingTitle,
    #[error("Expiry date is required")]
    MissingExpiry,
    #[error("Odds must be at least 1.1")]
    OddsTooLow,
    #[error("Please select an image file")]
    NotAnImage,
    #[error("File size must be less than 5MB")]
    FileTooLarge,
    #[error("Destination wallet address is required")]
    MissingDestination,
    #[error("{0} is required")]
    Required(&'static str),
}

/// Failure of a wallet-context action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
