use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Network(String),
    NotFound(String),
    InvalidInput(String),
    FeedError(String),
    SubscriptionClosed(String),
    SerializationError(String),
    DeserializationError(String),
    Busy(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::FeedError(msg) => write!(f, "Feed error: {}", msg),
            AppError::SubscriptionClosed(msg) => write!(f, "Subscription closed: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            AppError::Busy(msg) => write!(f, "Busy: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Stable machine-readable code, used by the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Network(_) => "NETWORK",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::FeedError(_) => "FEED",
            AppError::SubscriptionClosed(_) => "SUBSCRIPTION_CLOSED",
            AppError::SerializationError(_) => "SERIALIZATION",
            AppError::DeserializationError(_) => "DESERIALIZATION",
            AppError::Busy(_) => "BUSY",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to show to the end user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) | AppError::FeedError(_) => {
                "A network problem occurred. Please try again.".to_string()
            }
            AppError::SubscriptionClosed(_) => {
                "Live updates were interrupted. Please refresh.".to_string()
            }
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Busy(msg) => msg.clone(),
            AppError::NotFound(msg) => format!("Not found: {msg}"),
            _ => "Something went wrong. Please reload and try again.".to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::DeserializationError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Internal(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
