use crate::domain::value_objects::Coordinates;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Options forwarded to the device positioning service.
#[derive(Debug, Clone, Copy)]
pub struct AcquireOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    pub max_age: Duration,
}

impl Default for AcquireOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

/// Why the device could not produce a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("Location permission denied")]
    Denied,
    #[error("Positioning unavailable on this device")]
    Unavailable,
}

/// Device positioning service ("get current position").
///
/// The gate on top of this port enforces the wall-clock timeout; providers
/// may block until cancelled.
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self, options: &AcquireOptions)
    -> Result<Coordinates, PositionError>;
}
