use crate::domain::entities::{CycloneTrack, SeismicEvent};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Read-only seismic hazard feed; each fetch is a complete snapshot.
#[async_trait]
pub trait SeismicFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<SeismicEvent>, AppError>;
}

/// Read-only tropical-cyclone feed; each fetch is a complete snapshot.
#[async_trait]
pub trait CycloneFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CycloneTrack>, AppError>;
}
