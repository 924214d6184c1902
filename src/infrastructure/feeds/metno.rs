use crate::application::ports::hazard_feed::CycloneFeed;
use crate::domain::entities::CycloneTrack;
use crate::domain::value_objects::Coordinates;
use crate::shared::config::FeedConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// met.no tropical-cyclone track feed.
pub struct MetNoCycloneFeed {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CycloneDocument {
    #[serde(default)]
    tropicalcyclones: Vec<Storm>,
}

#[derive(Debug, Deserialize)]
struct Storm {
    name: Option<String>,
    intensity: Option<String>,
    center: Option<StormCenter>,
}

#[derive(Debug, Deserialize)]
struct StormCenter {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl MetNoCycloneFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.cyclone_url.clone(),
        }
    }

    fn tracks_from(document: CycloneDocument) -> Vec<CycloneTrack> {
        document
            .tropicalcyclones
            .into_iter()
            .filter_map(|storm| {
                // Storms without a usable center cannot be drawn.
                let center = storm.center?;
                let lat = center.latitude?;
                let lng = center.longitude?;
                Some(CycloneTrack {
                    center: Coordinates::new(lat, lng),
                    name: storm.name.unwrap_or_else(|| "Unnamed".to_string()),
                    intensity: storm.intensity.unwrap_or_else(|| "Unknown".to_string()),
                })
            })
            .collect()
    }
}

#[async_trait]
impl CycloneFeed for MetNoCycloneFeed {
    async fn fetch(&self) -> Result<Vec<CycloneTrack>, AppError> {
        let document: CycloneDocument = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let tracks = Self::tracks_from(document);
        debug!(count = tracks.len(), "fetched cyclone tracks");
        Ok(tracks)
    }
}
