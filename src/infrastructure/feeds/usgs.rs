use crate::application::ports::hazard_feed::SeismicFeed;
use crate::domain::entities::SeismicEvent;
use crate::domain::value_objects::Coordinates;
use crate::shared::config::FeedConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// USGS "all day" earthquake summary (GeoJSON).
pub struct UsgsSeismicFeed {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct SummaryDocument {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth]`
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
}

impl UsgsSeismicFeed {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.seismic_url.clone(),
        }
    }

    fn events_from(document: SummaryDocument) -> Vec<SeismicEvent> {
        document
            .features
            .into_iter()
            .filter_map(|feature| {
                let geometry = feature.geometry?;
                // Feed order is [lng, lat, depth].
                let lng = *geometry.coordinates.first()?;
                let lat = *geometry.coordinates.get(1)?;
                Some(SeismicEvent {
                    coordinates: Coordinates::new(lat, lng),
                    magnitude: feature.properties.mag.unwrap_or(0.0),
                    place: feature.properties.place.unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl SeismicFeed for UsgsSeismicFeed {
    async fn fetch(&self) -> Result<Vec<SeismicEvent>, AppError> {
        let document: SummaryDocument = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let events = Self::events_from(document);
        debug!(count = events.len(), "fetched seismic summary");
        Ok(events)
    }
}
