use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub feeds: FeedConfig,
    pub location: LocationConfig,
    pub map: MapConfig,
    pub notices: NoticeConfig,
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub seismic_url: String,
    pub cyclone_url: String,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub high_accuracy: bool,
    pub timeout_ms: u64,
    pub max_age_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Camera target when an entity carries no coordinates.
    pub default_center: Coordinates,
    pub default_zoom: u8,
    /// Zoom used by the no-coordinates camera fallback.
    pub fallback_zoom: u8,
    /// Zoom used when focusing a single entity or the user position.
    pub focus_zoom: u8,
    pub fly_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    pub splash_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feeds: FeedConfig::default(),
            location: LocationConfig::default(),
            map: MapConfig::default(),
            notices: NoticeConfig::default(),
            startup: StartupConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            seismic_url:
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
                    .to_string(),
            cyclone_url: "https://api.met.no/weatherapi/tropicalcyclone/1.0/?content_type=json"
                .to_string(),
            poll_interval_secs: 600,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            max_age_ms: 0,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: Coordinates::new(10.3157, 123.8854),
            default_zoom: 6,
            fallback_zoom: 11,
            focus_zoom: 15,
            fly_duration_ms: 1_500,
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { ttl_ms: 3_000 }
    }
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self { splash_ms: 2_000 }
    }
}
