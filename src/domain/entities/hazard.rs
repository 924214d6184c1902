use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};

/// One earthquake from the seismic feed's latest snapshot.
///
/// Feed records carry no stable cross-request identity; a snapshot is
/// replaced wholesale every poll cycle and entries are keyed by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    pub coordinates: Coordinates,
    pub magnitude: f64,
    pub place: String,
}

/// One tropical-cyclone track from the cyclone feed's latest snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycloneTrack {
    pub center: Coordinates,
    pub name: String,
    pub intensity: String,
}
