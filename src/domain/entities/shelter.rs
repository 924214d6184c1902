use super::SyncRecord;
use crate::domain::value_objects::{Coordinates, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShelterStatus {
    Available,
    Full,
    Closed,
}

impl ShelterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShelterStatus::Available => "Available",
            ShelterStatus::Full => "Full",
            ShelterStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for ShelterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShelterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(ShelterStatus::Available),
            "Full" => Ok(ShelterStatus::Full),
            "Closed" => Ok(ShelterStatus::Closed),
            other => Err(format!("Unknown shelter status: {other}")),
        }
    }
}

/// An evacuation shelter pinned on the map by a volunteer.
///
/// Shelters are never deleted; status and capacity are the only fields that
/// change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelter {
    pub id: RecordId,
    pub name: String,
    pub barangay: String,
    pub capacity: Option<u32>,
    pub status: ShelterStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Shelter {
    pub fn new(
        name: String,
        barangay: String,
        capacity: Option<u32>,
        status: ShelterStatus,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            id: RecordId::local(),
            name,
            barangay,
            capacity,
            status,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            created_at: Utc::now(),
        }
    }
}

impl SyncRecord for Shelter {
    type Status = ShelterStatus;

    const TABLE: &'static str = "shelters";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }

    fn status(&self) -> ShelterStatus {
        self.status
    }

    fn set_status(&mut self, status: ShelterStatus) {
        self.status = status;
    }

    fn apply_update(&mut self, update: &Self) {
        self.status = update.status;
        self.capacity = update.capacity;
    }
}
