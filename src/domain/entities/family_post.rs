use super::SyncRecord;
use crate::domain::value_objects::{Coordinates, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonStatus {
    Missing,
    Found,
    #[serde(rename = "Looking for family")]
    LookingForFamily,
}

impl PersonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonStatus::Missing => "Missing",
            PersonStatus::Found => "Found",
            PersonStatus::LookingForFamily => "Looking for family",
        }
    }
}

impl fmt::Display for PersonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Missing" => Ok(PersonStatus::Missing),
            "Found" => Ok(PersonStatus::Found),
            "Looking for family" => Ok(PersonStatus::LookingForFamily),
            other => Err(format!("Unknown person status: {other}")),
        }
    }
}

/// A missing-person (or found-person) post on the family locator board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyPost {
    pub id: RecordId,
    pub reporter_name: String,
    pub contact_number: Option<String>,
    pub person_name: String,
    pub person_age: Option<u32>,
    pub last_seen_location: String,
    pub health_status: Option<String>,
    pub other_details: Option<String>,
    pub status: PersonStatus,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl FamilyPost {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reporter_name: String,
        contact_number: Option<String>,
        person_name: String,
        person_age: Option<u32>,
        last_seen_location: String,
        health_status: Option<String>,
        other_details: Option<String>,
        status: PersonStatus,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            id: RecordId::local(),
            reporter_name,
            contact_number,
            person_name,
            person_age,
            last_seen_location,
            health_status,
            other_details,
            status,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive match on person name or last-seen location.
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.person_name.to_lowercase().contains(&query)
            || self.last_seen_location.to_lowercase().contains(&query)
    }
}

impl SyncRecord for FamilyPost {
    type Status = PersonStatus;

    const TABLE: &'static str = "family_locator";

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

    fn status(&self) -> PersonStatus {
        self.status
    }

    fn set_status(&mut self, status: PersonStatus) {
        self.status = status;
    }

    fn apply_update(&mut self, update: &Self) {
        self.status = update.status;
    }
}
