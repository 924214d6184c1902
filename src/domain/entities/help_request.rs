use super::SyncRecord;
use crate::domain::value_objects::{Coordinates, RecordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How urgently a help request needs a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "High",
            Urgency::Medium => "Medium",
            Urgency::Low => "Low",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Urgency::High),
            "Medium" => Ok(Urgency::Medium),
            "Low" => Ok(Urgency::Low),
            other => Err(format!("Unknown urgency level: {other}")),
        }
    }
}

/// A field-reported request for aid (water, food, medicine, rescue).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: RecordId,
    pub need: String,
    pub name: String,
    pub barangay: String,
    pub urgency: Urgency,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl HelpRequest {
    pub fn new(
        need: String,
        name: String,
        barangay: String,
        urgency: Urgency,
        coordinates: Option<Coordinates>,
    ) -> Self {
        Self {
            id: RecordId::local(),
            need,
            name,
            barangay,
            urgency,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
            created_at: Utc::now(),
        }
    }
}

impl SyncRecord for HelpRequest {
    type Status = Urgency;

    const TABLE: &'static str = "requests";

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

    fn status(&self) -> Urgency {
        self.urgency
    }

    fn set_status(&mut self, status: Urgency) {
        self.urgency = status;
    }

    fn apply_update(&mut self, update: &Self) {
        self.urgency = update.urgency;
    }
}
