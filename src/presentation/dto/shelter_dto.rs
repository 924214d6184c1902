use super::{Validate, require};
use crate::domain::entities::{Shelter, ShelterStatus, SyncRecord};
use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShelterDto {
    pub name: String,
    pub barangay: String,
    pub capacity: Option<u32>,
    pub status: String,
}

impl Validate for CreateShelterDto {
    fn validate(&self) -> Result<(), String> {
        require(&self.name, "name")?;
        require(&self.barangay, "barangay")?;
        self.status.parse::<ShelterStatus>().map(|_| ())
    }
}

impl CreateShelterDto {
    /// Build the pending record from the form plus the pinned location.
    pub fn into_pending(self, coordinates: Coordinates) -> Result<Shelter, String> {
        let status = self.status.parse::<ShelterStatus>()?;
        Ok(Shelter::new(
            self.name,
            self.barangay,
            self.capacity,
            status,
            Some(coordinates),
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShelterStatusDto {
    pub status: String,
}

impl Validate for UpdateShelterStatusDto {
    fn validate(&self) -> Result<(), String> {
        self.status.parse::<ShelterStatus>().map(|_| ())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterResponse {
    pub id: String,
    pub name: String,
    pub barangay: String,
    pub capacity: Option<u32>,
    pub status: ShelterStatus,
    pub coordinates: Option<Coordinates>,
    pub created_at: i64,
    pub pending: bool,
}

impl From<&Shelter> for ShelterResponse {
    fn from(shelter: &Shelter) -> Self {
        Self {
            id: shelter.id.to_string(),
            name: shelter.name.clone(),
            barangay: shelter.barangay.clone(),
            capacity: shelter.capacity,
            status: shelter.status,
            coordinates: shelter.coordinates(),
            created_at: shelter.created_at.timestamp(),
            pending: shelter.is_pending(),
        }
    }
}
