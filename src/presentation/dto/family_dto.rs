use super::{Validate, require};
use crate::domain::entities::{FamilyPost, PersonStatus, SyncRecord};
use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFamilyPostDto {
    pub reporter_name: String,
    pub contact_number: Option<String>,
    pub person_name: String,
    pub person_age: Option<u32>,
    pub last_seen_location: String,
    pub health_status: Option<String>,
    pub other_details: Option<String>,
    pub status: String,
}

impl Validate for CreateFamilyPostDto {
    fn validate(&self) -> Result<(), String> {
        require(&self.reporter_name, "reporter name")?;
        require(&self.person_name, "person name")?;
        require(&self.last_seen_location, "last seen location")?;
        self.status.parse::<PersonStatus>().map(|_| ())
    }
}

impl CreateFamilyPostDto {
    pub fn into_pending(self, coordinates: Option<Coordinates>) -> Result<FamilyPost, String> {
        let status = self.status.parse::<PersonStatus>()?;
        Ok(FamilyPost::new(
            self.reporter_name,
            self.contact_number.filter(|value| !value.trim().is_empty()),
            self.person_name,
            self.person_age,
            self.last_seen_location,
            self.health_status.filter(|value| !value.trim().is_empty()),
            self.other_details.filter(|value| !value.trim().is_empty()),
            status,
            coordinates,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePersonStatusDto {
    pub status: String,
}

impl Validate for UpdatePersonStatusDto {
    fn validate(&self) -> Result<(), String> {
        self.status.parse::<PersonStatus>().map(|_| ())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyPostResponse {
    pub id: String,
    pub reporter_name: String,
    pub contact_number: Option<String>,
    pub person_name: String,
    pub person_age: Option<u32>,
    pub last_seen_location: String,
    pub health_status: Option<String>,
    pub other_details: Option<String>,
    pub status: PersonStatus,
    pub coordinates: Option<Coordinates>,
    pub created_at: i64,
    pub pending: bool,
}

impl From<&FamilyPost> for FamilyPostResponse {
    fn from(post: &FamilyPost) -> Self {
        Self {
            id: post.id.to_string(),
            reporter_name: post.reporter_name.clone(),
            contact_number: post.contact_number.clone(),
            person_name: post.person_name.clone(),
            person_age: post.person_age,
            last_seen_location: post.last_seen_location.clone(),
            health_status: post.health_status.clone(),
            other_details: post.other_details.clone(),
            status: post.status,
            coordinates: post.coordinates(),
            created_at: post.created_at.timestamp(),
            pending: post.is_pending(),
        }
    }
}
