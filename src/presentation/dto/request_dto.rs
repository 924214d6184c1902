use super::{Validate, require};
use crate::domain::entities::{HelpRequest, SyncRecord, Urgency};
use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHelpRequestDto {
    pub need: String,
    pub name: String,
    pub barangay: String,
    pub urgency: String,
}

impl Validate for CreateHelpRequestDto {
    fn validate(&self) -> Result<(), String> {
        require(&self.need, "need")?;
        require(&self.name, "name")?;
        require(&self.barangay, "barangay")?;
        require(&self.urgency, "urgency")?;
        self.urgency.parse::<Urgency>().map(|_| ())
    }
}

impl CreateHelpRequestDto {
    /// Build the pending record. Call only after `validate`.
    pub fn into_pending(self, coordinates: Option<Coordinates>) -> Result<HelpRequest, String> {
        let urgency = self.urgency.parse::<Urgency>()?;
        Ok(HelpRequest::new(
            self.need,
            self.name,
            self.barangay,
            urgency,
            coordinates,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelpRequestResponse {
    pub id: String,
    pub need: String,
    pub name: String,
    pub barangay: String,
    pub urgency: Urgency,
    pub coordinates: Option<Coordinates>,
    pub created_at: i64,
    pub pending: bool,
}

impl From<&HelpRequest> for HelpRequestResponse {
    fn from(request: &HelpRequest) -> Self {
        Self {
            id: request.id.to_string(),
            need: request.need.clone(),
            name: request.name.clone(),
            barangay: request.barangay.clone(),
            urgency: request.urgency,
            coordinates: request.coordinates(),
            created_at: request.created_at.timestamp(),
            pending: request.is_pending(),
        }
    }
}
