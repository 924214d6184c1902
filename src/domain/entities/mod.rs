pub mod family_post;
pub mod hazard;
pub mod help_request;
pub mod shelter;

pub use family_post::{FamilyPost, PersonStatus};
pub use hazard::{CycloneTrack, SeismicEvent};
pub use help_request::{HelpRequest, Urgency};
pub use shelter::{Shelter, ShelterStatus};

use crate::domain::value_objects::{Coordinates, RecordId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Capability set shared by every synchronized entity kind.
///
/// The sync channel and the mutation gateway are generic over this trait so
/// help requests, shelters and family posts share one reconciliation
/// machinery instead of three copies.
pub trait SyncRecord:
    Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    type Status: Clone + fmt::Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned;

    /// Backend table this entity kind synchronizes against.
    const TABLE: &'static str;

    fn id(&self) -> &RecordId;

    /// Canonical ordering key, immutable after creation. Lists are always
    /// displayed newest-first on this value.
    fn created_at(&self) -> DateTime<Utc>;

    /// Coordinates are never mutated once set.
    fn coordinates(&self) -> Option<Coordinates>;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);

    /// Copy the remotely-mutable fields from `update`. Everything outside
    /// status (and shelter capacity) stays as created.
    fn apply_update(&mut self, update: &Self);

    /// True until the backend has acknowledged the record.
    fn is_pending(&self) -> bool {
        self.id().is_local()
    }
}
