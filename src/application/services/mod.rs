pub mod hazard_service;
pub mod location_service;
pub mod map_service;
pub mod mutation_service;
pub mod notice_service;
pub mod sync_service;

pub use hazard_service::{HazardPoller, PollerHandle};
pub use location_service::{Liveness, LocationFix, LocationGate, SubmitGate, SubmitPermit};
pub use map_service::MapController;
pub use mutation_service::MutationGateway;
pub use notice_service::{Notice, NoticeCenter, NoticeSeverity};
pub use sync_service::{SubscriptionHandle, SyncChannel};
