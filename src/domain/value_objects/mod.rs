pub mod coordinates;
pub mod record_id;

pub use coordinates::Coordinates;
pub use record_id::RecordId;
