pub mod hazard_feed;
pub mod map_surface;
pub mod position_provider;
pub mod remote_table;

pub use hazard_feed::{CycloneFeed, SeismicFeed};
pub use map_surface::{CameraCommand, IconKind, MapLayer, MapSurface, MarkerDescriptor};
pub use position_provider::{AcquireOptions, PositionError, PositionProvider};
pub use remote_table::{ChangeOp, RemoteChange, RemoteTable};
