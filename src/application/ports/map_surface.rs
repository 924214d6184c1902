use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Visual treatment of a marker, derived from entity category and status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IconKind {
    /// Colored pin (help requests, family posts, the temporary pin).
    Pin { color: &'static str },
    /// Pulsing sonar rings (seismic events), colored by magnitude.
    Sonar { color: &'static str },
    /// Translucent storm circle (cyclone tracks).
    StormCircle { radius_m: u32 },
    Shelter,
    User,
}

/// One marker to draw, as handed to the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    pub coordinates: Coordinates,
    pub icon: IconKind,
    pub popup: String,
}

/// Layers rendered independently on the shared canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapLayer {
    Requests,
    Shelters,
    FamilyPosts,
    Seismic,
    Cyclones,
    TempPin,
    UserPosition,
}

/// Camera movement. `duration: None` jumps, `Some` animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraCommand {
    pub center: Coordinates,
    pub zoom: u8,
    pub duration: Option<Duration>,
}

/// The map rendering surface. Failures here must not take the application
/// down; the controller isolates them.
#[async_trait]
pub trait MapSurface: Send + Sync {
    async fn render_layer(
        &self,
        layer: MapLayer,
        markers: Vec<MarkerDescriptor>,
    ) -> Result<(), AppError>;

    async fn move_camera(&self, command: CameraCommand) -> Result<(), AppError>;
}
