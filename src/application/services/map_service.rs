use crate::application::ports::map_surface::{
    CameraCommand, IconKind, MapLayer, MapSurface, MarkerDescriptor,
};
use crate::application::services::notice_service::NoticeCenter;
use crate::domain::entities::{
    CycloneTrack, FamilyPost, HelpRequest, PersonStatus, SeismicEvent, Shelter, SyncRecord,
    Urgency,
};
use crate::domain::value_objects::Coordinates;
use crate::shared::config::MapConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::error;

const TEMP_PIN_COLOR: &str = "blue";
const CYCLONE_RADIUS_M: u32 = 100_000;

/// Pin color for a help request's urgency.
pub fn urgency_color(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::High => "red",
        Urgency::Medium => "orange",
        Urgency::Low => "green",
    }
}

/// Sonar color scale for earthquake magnitude.
pub fn magnitude_color(magnitude: f64) -> &'static str {
    if magnitude >= 6.0 {
        "#ff0000"
    } else if magnitude >= 4.0 {
        "#ff6600"
    } else if magnitude >= 2.5 {
        "#ffcc00"
    } else {
        "#00cc44"
    }
}

/// Pin color for a family post's status.
pub fn person_status_color(status: PersonStatus) -> &'static str {
    match status {
        PersonStatus::Missing => "red",
        PersonStatus::Found => "green",
        PersonStatus::LookingForFamily => "orange",
    }
}

/// Markers are pure derivations of the source records; entities without
/// coordinates pin at the default center so they stay visible.
pub fn request_marker(request: &HelpRequest, default_center: Coordinates) -> MarkerDescriptor {
    MarkerDescriptor {
        coordinates: request.coordinates().unwrap_or(default_center),
        icon: IconKind::Pin {
            color: urgency_color(request.urgency),
        },
        popup: format!(
            "{} - {} ({}) - Urgency: {}",
            request.need, request.name, request.barangay, request.urgency
        ),
    }
}

pub fn shelter_marker(shelter: &Shelter, default_center: Coordinates) -> MarkerDescriptor {
    let capacity = shelter
        .capacity
        .map(|value| value.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    MarkerDescriptor {
        coordinates: shelter.coordinates().unwrap_or(default_center),
        icon: IconKind::Shelter,
        popup: format!(
            "{} - {} - Capacity: {} - Status: {}",
            shelter.name, shelter.barangay, capacity, shelter.status
        ),
    }
}

/// Family posts only render when the report carried coordinates.
pub fn family_post_marker(post: &FamilyPost) -> Option<MarkerDescriptor> {
    let coordinates = post.coordinates()?;
    Some(MarkerDescriptor {
        coordinates,
        icon: IconKind::Pin {
            color: person_status_color(post.status),
        },
        popup: format!(
            "{} - last seen at {} - {}",
            post.person_name, post.last_seen_location, post.status
        ),
    })
}

pub fn seismic_marker(event: &SeismicEvent) -> MarkerDescriptor {
    MarkerDescriptor {
        coordinates: event.coordinates,
        icon: IconKind::Sonar {
            color: magnitude_color(event.magnitude),
        },
        popup: format!("Magnitude: {} - {}", event.magnitude, event.place),
    }
}

pub fn cyclone_marker(track: &CycloneTrack) -> MarkerDescriptor {
    MarkerDescriptor {
        coordinates: track.center,
        icon: IconKind::StormCircle {
            radius_m: CYCLONE_RADIUS_M,
        },
        popup: format!("Typhoon: {} - Category: {}", track.name, track.intensity),
    }
}

/// The single temporary, unsaved pin while pin-placement mode is active.
#[derive(Debug, Default)]
struct PinPlacement {
    active: bool,
    marker: Option<Coordinates>,
}

/// Renders entity and hazard layers onto the map surface and drives the
/// camera. Surface failures are isolated here: the controller degrades to a
/// reload prompt instead of propagating.
pub struct MapController {
    surface: Arc<dyn MapSurface>,
    notices: Arc<NoticeCenter>,
    config: MapConfig,
    pin: Mutex<PinPlacement>,
    needs_reload: AtomicBool,
}

impl MapController {
    pub fn new(surface: Arc<dyn MapSurface>, notices: Arc<NoticeCenter>, config: MapConfig) -> Self {
        Self {
            surface,
            notices,
            config,
            pin: Mutex::new(PinPlacement::default()),
            needs_reload: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// True once a surface failure was isolated; the owning view should show
    /// a reload prompt.
    pub fn needs_reload(&self) -> bool {
        self.needs_reload.load(Ordering::Acquire)
    }

    pub async fn render_requests(&self, requests: &[HelpRequest]) {
        let center = self.config.default_center;
        let markers = requests
            .iter()
            .map(|request| request_marker(request, center))
            .collect();
        self.render(MapLayer::Requests, markers).await;
    }

    pub async fn render_shelters(&self, shelters: &[Shelter]) {
        let center = self.config.default_center;
        let markers = shelters
            .iter()
            .map(|shelter| shelter_marker(shelter, center))
            .collect();
        self.render(MapLayer::Shelters, markers).await;
    }

    pub async fn render_family_posts(&self, posts: &[FamilyPost]) {
        let markers = posts.iter().filter_map(family_post_marker).collect();
        self.render(MapLayer::FamilyPosts, markers).await;
    }

    pub async fn render_seismic(&self, events: &[SeismicEvent]) {
        let markers = events.iter().map(seismic_marker).collect();
        self.render(MapLayer::Seismic, markers).await;
    }

    pub async fn render_cyclones(&self, tracks: &[CycloneTrack]) {
        let markers = tracks.iter().map(cyclone_marker).collect();
        self.render(MapLayer::Cyclones, markers).await;
    }

    pub async fn render_user_position(&self, position: Option<Coordinates>) {
        let markers = position
            .map(|coordinates| {
                vec![MarkerDescriptor {
                    coordinates,
                    icon: IconKind::User,
                    popup: "You are here".to_string(),
                }]
            })
            .unwrap_or_default();
        self.render(MapLayer::UserPosition, markers).await;
    }

    /// Jump the camera. A missing target falls back to the default region.
    pub async fn pan_to(&self, target: Option<Coordinates>, zoom: u8) {
        let command = self.camera_for(target, zoom, None);
        if let Err(err) = self.surface.move_camera(command).await {
            self.degrade(err).await;
        }
    }

    /// Animate the camera. A missing target falls back to the default
    /// region at the fallback zoom, matching the list-panel tap behavior.
    pub async fn fly_to(&self, target: Option<Coordinates>, zoom: u8) {
        let duration = Duration::from_millis(self.config.fly_duration_ms);
        let command = self.camera_for(target, zoom, Some(duration));
        if let Err(err) = self.surface.move_camera(command).await {
            self.degrade(err).await;
        }
    }

    /// Fly to an entity's coordinates, or to the default region when it has
    /// none.
    pub async fn focus_record<T: SyncRecord>(&self, record: &T) {
        match record.coordinates() {
            Some(coordinates) => self.fly_to(Some(coordinates), self.config.focus_zoom).await,
            None => self.fly_to(None, self.config.fallback_zoom).await,
        }
    }

    fn camera_for(
        &self,
        target: Option<Coordinates>,
        zoom: u8,
        duration: Option<Duration>,
    ) -> CameraCommand {
        match target {
            Some(center) => CameraCommand {
                center,
                zoom,
                duration,
            },
            None => CameraCommand {
                center: self.config.default_center,
                zoom: self.config.fallback_zoom,
                duration,
            },
        }
    }

    /// Enter pin-placement mode; the next surface click drops the pin.
    pub async fn enter_pin_mode(&self) {
        let mut pin = self.pin.lock().await;
        pin.active = true;
        pin.marker = None;
    }

    /// Leave pin-placement mode and clear any temporary marker.
    pub async fn cancel_pin_mode(&self) {
        {
            let mut pin = self.pin.lock().await;
            pin.active = false;
            pin.marker = None;
        }
        self.render(MapLayer::TempPin, Vec::new()).await;
    }

    /// A click on the map surface. In pin mode it places (or replaces) the
    /// single temporary marker and returns true; otherwise it is ignored.
    pub async fn handle_click(&self, at: Coordinates) -> bool {
        {
            let mut pin = self.pin.lock().await;
            if !pin.active {
                return false;
            }
            pin.marker = Some(at);
        }
        self.render(
            MapLayer::TempPin,
            vec![MarkerDescriptor {
                coordinates: at,
                icon: IconKind::Pin {
                    color: TEMP_PIN_COLOR,
                },
                popup: "Temporary pin".to_string(),
            }],
        )
        .await;
        true
    }

    /// The temporary marker, if one is placed.
    pub async fn pinned(&self) -> Option<Coordinates> {
        self.pin.lock().await.marker
    }

    /// Seed a pin directly (e.g. from an acquired device position) and stay
    /// in pin mode so the user can adjust it.
    pub async fn place_pin(&self, at: Coordinates) {
        {
            let mut pin = self.pin.lock().await;
            pin.active = true;
            pin.marker = Some(at);
        }
        self.render(
            MapLayer::TempPin,
            vec![MarkerDescriptor {
                coordinates: at,
                icon: IconKind::Pin {
                    color: TEMP_PIN_COLOR,
                },
                popup: "Temporary pin".to_string(),
            }],
        )
        .await;
    }

    /// Called after a successful submit: the temporary marker is consumed
    /// and the mode exits.
    pub async fn take_pinned(&self) -> Option<Coordinates> {
        let taken = {
            let mut pin = self.pin.lock().await;
            pin.active = false;
            pin.marker.take()
        };
        self.render(MapLayer::TempPin, Vec::new()).await;
        taken
    }

    async fn render(&self, layer: MapLayer, markers: Vec<MarkerDescriptor>) {
        if let Err(err) = self.surface.render_layer(layer, markers).await {
            self.degrade(err).await;
        }
    }

    /// A broken surface must not take the application down; everything else
    /// keeps running while this view shows a reload prompt.
    async fn degrade(&self, err: AppError) {
        error!("map surface failure isolated: {err}");
        self.needs_reload.store(true, Ordering::Release);
        self.notices
            .error("Something went wrong. Please reload the page to continue.")
            .await;
    }
}
