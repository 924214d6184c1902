use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

use crate::application::ports::hazard_feed::{CycloneFeed, SeismicFeed};
use crate::application::ports::map_surface::MapSurface;
use crate::application::ports::position_provider::PositionProvider;
use crate::application::ports::remote_table::RemoteTable;
use crate::application::services::{
    HazardPoller, LocationGate, MapController, MutationGateway, NoticeCenter, SyncChannel,
};
use crate::domain::entities::{FamilyPost, HelpRequest, Shelter};
use crate::infrastructure::store::{EntityStore, HazardOverlay};
use crate::shared::AppConfig;

/// Everything the core talks to but does not own: the backend tables with
/// their change streams, the hazard feeds, the positioning service and the
/// map rendering surface.
pub struct ExternalServices {
    pub requests: Arc<dyn RemoteTable<HelpRequest>>,
    pub shelters: Arc<dyn RemoteTable<Shelter>>,
    pub family_posts: Arc<dyn RemoteTable<FamilyPost>>,
    pub seismic_feed: Arc<dyn SeismicFeed>,
    pub cyclone_feed: Arc<dyn CycloneFeed>,
    pub positions: Arc<dyn PositionProvider>,
    pub surface: Arc<dyn MapSurface>,
}

/// Application-wide wiring: one store, sync channel and mutation gateway per
/// entity type, the hazard overlay with its poller, the location gate and
/// the notice center. Views borrow from here and keep their own lifecycle
/// state in their handlers.
pub struct AppState {
    pub config: AppConfig,
    pub notices: Arc<NoticeCenter>,

    pub requests: Arc<EntityStore<HelpRequest>>,
    pub shelters: Arc<EntityStore<Shelter>>,
    pub family_posts: Arc<EntityStore<FamilyPost>>,

    pub request_channel: Arc<SyncChannel<HelpRequest>>,
    pub shelter_channel: Arc<SyncChannel<Shelter>>,
    pub family_channel: Arc<SyncChannel<FamilyPost>>,

    pub request_gateway: Arc<MutationGateway<HelpRequest>>,
    pub shelter_gateway: Arc<MutationGateway<Shelter>>,
    pub family_gateway: Arc<MutationGateway<FamilyPost>>,

    pub overlay: Arc<HazardOverlay>,
    pub hazard_poller: Arc<HazardPoller>,
    pub location: Arc<LocationGate>,

    surface: Arc<dyn MapSurface>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, services: ExternalServices) -> Self {
        let notices = Arc::new(NoticeCenter::new(Duration::from_millis(
            config.notices.ttl_ms,
        )));

        let requests = Arc::new(EntityStore::new());
        let shelters = Arc::new(EntityStore::new());
        let family_posts = Arc::new(EntityStore::new());

        let request_channel = Arc::new(SyncChannel::new(
            Arc::clone(&services.requests),
            Arc::clone(&requests),
            Arc::clone(&notices),
        ));
        let shelter_channel = Arc::new(SyncChannel::new(
            Arc::clone(&services.shelters),
            Arc::clone(&shelters),
            Arc::clone(&notices),
        ));
        let family_channel = Arc::new(SyncChannel::new(
            Arc::clone(&services.family_posts),
            Arc::clone(&family_posts),
            Arc::clone(&notices),
        ));

        let request_gateway = Arc::new(MutationGateway::new(
            Arc::clone(&services.requests),
            Arc::clone(&requests),
            Arc::clone(&notices),
        ));
        let shelter_gateway = Arc::new(MutationGateway::new(
            Arc::clone(&services.shelters),
            Arc::clone(&shelters),
            Arc::clone(&notices),
        ));
        let family_gateway = Arc::new(MutationGateway::new(
            Arc::clone(&services.family_posts),
            Arc::clone(&family_posts),
            Arc::clone(&notices),
        ));

        let overlay = Arc::new(HazardOverlay::new());
        let hazard_poller = Arc::new(HazardPoller::new(
            Arc::clone(&services.seismic_feed),
            Arc::clone(&services.cyclone_feed),
            Arc::clone(&overlay),
            &config.feeds,
        ));

        let location = Arc::new(LocationGate::new(
            Arc::clone(&services.positions),
            &config.location,
        ));

        info!("application state initialized");

        Self {
            notices,
            requests,
            shelters,
            family_posts,
            request_channel,
            shelter_channel,
            family_channel,
            request_gateway,
            shelter_gateway,
            family_gateway,
            overlay,
            hazard_poller,
            location,
            surface: services.surface,
            started_at: Instant::now(),
            config,
        }
    }

    /// Fresh camera-and-layers controller for one map view.
    pub fn new_map_controller(&self) -> Arc<MapController> {
        Arc::new(MapController::new(
            Arc::clone(&self.surface),
            Arc::clone(&self.notices),
            self.config.map.clone(),
        ))
    }

    /// The fixed-duration splash stage. Resolves once the configured bound
    /// has elapsed since startup; views attach afterwards.
    pub async fn wait_until_ready(&self) {
        let splash = Duration::from_millis(self.config.startup.splash_ms);
        let end = self.started_at + splash;
        tokio::time::sleep_until(end).await;
    }
}
