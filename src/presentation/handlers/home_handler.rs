use crate::application::services::{
    Liveness, LocationFix, LocationGate, MapController, MutationGateway, PollerHandle,
    SubmitGate, SubscriptionHandle, SyncChannel,
};
use crate::domain::entities::{FamilyPost, HelpRequest};
use crate::domain::value_objects::{Coordinates, RecordId};
use crate::infrastructure::store::{EntityStore, HazardOverlay};
use crate::presentation::dto::Validate;
use crate::presentation::dto::request_dto::{CreateHelpRequestDto, HelpRequestResponse};
use crate::shared::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// The shared-map view: request pins, family-post pins, hazard overlays and
/// the quick-action flows (report here, drop a pin, find me).
///
/// Owns its subscriptions, the hazard polling and the render loop; all of it
/// stops when the handler is dropped, whichever way the view exits.
pub struct HomeHandler {
    requests: Arc<EntityStore<HelpRequest>>,
    family_posts: Arc<EntityStore<FamilyPost>>,
    request_gateway: Arc<MutationGateway<HelpRequest>>,
    request_channel: Arc<SyncChannel<HelpRequest>>,
    _request_subscription: SubscriptionHandle,
    _family_subscription: SubscriptionHandle,
    _poller: PollerHandle,
    overlay: Arc<HazardOverlay>,
    map: Arc<MapController>,
    location: Arc<LocationGate>,
    submit_gate: SubmitGate,
    liveness: Liveness,
    render_task: JoinHandle<()>,
}

impl HomeHandler {
    pub async fn attach(state: &AppState) -> Result<Self, AppError> {
        let request_subscription = state.request_channel.open().await?;
        let family_subscription = state.family_channel.open().await?;
        let poller = state.hazard_poller.start();
        let map = state.new_map_controller();

        let handler = Self {
            requests: Arc::clone(&state.requests),
            family_posts: Arc::clone(&state.family_posts),
            request_gateway: Arc::clone(&state.request_gateway),
            request_channel: Arc::clone(&state.request_channel),
            _request_subscription: request_subscription,
            _family_subscription: family_subscription,
            _poller: poller,
            overlay: Arc::clone(&state.overlay),
            map: Arc::clone(&map),
            location: Arc::clone(&state.location),
            submit_gate: SubmitGate::new(),
            liveness: Liveness::new(),
            render_task: Self::spawn_render_loop(
                Arc::clone(&state.requests),
                Arc::clone(&state.family_posts),
                Arc::clone(&state.overlay),
                map,
            ),
        };
        handler.render_all().await;
        Ok(handler)
    }

    /// Re-render layers whenever a source collection changes. Markers are
    /// re-derived from the current snapshot each time, never cached.
    fn spawn_render_loop(
        requests: Arc<EntityStore<HelpRequest>>,
        family_posts: Arc<EntityStore<FamilyPost>>,
        overlay: Arc<HazardOverlay>,
        map: Arc<MapController>,
    ) -> JoinHandle<()> {
        use tokio::sync::broadcast::error::RecvError;

        let mut requests_rx = requests.subscribe();
        let mut family_rx = family_posts.subscribe();
        let mut overlay_rx = overlay.subscribe();
        tokio::spawn(async move {
            loop {
                // A lagged receiver just re-reads the snapshot; only a
                // closed channel ends the loop.
                tokio::select! {
                    changed = requests_rx.recv() => {
                        if matches!(changed, Err(RecvError::Closed)) {
                            break;
                        }
                        map.render_requests(&requests.snapshot().await).await;
                    }
                    changed = family_rx.recv() => {
                        if matches!(changed, Err(RecvError::Closed)) {
                            break;
                        }
                        map.render_family_posts(&family_posts.snapshot().await).await;
                    }
                    changed = overlay_rx.recv() => {
                        if matches!(changed, Err(RecvError::Closed)) {
                            break;
                        }
                        map.render_seismic(&overlay.seismic().await).await;
                        map.render_cyclones(&overlay.cyclones().await).await;
                    }
                }
            }
        })
    }

    async fn render_all(&self) {
        futures::join!(
            async {
                self.map
                    .render_requests(&self.requests.snapshot().await)
                    .await
            },
            async {
                self.map
                    .render_family_posts(&self.family_posts.snapshot().await)
                    .await
            },
            async { self.map.render_seismic(&self.overlay.seismic().await).await },
            async {
                self.map
                    .render_cyclones(&self.overlay.cyclones().await)
                    .await
            },
        );
    }

    pub fn map(&self) -> &MapController {
        &self.map
    }

    /// "Find me": recenter the camera on the device position. Absence shows
    /// nothing worse than staying where we are.
    pub async fn locate_me(&self) -> LocationFix {
        let fix = self.location.acquire().await;
        if !self.liveness.is_live() {
            debug!("locate_me completed after view teardown; ignoring");
            return fix;
        }
        if let Some(position) = fix.coordinates() {
            self.map
                .fly_to(Some(position), self.map.config().focus_zoom)
                .await;
        }
        fix
    }

    /// Quick action "report help here": acquire the position, focus the
    /// camera and seed the pin that the request form will read.
    pub async fn start_report_at_my_location(&self) -> LocationFix {
        let fix = self.location.acquire().await;
        if !self.liveness.is_live() {
            debug!("report-here completed after view teardown; ignoring");
            return fix;
        }
        if let Some(position) = fix.coordinates() {
            self.map
                .fly_to(Some(position), self.map.config().focus_zoom)
                .await;
            self.map.place_pin(position).await;
        }
        fix
    }

    /// Submit the request form seeded by the temporary pin (if any). The pin
    /// is consumed only on success; a failed submit keeps it for retry.
    pub async fn submit_request(
        &self,
        dto: CreateHelpRequestDto,
    ) -> Result<HelpRequestResponse, AppError> {
        let _permit = self
            .submit_gate
            .try_begin()
            .ok_or_else(|| AppError::Busy("A submission is already in progress.".into()))?;
        dto.validate().map_err(AppError::InvalidInput)?;

        let coordinates = self.map.pinned().await;
        let pending = dto
            .into_pending(coordinates)
            .map_err(AppError::InvalidInput)?;
        let confirmed = self.request_gateway.create(pending).await?;
        self.map.take_pinned().await;
        Ok(HelpRequestResponse::from(&confirmed))
    }

    pub async fn delete_request(&self, id: &RecordId) -> Result<(), AppError> {
        self.request_gateway.delete(id).await
    }

    /// Tap on a list entry: fly to the request, or to the default region
    /// when it carries no coordinates.
    pub async fn focus_request(&self, id: &RecordId) {
        match self.requests.get(id).await {
            Some(request) => self.map.focus_record(&request).await,
            None => {
                self.map
                    .fly_to(None, self.map.config().fallback_zoom)
                    .await
            }
        }
    }

    pub async fn handle_map_click(&self, at: Coordinates) -> bool {
        self.map.handle_click(at).await
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.request_channel.refresh().await
    }

    /// Leaving the view: in-flight completions become no-ops immediately.
    pub fn detach(&self) {
        self.liveness.revoke();
    }
}

impl Drop for HomeHandler {
    fn drop(&mut self) {
        self.liveness.revoke();
        self.render_task.abort();
    }
}
