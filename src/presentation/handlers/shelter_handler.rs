use crate::application::services::{
    Liveness, LocationFix, LocationGate, MapController, MutationGateway, SubmitGate,
    SubscriptionHandle, SyncChannel,
};
use crate::domain::entities::{Shelter, ShelterStatus};
use crate::domain::value_objects::{Coordinates, RecordId};
use crate::infrastructure::store::EntityStore;
use crate::presentation::dto::Validate;
use crate::presentation::dto::shelter_dto::{CreateShelterDto, ShelterResponse};
use crate::shared::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// The shelters view: its own map with an add-shelter pin flow and a list
/// panel of the same records.
pub struct ShelterHandler {
    store: Arc<EntityStore<Shelter>>,
    gateway: Arc<MutationGateway<Shelter>>,
    channel: Arc<SyncChannel<Shelter>>,
    _subscription: SubscriptionHandle,
    map: Arc<MapController>,
    location: Arc<LocationGate>,
    submit_gate: SubmitGate,
    liveness: Liveness,
    render_task: JoinHandle<()>,
}

impl ShelterHandler {
    pub async fn attach(state: &AppState) -> Result<Self, AppError> {
        let subscription = state.shelter_channel.open().await?;
        let map = state.new_map_controller();

        let handler = Self {
            store: Arc::clone(&state.shelters),
            gateway: Arc::clone(&state.shelter_gateway),
            channel: Arc::clone(&state.shelter_channel),
            _subscription: subscription,
            map: Arc::clone(&map),
            location: Arc::clone(&state.location),
            submit_gate: SubmitGate::new(),
            liveness: Liveness::new(),
            render_task: Self::spawn_render_loop(Arc::clone(&state.shelters), map),
        };
        handler.map.render_shelters(&handler.store.snapshot().await).await;
        Ok(handler)
    }

    fn spawn_render_loop(
        store: Arc<EntityStore<Shelter>>,
        map: Arc<MapController>,
    ) -> JoinHandle<()> {
        use tokio::sync::broadcast::error::RecvError;

        let mut store_rx = store.subscribe();
        tokio::spawn(async move {
            loop {
                if matches!(store_rx.recv().await, Err(RecvError::Closed)) {
                    break;
                }
                map.render_shelters(&store.snapshot().await).await;
            }
        })
    }

    pub fn map(&self) -> &MapController {
        &self.map
    }

    /// Show the user's own position on the shelter map; absence is fine.
    pub async fn locate_user(&self) -> LocationFix {
        let fix = self.location.acquire().await;
        if !self.liveness.is_live() {
            debug!("locate_user completed after view teardown; ignoring");
            return fix;
        }
        self.map.render_user_position(fix.coordinates()).await;
        if let Some(position) = fix.coordinates() {
            self.map
                .pan_to(Some(position), self.map.config().fallback_zoom)
                .await;
        }
        fix
    }

    /// Toggle add-shelter mode; the next map click chooses the location.
    pub async fn enter_add_mode(&self) {
        self.map.enter_pin_mode().await;
    }

    pub async fn cancel_add_mode(&self) {
        self.map.cancel_pin_mode().await;
    }

    pub async fn handle_map_click(&self, at: Coordinates) -> bool {
        self.map.handle_click(at).await
    }

    /// Save the new shelter at the pinned location. Requires the pin: a
    /// shelter must sit somewhere on the map.
    pub async fn save_shelter(&self, dto: CreateShelterDto) -> Result<ShelterResponse, AppError> {
        let _permit = self
            .submit_gate
            .try_begin()
            .ok_or_else(|| AppError::Busy("A submission is already in progress.".into()))?;
        dto.validate().map_err(AppError::InvalidInput)?;
        let Some(coordinates) = self.map.pinned().await else {
            return Err(AppError::InvalidInput(
                "Please click on the map to choose a location for the new shelter.".into(),
            ));
        };

        let pending = dto
            .into_pending(coordinates)
            .map_err(AppError::InvalidInput)?;
        let confirmed = self.gateway.create(pending).await?;
        self.map.take_pinned().await;
        Ok(ShelterResponse::from(&confirmed))
    }

    pub async fn update_status(
        &self,
        id: &RecordId,
        status: ShelterStatus,
    ) -> Result<(), AppError> {
        self.gateway.update_status(id, status).await
    }

    /// Shelters newest-first for the side panel.
    pub async fn list(&self) -> Vec<ShelterResponse> {
        self.store
            .snapshot()
            .await
            .iter()
            .map(ShelterResponse::from)
            .collect()
    }

    pub async fn focus_shelter(&self, id: &RecordId) {
        match self.store.get(id).await {
            Some(shelter) => self.map.focus_record(&shelter).await,
            None => {
                self.map
                    .fly_to(None, self.map.config().fallback_zoom)
                    .await
            }
        }
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.channel.refresh().await
    }

    /// Leaving the view: in-flight completions become no-ops immediately.
    pub fn detach(&self) {
        self.liveness.revoke();
    }
}

impl Drop for ShelterHandler {
    fn drop(&mut self) {
        self.liveness.revoke();
        self.render_task.abort();
    }
}
