use crate::application::services::{
    Liveness, LocationGate, MutationGateway, SubmitGate, SubscriptionHandle, SyncChannel,
};
use crate::domain::entities::{FamilyPost, PersonStatus};
use crate::domain::value_objects::RecordId;
use crate::infrastructure::store::EntityStore;
use crate::presentation::dto::Validate;
use crate::presentation::dto::family_dto::{CreateFamilyPostDto, FamilyPostResponse};
use crate::shared::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default, Clone)]
struct BoardFilter {
    search: String,
    status: Option<PersonStatus>,
}

/// The family-locator board: post, search, filter, update status.
pub struct FamilyLocatorHandler {
    store: Arc<EntityStore<FamilyPost>>,
    gateway: Arc<MutationGateway<FamilyPost>>,
    channel: Arc<SyncChannel<FamilyPost>>,
    _subscription: SubscriptionHandle,
    location: Arc<LocationGate>,
    submit_gate: SubmitGate,
    liveness: Liveness,
    filter: RwLock<BoardFilter>,
}

impl FamilyLocatorHandler {
    pub async fn attach(state: &AppState) -> Result<Self, AppError> {
        let subscription = state.family_channel.open().await?;
        Ok(Self {
            store: Arc::clone(&state.family_posts),
            gateway: Arc::clone(&state.family_gateway),
            channel: Arc::clone(&state.family_channel),
            _subscription: subscription,
            location: Arc::clone(&state.location),
            submit_gate: SubmitGate::new(),
            liveness: Liveness::new(),
            filter: RwLock::new(BoardFilter::default()),
        })
    }

    /// Post a report. The position is acquired at submit time with a bounded
    /// wait; a denied or timed-out acquisition posts without coordinates.
    /// `Ok(None)` means the view was torn down mid-acquisition.
    pub async fn submit(
        &self,
        dto: CreateFamilyPostDto,
    ) -> Result<Option<FamilyPostResponse>, AppError> {
        let _permit = self
            .submit_gate
            .try_begin()
            .ok_or_else(|| AppError::Busy("A submission is already in progress.".into()))?;
        dto.validate().map_err(AppError::InvalidInput)?;

        let fix = self.location.acquire().await;
        if !self.liveness.is_live() {
            debug!("family post submit completed after view teardown; ignoring");
            return Ok(None);
        }

        let pending = dto
            .into_pending(fix.coordinates())
            .map_err(AppError::InvalidInput)?;
        let confirmed = self.gateway.create(pending).await?;
        Ok(Some(FamilyPostResponse::from(&confirmed)))
    }

    pub async fn update_status(&self, id: &RecordId, status: PersonStatus) -> Result<(), AppError> {
        self.gateway.update_status(id, status).await
    }

    pub async fn set_search(&self, query: impl Into<String>) {
        self.filter.write().await.search = query.into();
    }

    pub async fn set_status_filter(&self, status: Option<PersonStatus>) {
        self.filter.write().await.status = status;
    }

    /// Posts newest-first, matching the search text and status filter.
    pub async fn list(&self) -> Vec<FamilyPostResponse> {
        let filter = self.filter.read().await.clone();
        self.store
            .snapshot()
            .await
            .iter()
            .filter(|post| post.matches_search(&filter.search))
            .filter(|post| filter.status.is_none_or(|status| post.status == status))
            .map(FamilyPostResponse::from)
            .collect()
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        self.channel.refresh().await
    }

    /// Leaving the view: in-flight completions become no-ops immediately.
    pub fn detach(&self) {
        self.liveness.revoke();
    }
}

impl Drop for FamilyLocatorHandler {
    fn drop(&mut self) {
        self.liveness.revoke();
    }
}
