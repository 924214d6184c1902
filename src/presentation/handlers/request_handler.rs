use crate::application::services::{
    Liveness, LocationGate, MutationGateway, SubmitGate, SubscriptionHandle, SyncChannel,
};
use crate::domain::entities::{HelpRequest, Urgency};
use crate::domain::value_objects::RecordId;
use crate::infrastructure::store::EntityStore;
use crate::presentation::dto::Validate;
use crate::presentation::dto::request_dto::{CreateHelpRequestDto, HelpRequestResponse};
use crate::shared::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// The needs-and-requests board view.
///
/// Owns the view-scoped state: the change subscription, the submit gate and
/// the urgency filter. Everything is torn down with the handler.
pub struct RequestBoardHandler {
    store: Arc<EntityStore<HelpRequest>>,
    gateway: Arc<MutationGateway<HelpRequest>>,
    channel: Arc<SyncChannel<HelpRequest>>,
    _subscription: SubscriptionHandle,
    location: Arc<LocationGate>,
    submit_gate: SubmitGate,
    liveness: Liveness,
    filter: RwLock<Option<Urgency>>,
}

impl RequestBoardHandler {
    pub async fn attach(state: &AppState) -> Result<Self, AppError> {
        let subscription = state.request_channel.open().await?;
        Ok(Self {
            store: Arc::clone(&state.requests),
            gateway: Arc::clone(&state.request_gateway),
            channel: Arc::clone(&state.request_channel),
            _subscription: subscription,
            location: Arc::clone(&state.location),
            submit_gate: SubmitGate::new(),
            liveness: Liveness::new(),
            filter: RwLock::new(None),
        })
    }

    /// Submit the form. The device position is acquired with a bounded wait;
    /// absence never blocks the submission. Returns `Ok(None)` when the view
    /// was torn down while the acquisition was in flight; the late
    /// completion is a no-op.
    pub async fn submit(
        &self,
        dto: CreateHelpRequestDto,
    ) -> Result<Option<HelpRequestResponse>, AppError> {
        let _permit = self
            .submit_gate
            .try_begin()
            .ok_or_else(|| AppError::Busy("A submission is already in progress.".into()))?;
        dto.validate().map_err(AppError::InvalidInput)?;

        let fix = self.location.acquire().await;
        if !self.liveness.is_live() {
            debug!("request submit completed after view teardown; ignoring");
            return Ok(None);
        }

        let pending = dto
            .into_pending(fix.coordinates())
            .map_err(AppError::InvalidInput)?;
        let confirmed = self.gateway.create(pending).await?;
        Ok(Some(HelpRequestResponse::from(&confirmed)))
    }

    pub async fn set_urgency_filter(&self, urgency: Option<Urgency>) {
        *self.filter.write().await = urgency;
    }

    /// Requests newest-first, honoring the urgency filter.
    pub async fn list(&self) -> Vec<HelpRequestResponse> {
        let filter = *self.filter.read().await;
        self.store
            .snapshot()
            .await
            .iter()
            .filter(|request| filter.is_none_or(|urgency| request.urgency == urgency))
            .map(HelpRequestResponse::from)
            .collect()
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), AppError> {
        self.gateway.delete(id).await
    }

    /// Full re-fetch; the remedy after a lost subscription.
    pub async fn refresh(&self) -> Result<(), AppError> {
        self.channel.refresh().await
    }

    /// Leaving the view: in-flight completions become no-ops immediately,
    /// before the handler itself is dropped.
    pub fn detach(&self) {
        self.liveness.revoke();
    }
}

impl Drop for RequestBoardHandler {
    fn drop(&mut self) {
        self.liveness.revoke();
    }
}
