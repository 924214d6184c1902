use crate::application::ports::position_provider::{AcquireOptions, PositionProvider};
use crate::domain::value_objects::Coordinates;
use crate::shared::config::LocationConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Outcome of a position acquisition. Absence (denied, timed out, no
/// capability) is a resolved result, not an error: submissions proceed
/// without coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationFix {
    Position(Coordinates),
    Absent,
}

impl LocationFix {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationFix::Position(coordinates) => Some(*coordinates),
            LocationFix::Absent => None,
        }
    }
}

/// Best-effort device position with a hard wall-clock bound.
///
/// Shared by "tag my submission" and "recenter the map on me"; the two
/// consumers differ only in what they do with a fix.
pub struct LocationGate {
    provider: Arc<dyn PositionProvider>,
    options: AcquireOptions,
}

impl LocationGate {
    pub fn new(provider: Arc<dyn PositionProvider>, config: &LocationConfig) -> Self {
        Self {
            provider,
            options: AcquireOptions {
                high_accuracy: config.high_accuracy,
                timeout: Duration::from_millis(config.timeout_ms),
                max_age: Duration::from_millis(config.max_age_ms),
            },
        }
    }

    pub async fn acquire(&self) -> LocationFix {
        self.acquire_with(self.options).await
    }

    pub async fn acquire_with(&self, options: AcquireOptions) -> LocationFix {
        match timeout(options.timeout, self.provider.current_position(&options)).await {
            Ok(Ok(position)) => LocationFix::Position(position),
            Ok(Err(err)) => {
                debug!("position unavailable: {err}");
                LocationFix::Absent
            }
            Err(_) => {
                debug!("position acquisition timed out after {:?}", options.timeout);
                LocationFix::Absent
            }
        }
    }
}

/// View-lifetime flag. A completion (e.g. a late geolocation callback) that
/// lands after the owning view revoked its token must become a no-op.
#[derive(Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps one submit action from firing twice while its acquisition or
/// remote call is still pending. Independent acquisitions are not
/// deduplicated; only the same action is gated.
pub struct SubmitGate {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one submission; releases the gate on drop,
/// whichever way the submission ends.
pub struct SubmitPermit {
    busy: Arc<AtomicBool>,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self {
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn try_begin(&self) -> Option<SubmitPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Default for SubmitGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SubmitPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
