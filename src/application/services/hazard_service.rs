use crate::application::ports::hazard_feed::{CycloneFeed, SeismicFeed};
use crate::infrastructure::store::HazardOverlay;
use crate::shared::config::FeedConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Owns the two polling loops; dropping it stops both.
pub struct PollerHandle {
    tasks: [JoinHandle<()>; 2],
}

impl PollerHandle {
    pub fn is_active(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    pub fn stop(self) {
        // Drop does the work.
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        debug!("hazard polling stopped");
    }
}

/// Keeps the hazard overlay fresh: two independent fixed-cadence loops, one
/// per feed, each replacing its snapshot wholesale on success. A failed
/// fetch keeps the previous snapshot: stale but available.
pub struct HazardPoller {
    seismic: Arc<dyn SeismicFeed>,
    cyclones: Arc<dyn CycloneFeed>,
    overlay: Arc<HazardOverlay>,
    interval: Duration,
}

impl HazardPoller {
    pub fn new(
        seismic: Arc<dyn SeismicFeed>,
        cyclones: Arc<dyn CycloneFeed>,
        overlay: Arc<HazardOverlay>,
        config: &FeedConfig,
    ) -> Self {
        Self {
            seismic,
            cyclones,
            overlay,
            interval: Duration::from_secs(config.poll_interval_secs),
        }
    }

    /// Start both loops. The first cycle runs immediately.
    pub fn start(&self) -> PollerHandle {
        let seismic = Arc::clone(&self.seismic);
        let overlay = Arc::clone(&self.overlay);
        let interval = self.interval;
        let seismic_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                Self::seismic_cycle(&*seismic, &overlay).await;
            }
        });

        let cyclones = Arc::clone(&self.cyclones);
        let overlay = Arc::clone(&self.overlay);
        let cyclone_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                Self::cyclone_cycle(&*cyclones, &overlay).await;
            }
        });

        PollerHandle {
            tasks: [seismic_task, cyclone_task],
        }
    }

    async fn seismic_cycle(feed: &dyn SeismicFeed, overlay: &HazardOverlay) {
        match feed.fetch().await {
            Ok(events) => {
                debug!(count = events.len(), "seismic snapshot replaced");
                overlay.replace_seismic(events).await;
            }
            Err(err) => {
                warn!("seismic feed fetch failed, keeping previous snapshot: {err}");
            }
        }
    }

    async fn cyclone_cycle(feed: &dyn CycloneFeed, overlay: &HazardOverlay) {
        match feed.fetch().await {
            Ok(tracks) => {
                debug!(count = tracks.len(), "cyclone snapshot replaced");
                overlay.replace_cyclones(tracks).await;
            }
            Err(err) => {
                warn!("cyclone feed fetch failed, keeping previous snapshot: {err}");
            }
        }
    }
}
