use super::client::{NoticeClient, NoticeStream};
use crate::error::NoticeFetchError;
use crate::status::LifecycleStatus;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of one notice check, sent back to the rendering context
#[derive(Debug)]
pub struct NoticeOutcome {
    pub check_id: Uuid,
    pub activation: u64,
    pub result: Result<NoticeStream, NoticeFetchError>,
}

/// Runs the deprecation notice check at most once per activation.
///
/// The flag is claimed with compare-and-set before the fetch is spawned, so two
/// `Started` observations racing each other dispatch a single fetch.
pub struct NoticeCheckGuard {
    client: Arc<dyn NoticeClient>,
    already_checked: AtomicBool,
    activations: AtomicU64,
    completions: mpsc::UnboundedSender<NoticeOutcome>,
    teardown: CancellationToken,
    suppressed: Arc<AtomicU64>,
}

impl NoticeCheckGuard {
    pub fn new(
        client: Arc<dyn NoticeClient>,
        completions: mpsc::UnboundedSender<NoticeOutcome>,
        teardown: CancellationToken,
    ) -> Self {
        Self {
            client,
            already_checked: AtomicBool::new(false),
            activations: AtomicU64::new(0),
            completions,
            teardown,
            suppressed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Feed an observed status; returns the fetch task when one was dispatched.
    ///
    /// Must be called from within a tokio runtime. Never blocks.
    pub fn on_status_observed(&self, status: LifecycleStatus) -> Option<JoinHandle<()>> {
        if !status.is_started() {
            if self.already_checked.swap(false, Ordering::AcqRel) {
                debug!("Notice check re-armed on {}", status);
            }
            return None;
        }

        if self
            .already_checked
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Notice check already dispatched for this activation");
            return None;
        }

        if self.teardown.is_cancelled() {
            debug!("Dashboard torn down, skipping notice check");
            return None;
        }

        let activation = self.activations.fetch_add(1, Ordering::AcqRel) + 1;
        let check_id = Uuid::new_v4();
        info!("Checking deprecation notices (activation {}, check {})", activation, check_id);

        let client = Arc::clone(&self.client);
        let completions = self.completions.clone();
        let teardown = self.teardown.clone();
        let suppressed = Arc::clone(&self.suppressed);

        Some(tokio::spawn(async move {
            let result = match client.fetch_deprecated_notices().await {
                Ok(mut notices) => {
                    if !notices.has_next() {
                        debug!("No deprecation notices (check {})", check_id);
                        return;
                    }
                    Ok(notices)
                }
                Err(e) => {
                    warn!("Notice check {} failed: {}", check_id, e);
                    Err(e)
                }
            };

            if teardown.is_cancelled() {
                debug!("Dropping notice check {} result after teardown", check_id);
                suppressed.fetch_add(1, Ordering::Relaxed);
                return;
            }

            let outcome = NoticeOutcome {
                check_id,
                activation,
                result,
            };
            if completions.send(outcome).is_err() {
                debug!("Dashboard gone, dropping notice check {} result", check_id);
                suppressed.fetch_add(1, Ordering::Relaxed);
            }
        }))
    }

    /// True when the next `Started` observation will dispatch a check
    pub fn is_armed(&self) -> bool {
        !self.already_checked.load(Ordering::Acquire)
    }

    /// Number of checks dispatched so far
    pub fn activations(&self) -> u64 {
        self.activations.load(Ordering::Acquire)
    }

    /// Results dropped because the dashboard was gone when they arrived
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    pub(crate) fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }
}
