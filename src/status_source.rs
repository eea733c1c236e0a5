use crate::error::DashboardError;
use crate::status::LifecycleStatus;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Broadcasts lifecycle status changes and remembers the last value
pub struct StatusSource {
    sender: broadcast::Sender<LifecycleStatus>,
    current: Arc<RwLock<(LifecycleStatus, DateTime<Utc>)>>,
}

impl StatusSource {
    /// Create a status source with the given channel capacity and initial value
    pub fn new(capacity: usize, initial: LifecycleStatus) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            current: Arc::new(RwLock::new((initial, Utc::now()))),
        }
    }

    /// Record a new status and notify every subscriber.
    ///
    /// Repeated values are delivered too; observers decide what a repeat means.
    pub fn publish(&self, status: LifecycleStatus) -> usize {
        {
            let mut current = self.current.write();
            if current.0 != status {
                info!("Service status changed: {} -> {}", current.0, status);
            } else {
                debug!("Service status re-reported: {}", status);
            }
            *current = (status, Utc::now());
        }

        // No subscribers is not an error for a status source
        self.sender.send(status).unwrap_or(0)
    }

    /// Last published status
    pub fn current(&self) -> LifecycleStatus {
        self.current.read().0
    }

    /// When the last status was published
    pub fn last_changed(&self) -> DateTime<Utc> {
        self.current.read().1
    }

    /// Subscribe and get a receiver
    pub fn subscribe(&self, name: &str) -> StatusReceiver {
        StatusReceiver {
            receiver: self.sender.subscribe(),
            current: Arc::clone(&self.current),
            name: name.to_string(),
        }
    }

    /// Invoke `callback` for every status published from now on.
    ///
    /// The callback runs on a spawned task until the returned handle is
    /// unsubscribed or dropped.
    pub fn observe<F>(&self, name: &str, mut callback: F) -> Subscription
    where
        F: FnMut(LifecycleStatus) + Send + 'static,
    {
        let mut receiver = self.subscribe(name);
        let token = CancellationToken::new();
        let task_token = token.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    next = receiver.recv() => match next {
                        Ok(status) => callback(status),
                        Err(_) => break,
                    },
                }
            }
            debug!("Status observer '{}' exited", receiver.name);
        });

        Subscription {
            token,
            task: Some(task),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn has_subscribers(&self) -> bool {
        self.sender.receiver_count() > 0
    }
}

impl Clone for StatusSource {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            current: Arc::clone(&self.current),
        }
    }
}

/// Named receiver for status changes
pub struct StatusReceiver {
    receiver: broadcast::Receiver<LifecycleStatus>,
    current: Arc<RwLock<(LifecycleStatus, DateTime<Utc>)>>,
    name: String,
}

impl StatusReceiver {
    /// Receive the next status.
    ///
    /// A lagging receiver skips ahead to the latest value instead of failing.
    pub async fn recv(&mut self) -> Result<LifecycleStatus, DashboardError> {
        match self.receiver.recv().await {
            Ok(status) => {
                debug!("Receiver '{}' received status: {}", self.name, status);
                Ok(status)
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                let latest = self.current.read().0;
                warn!(
                    "Receiver '{}' lagged behind by {} statuses, resuming at {}",
                    self.name, n, latest
                );
                self.receiver = self.receiver.resubscribe();
                Ok(latest)
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Status source closed for receiver '{}'", self.name);
                Err(DashboardError::StatusChannel {
                    details: "status source closed".to_string(),
                })
            }
        }
    }

    /// Try to receive a status without waiting
    pub fn try_recv(&mut self) -> Result<Option<LifecycleStatus>, DashboardError> {
        match self.receiver.try_recv() {
            Ok(status) => Ok(Some(status)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                warn!("Receiver '{}' lagged behind by {} statuses", self.name, n);
                self.receiver = self.receiver.resubscribe();
                Ok(Some(self.current.read().0))
            }
            Err(broadcast::error::TryRecvError::Closed) => Err(DashboardError::StatusChannel {
                details: "status source closed".to_string(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle returned by [`StatusSource::observe`]; dropping it unsubscribes
pub struct Subscription {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop delivering statuses and wait for the observer task to finish
    pub async fn unsubscribe(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
