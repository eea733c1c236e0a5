use crate::config::ServiceConfig;
use crate::error::{DashboardError, Result};
use crate::status::LifecycleStatus;
use crate::status_source::StatusSource;
use crate::view::ServiceCommand;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

/// Stand-in for the connection service, for running the dashboard without one.
///
/// Walks through the intermediate status with a configurable delay and
/// reports every step on the status source.
pub struct ServiceSimulator {
    source: StatusSource,
    start_delay: Duration,
    stop_delay: Duration,
    transition: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceSimulator {
    pub fn new(source: StatusSource, config: &ServiceConfig) -> Self {
        Self {
            source,
            start_delay: Duration::from_millis(config.start_delay_ms),
            stop_delay: Duration::from_millis(config.stop_delay_ms),
            transition: Mutex::new(None),
        }
    }

    /// Carry out a command from the dashboard's action button
    pub fn handle(&self, command: ServiceCommand) -> Result<()> {
        match command {
            ServiceCommand::Start => self.start(),
            ServiceCommand::Stop => self.stop(),
        }
    }

    /// Begin connecting; only valid while stopped
    pub fn start(&self) -> Result<()> {
        let current = self.source.current();
        if current != LifecycleStatus::Stopped {
            return Err(DashboardError::component(
                "service".to_string(),
                format!("cannot start while {}", current),
            ));
        }

        info!("Starting service");
        self.transition_through(
            LifecycleStatus::Starting,
            LifecycleStatus::Started,
            self.start_delay,
        );
        Ok(())
    }

    /// Begin disconnecting; only valid while started
    pub fn stop(&self) -> Result<()> {
        let current = self.source.current();
        if current != LifecycleStatus::Started {
            return Err(DashboardError::component(
                "service".to_string(),
                format!("cannot stop while {}", current),
            ));
        }

        info!("Stopping service");
        self.transition_through(
            LifecycleStatus::Stopping,
            LifecycleStatus::Stopped,
            self.stop_delay,
        );
        Ok(())
    }

    fn transition_through(
        &self,
        intermediate: LifecycleStatus,
        target: LifecycleStatus,
        delay: Duration,
    ) {
        self.source.publish(intermediate);

        let source = self.source.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            debug!("Service reached {}", target);
            source.publish(target);
        });

        if let Some(previous) = self.transition.lock().replace(task) {
            previous.abort();
        }
    }

    /// Abandon any transition in progress
    pub fn cancel(&self) {
        if let Some(task) = self.transition.lock().take() {
            task.abort();
        }
    }

    pub fn status(&self) -> LifecycleStatus {
        self.source.current()
    }
}

impl Drop for ServiceSimulator {
    fn drop(&mut self) {
        self.cancel();
    }
}
