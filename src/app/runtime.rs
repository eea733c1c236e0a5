use super::{DashboardOrchestrator, ShutdownReason};
use crate::dashboard::DashboardStats;
use crate::error::{DashboardError, Result};
use crate::status::LifecycleStatus;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{info, warn};

impl DashboardOrchestrator {
    /// Run until a shutdown is requested, then shut down gracefully
    pub async fn run(&mut self) -> Result<i32> {
        info!("Dashboard is running");

        let mut shutdown_receiver =
            self.shutdown_receiver
                .take()
                .ok_or_else(|| DashboardError::System {
                    message: "Shutdown receiver already taken".to_string(),
                })?;

        self.setup_signal_handlers(self.shutdown_sender.clone());

        let shutdown_reason = shutdown_receiver.recv().await.ok_or_else(|| {
            DashboardError::System {
                message: "Shutdown channel closed unexpectedly".to_string(),
            }
        })?;

        info!("Shutdown initiated: {:?}", shutdown_reason);

        let exit_code = self.shutdown().await?.max(shutdown_reason.exit_code());

        info!("Dashboard shutdown complete");
        Ok(exit_code)
    }

    /// Set up signal handlers for graceful shutdown
    fn setup_signal_handlers(&self, shutdown_sender: mpsc::UnboundedSender<ShutdownReason>) {
        // Handle SIGTERM - Unix only
        #[cfg(unix)]
        {
            let shutdown_sender_sigterm = shutdown_sender.clone();
            tokio::spawn(async move {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        if sigterm.recv().await.is_some() {
                            info!("Received SIGTERM signal");
                            let _ = shutdown_sender_sigterm
                                .send(ShutdownReason::Signal("SIGTERM".to_string()));
                        }
                    }
                    Err(e) => warn!("Failed to register SIGTERM handler: {}", e),
                }
            });
        }

        // Handle SIGINT (Ctrl+C) - Cross-platform
        tokio::spawn(async move {
            if let Ok(()) = signal::ctrl_c().await {
                info!("Received SIGINT signal (Ctrl+C)");
                let _ = shutdown_sender.send(ShutdownReason::Signal("SIGINT".to_string()));
            }
        });
    }

    /// Feed a fixed list of statuses straight through the dashboard.
    ///
    /// Runs the controller inline instead of on its own task, waits for the
    /// notice checks it triggers and returns the resulting statistics.
    pub async fn replay(&mut self, statuses: &[LifecycleStatus]) -> Result<DashboardStats> {
        let mut controller = self
            .controller
            .take()
            .ok_or_else(|| DashboardError::system("Dashboard controller already started"))?;

        info!("Replaying {} statuses", statuses.len());
        controller.attach(self.status_source.current());

        for status in statuses {
            self.status_source.publish(*status);
            controller.on_status(*status);
        }

        controller.settle().await;
        controller.tear_down();

        let stats = controller.stats();
        info!(
            "Replay finished: {} activations, {} notice checks, {} failures",
            stats.activations, stats.notice_checks, stats.fetch_failures
        );

        info!("Shutdown initiated: {:?}", ShutdownReason::ScriptFinished);
        self.shutdown().await?;
        Ok(stats)
    }
}
