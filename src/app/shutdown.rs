use super::{ComponentState, DashboardOrchestrator};
use crate::dashboard::DashboardStats;
use crate::error::{DashboardError, Result};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, info, warn};

impl DashboardOrchestrator {
    /// Perform graceful shutdown of all components
    pub async fn shutdown(&mut self) -> Result<i32> {
        info!("Beginning graceful shutdown");

        self.cancellation_token.cancel();

        let mut exit_code = 0;

        if self.keyboard_enabled {
            if let Err(e) = self.stop_keyboard().await {
                error!("Error stopping keyboard: {}", e);
                exit_code = 1;
            }
        }

        match self.stop_dashboard().await {
            Ok(Some(stats)) => info!(
                "Dashboard stats: {} status changes, {} activations, {} notice checks, {} delivered, {} failed, {} suppressed",
                stats.status_changes,
                stats.activations,
                stats.notice_checks,
                stats.notices_delivered,
                stats.fetch_failures,
                stats.suppressed_completions
            ),
            Ok(None) => {}
            Err(e) => {
                error!("Error stopping dashboard: {}", e);
                exit_code = 1;
            }
        }

        if let Some(task) = self.command_task.take() {
            if timeout(Duration::from_secs(2), task).await.is_err() {
                error!("Command forwarder did not stop in time");
                exit_code = 1;
            }
        }
        self.set_component_state("commands", ComponentState::Stopped)
            .await;

        self.service.cancel();
        self.set_component_state("service", ComponentState::Stopped)
            .await;

        let failed = self.components_in(ComponentState::Failed).await;
        if !failed.is_empty() {
            warn!("Components failed during the run: {}", failed.join(", "));
            exit_code = 1;
        }

        info!("Graceful shutdown completed with exit code: {}", exit_code);
        Ok(exit_code)
    }

    async fn stop_keyboard(&self) -> Result<()> {
        self.set_component_state("keyboard", ComponentState::Stopping)
            .await;
        if let Some(keyboard_handler) = &self.keyboard_handler {
            keyboard_handler.stop().await?;
        }
        self.set_component_state("keyboard", ComponentState::Stopped)
            .await;
        Ok(())
    }

    /// Stop the controller task and collect its final statistics
    async fn stop_dashboard(&mut self) -> Result<Option<DashboardStats>> {
        let Some(task) = self.controller_task.take() else {
            return Ok(None);
        };

        info!("Stopping dashboard component");
        self.set_component_state("dashboard", ComponentState::Stopping)
            .await;

        match timeout(Duration::from_secs(5), task).await {
            Ok(Ok(Ok(stats))) => {
                self.set_component_state("dashboard", ComponentState::Stopped)
                    .await;
                info!("dashboard component stopped");
                Ok(Some(stats))
            }
            Ok(Ok(Err(e))) => {
                self.set_component_state("dashboard", ComponentState::Failed)
                    .await;
                Err(e)
            }
            Ok(Err(join_error)) => {
                self.set_component_state("dashboard", ComponentState::Failed)
                    .await;
                Err(DashboardError::component(
                    "dashboard".to_string(),
                    join_error.to_string(),
                ))
            }
            Err(_) => {
                self.set_component_state("dashboard", ComponentState::Failed)
                    .await;
                Err(DashboardError::System {
                    message: "dashboard component stop timeout".to_string(),
                })
            }
        }
    }
}
