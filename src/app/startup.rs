use super::{ComponentState, DashboardOrchestrator};
use crate::error::{DashboardError, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

impl DashboardOrchestrator {
    /// Register all components in their initial state
    pub async fn initialize(&mut self) -> Result<()> {
        info!("Initializing dashboard components");

        let mut states = self.component_states.lock().await;
        states.insert("service".to_string(), ComponentState::Stopped);
        states.insert("dashboard".to_string(), ComponentState::Stopped);
        states.insert("commands".to_string(), ComponentState::Stopped);

        if self.keyboard_enabled {
            states.insert("keyboard".to_string(), ComponentState::Stopped);
        }

        drop(states);

        info!("All components initialized successfully");
        Ok(())
    }

    /// Start the dashboard, the command forwarder and optional keyboard input
    pub async fn start(&mut self) -> Result<()> {
        info!("Starting dashboard");

        self.set_component_state("service", ComponentState::Running)
            .await;

        // Dashboard controller
        self.set_component_state("dashboard", ComponentState::Starting)
            .await;

        let mut controller = self
            .controller
            .take()
            .ok_or_else(|| DashboardError::system("Dashboard controller already started"))?;
        let presses = self
            .press_receiver
            .take()
            .ok_or_else(|| DashboardError::system("Action press receiver already taken"))?;

        // Subscribe before attaching so no status published in between is missed
        let receiver = self.status_source.subscribe("dashboard");
        controller.attach(self.status_source.current());

        self.controller_task = Some(tokio::spawn(controller.run(
            receiver,
            presses,
            self.command_sender.clone(),
            self.cancellation_token.child_token(),
        )));

        self.set_component_state("dashboard", ComponentState::Running)
            .await;
        info!("Dashboard controller started");

        // Service command forwarder
        let mut commands = self
            .command_receiver
            .take()
            .ok_or_else(|| DashboardError::system("Command receiver already taken"))?;
        let service = Arc::clone(&self.service);
        let token = self.cancellation_token.child_token();

        self.command_task = Some(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    command = commands.recv() => match command {
                        Some(command) => {
                            if let Err(e) = service.handle(command) {
                                warn!("Service rejected {:?}: {}", command, e);
                            }
                        }
                        None => break,
                    },
                }
            }
        }));
        self.set_component_state("commands", ComponentState::Running)
            .await;

        // Keyboard input
        if self.keyboard_enabled {
            if let Some(keyboard_handler) = &self.keyboard_handler {
                self.set_component_state("keyboard", ComponentState::Starting)
                    .await;
                if let Err(e) = keyboard_handler.start().await {
                    error!("Failed to start keyboard input handler: {}", e);
                    self.set_component_state("keyboard", ComponentState::Failed)
                        .await;
                } else {
                    self.set_component_state("keyboard", ComponentState::Running)
                        .await;
                }
            }
        }

        info!("Dashboard started successfully");
        Ok(())
    }
}
