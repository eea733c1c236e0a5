use super::types::{ComponentState, ShutdownReason};
use crate::config::DashboardConfig;
use crate::dashboard::{DashboardController, DashboardStats};
use crate::error::Result;
use crate::keyboard_input::KeyboardInputHandler;
use crate::notices::{FileNoticeClient, NoticeClient, NoticePresenter, TracingNoticePresenter};
use crate::service::ServiceSimulator;
use crate::status_source::StatusSource;
use crate::view::{ServiceCommand, TracingViewBinder, ViewBinder};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Wires the status source, simulated service and dashboard controller together
pub struct DashboardOrchestrator {
    pub(super) config: DashboardConfig,
    pub(super) status_source: StatusSource,
    pub(super) service: Arc<ServiceSimulator>,

    // Components
    pub(super) controller: Option<DashboardController>,
    pub(super) controller_task: Option<JoinHandle<Result<DashboardStats>>>,
    pub(super) command_task: Option<JoinHandle<()>>,
    pub(super) keyboard_handler: Option<KeyboardInputHandler>,
    pub(super) keyboard_enabled: bool,

    // Action button plumbing between input, controller and service
    pub(super) press_sender: mpsc::UnboundedSender<()>,
    pub(super) press_receiver: Option<mpsc::UnboundedReceiver<()>>,
    pub(super) command_sender: mpsc::UnboundedSender<ServiceCommand>,
    pub(super) command_receiver: Option<mpsc::UnboundedReceiver<ServiceCommand>>,

    // Lifecycle management
    pub(super) component_states: Arc<Mutex<HashMap<String, ComponentState>>>,
    pub(super) shutdown_sender: mpsc::UnboundedSender<ShutdownReason>,
    pub(super) shutdown_receiver: Option<mpsc::UnboundedReceiver<ShutdownReason>>,
    pub(super) cancellation_token: CancellationToken,
}

impl DashboardOrchestrator {
    /// Create an orchestrator with the file notice client and logging sinks
    pub async fn new(config: DashboardConfig) -> Result<Self> {
        let notice_client = Arc::new(FileNoticeClient::new(&config.notices.source_path));
        let presenter = Arc::new(TracingNoticePresenter::new(config.notices.presentation));
        let binder = Arc::new(TracingViewBinder::new());

        Self::with_components(config, notice_client, binder, presenter).await
    }

    /// Create an orchestrator around caller-supplied collaborators
    pub async fn with_components(
        config: DashboardConfig,
        notice_client: Arc<dyn NoticeClient>,
        binder: Arc<dyn ViewBinder>,
        presenter: Arc<dyn NoticePresenter>,
    ) -> Result<Self> {
        config.validate()?;
        let initial_status = config.initial_status()?;

        let status_source = StatusSource::new(config.system.status_channel_capacity, initial_status);
        let service = Arc::new(ServiceSimulator::new(
            status_source.clone(),
            &config.service,
        ));

        let controller = DashboardController::builder()
            .with_config(&config)
            .with_notice_client(notice_client)
            .with_view_binder(binder)
            .with_presenter(presenter)
            .build()?;

        let (press_sender, press_receiver) = mpsc::unbounded_channel();
        let (command_sender, command_receiver) = mpsc::unbounded_channel();
        let (shutdown_sender, shutdown_receiver) = mpsc::unbounded_channel();

        let keyboard_handler = Some(KeyboardInputHandler::new(
            press_sender.clone(),
            shutdown_sender.clone(),
        ));

        info!("Dashboard created with initial status {}", initial_status);

        Ok(Self {
            config,
            status_source,
            service,
            controller: Some(controller),
            controller_task: None,
            command_task: None,
            keyboard_handler,
            keyboard_enabled: false, // Enable via set_keyboard_enabled()
            press_sender,
            press_receiver: Some(press_receiver),
            command_sender,
            command_receiver: Some(command_receiver),
            component_states: Arc::new(Mutex::new(HashMap::new())),
            shutdown_sender,
            shutdown_receiver: Some(shutdown_receiver),
            cancellation_token: CancellationToken::new(),
        })
    }

    /// Enable or disable the keyboard input handler
    pub fn set_keyboard_enabled(&mut self, enabled: bool) {
        self.keyboard_enabled = enabled;
    }

    /// Status source the dashboard observes
    pub fn status_source(&self) -> &StatusSource {
        &self.status_source
    }

    /// Simulate a press of the action button
    pub fn press_action(&self) -> bool {
        self.press_sender.send(()).is_ok()
    }

    /// Request shutdown from code
    pub fn request_shutdown(&self, reason: ShutdownReason) {
        let _ = self.shutdown_sender.send(reason);
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}
