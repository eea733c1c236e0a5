use super::stats::DashboardStats;
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::notices::{NoticeCheckGuard, NoticeClient, NoticeOutcome, NoticePresenter};
use crate::status::LifecycleStatus;
use crate::status_source::StatusReceiver;
use crate::view::{action_for, derive, Effect, ServiceCommand, ViewBinder};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Presentation-state controller for the connection dashboard.
///
/// Everything here runs on one task, the dashboard's rendering context. Notice
/// fetches run elsewhere and come back through the completion channel.
pub struct DashboardController {
    binder: Arc<dyn ViewBinder>,
    presenter: Arc<dyn NoticePresenter>,
    guard: NoticeCheckGuard,
    completions: mpsc::UnboundedReceiver<NoticeOutcome>,
    in_flight: Vec<JoinHandle<()>>,
    last_status: Option<LifecycleStatus>,
    notices_enabled: bool,
    pager_start_disabled: bool,
    teardown: CancellationToken,
    stats: DashboardStats,
}

impl DashboardController {
    pub fn builder() -> DashboardControllerBuilder {
        DashboardControllerBuilder::new()
    }

    /// Bind to the view: set the initial pager state and show `current`
    pub fn attach(&mut self, current: LifecycleStatus) {
        info!("Attaching dashboard at status {}", current);
        if self.pager_start_disabled {
            self.apply_effect(Effect::DisablePager, current, false);
        }
        self.on_status(current);
    }

    /// Apply a newly observed status
    pub fn on_status(&mut self, status: LifecycleStatus) {
        if self.teardown.is_cancelled() {
            debug!("Ignoring status {} after teardown", status);
            return;
        }

        self.stats.record_status_change();
        self.in_flight.retain(|task| !task.is_finished());

        let transition = derive(status);
        let entering = status.is_started() && self.last_status != Some(status);
        debug!("Status {} -> {:?}", status, transition.descriptor);

        self.binder.apply_view_state(&transition.descriptor);

        for effect in &transition.effects {
            self.apply_effect(*effect, status, entering);
        }

        // Non-started statuses re-arm the guard
        if self.notices_enabled && !transition.has_effect(Effect::CheckNotices) {
            self.guard.on_status_observed(status);
        }

        if entering {
            self.stats.record_activation();
        }
        self.last_status = Some(status);
    }

    fn apply_effect(&mut self, effect: Effect, status: LifecycleStatus, entering: bool) {
        match effect {
            Effect::CheckNotices => {
                if !self.notices_enabled {
                    return;
                }
                if let Some(task) = self.guard.on_status_observed(status) {
                    self.stats.record_notice_check();
                    self.in_flight.push(task);
                }
            }
            Effect::EnablePager => {
                if entering {
                    self.binder.set_pager_visible(true);
                    self.stats.record_pager_enabled();
                }
            }
            Effect::DisablePager => self.binder.set_pager_visible(false),
        }
    }

    /// Handle a press of the action button.
    ///
    /// Returns the command to send to the service, if any.
    pub fn press_action(&mut self) -> Option<ServiceCommand> {
        let current = self.last_status.unwrap_or_default();
        let command = action_for(current);

        match command {
            Some(ServiceCommand::Start) => {
                info!("Connect requested");
                self.binder.set_action_enabled(false);
            }
            Some(ServiceCommand::Stop) => info!("Disconnect requested"),
            None => debug!("Action pressed while {}, ignoring", current),
        }

        command
    }

    /// Route a finished notice check to the presenter
    pub fn on_completion(&mut self, outcome: NoticeOutcome) {
        if self.teardown.is_cancelled() {
            debug!("Discarding notice check {} after teardown", outcome.check_id);
            self.guard.record_suppressed();
            return;
        }

        match outcome.result {
            Ok(notices) => {
                info!(
                    "Delivering deprecation notices (activation {})",
                    outcome.activation
                );
                self.stats.record_notices_delivered();
                self.presenter.show_notices(notices);
            }
            Err(e) => {
                self.stats.record_fetch_failure();
                self.presenter.show_error(&e);
            }
        }
    }

    /// Wait for in-flight notice checks and apply whatever they produced
    pub async fn settle(&mut self) {
        let tasks: Vec<_> = self.in_flight.drain(..).collect();
        for task in tasks {
            if let Err(e) = task.await {
                warn!("Notice check task failed: {}", e);
            }
        }

        while let Ok(outcome) = self.completions.try_recv() {
            self.on_completion(outcome);
        }
    }

    /// Drive the controller until shutdown.
    ///
    /// Status changes, action presses and notice completions are all handled
    /// here, one at a time. Commands produced by presses go out on `commands`.
    pub async fn run(
        mut self,
        mut receiver: StatusReceiver,
        mut presses: mpsc::UnboundedReceiver<()>,
        commands: mpsc::UnboundedSender<ServiceCommand>,
        shutdown: CancellationToken,
    ) -> Result<DashboardStats> {
        info!("Dashboard controller running");

        let result = loop {
            tokio::select! {
                _ = shutdown.cancelled() => break Ok(()),
                next = receiver.recv() => match next {
                    Ok(status) => self.on_status(status),
                    Err(e) => break Err(e),
                },
                Some(outcome) = self.completions.recv() => self.on_completion(outcome),
                Some(()) = presses.recv() => {
                    if let Some(command) = self.press_action() {
                        if commands.send(command).is_err() {
                            warn!("No service listening for {:?}", command);
                        }
                    }
                }
            }
        };

        self.tear_down();
        info!("Dashboard controller stopped");

        match result {
            Ok(()) => Ok(self.stats()),
            Err(DashboardError::StatusChannel { details }) => {
                warn!("Status source went away: {}", details);
                Ok(self.stats())
            }
            Err(e) => Err(e),
        }
    }

    /// Detach from the view. Results of outstanding checks are discarded.
    pub fn tear_down(&mut self) {
        if self.teardown.is_cancelled() {
            return;
        }
        info!(
            "Tearing down dashboard ({} notice checks outstanding)",
            self.in_flight.iter().filter(|t| !t.is_finished()).count()
        );
        self.teardown.cancel();

        while let Ok(outcome) = self.completions.try_recv() {
            self.on_completion(outcome);
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    pub fn last_status(&self) -> Option<LifecycleStatus> {
        self.last_status
    }

    pub fn stats(&self) -> DashboardStats {
        let mut stats = self.stats.clone();
        stats.suppressed_completions = self.guard.suppressed();
        stats
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.teardown.cancel();
    }
}

/// Builder for DashboardController
pub struct DashboardControllerBuilder {
    notice_client: Option<Arc<dyn NoticeClient>>,
    binder: Option<Arc<dyn ViewBinder>>,
    presenter: Option<Arc<dyn NoticePresenter>>,
    notices_enabled: bool,
    pager_start_disabled: bool,
}

impl DashboardControllerBuilder {
    pub fn new() -> Self {
        Self {
            notice_client: None,
            binder: None,
            presenter: None,
            notices_enabled: true,
            pager_start_disabled: true,
        }
    }

    /// Take notice and pager settings from the configuration
    pub fn with_config(mut self, config: &DashboardConfig) -> Self {
        self.notices_enabled = config.notices.enabled;
        self.pager_start_disabled = config.pager.start_disabled;
        self
    }

    pub fn with_notice_client(mut self, client: Arc<dyn NoticeClient>) -> Self {
        self.notice_client = Some(client);
        self
    }

    pub fn with_view_binder(mut self, binder: Arc<dyn ViewBinder>) -> Self {
        self.binder = Some(binder);
        self
    }

    pub fn with_presenter(mut self, presenter: Arc<dyn NoticePresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn with_notices_enabled(mut self, enabled: bool) -> Self {
        self.notices_enabled = enabled;
        self
    }

    pub fn with_pager_start_disabled(mut self, disabled: bool) -> Self {
        self.pager_start_disabled = disabled;
        self
    }

    pub fn build(self) -> Result<DashboardController> {
        let notice_client = self.notice_client.ok_or_else(|| {
            DashboardError::component("dashboard_controller", "Notice client is required")
        })?;
        let binder = self.binder.ok_or_else(|| {
            DashboardError::component("dashboard_controller", "View binder is required")
        })?;
        let presenter = self.presenter.ok_or_else(|| {
            DashboardError::component("dashboard_controller", "Notice presenter is required")
        })?;

        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let teardown = CancellationToken::new();
        let guard = NoticeCheckGuard::new(notice_client, completion_tx, teardown.clone());

        Ok(DashboardController {
            binder,
            presenter,
            guard,
            completions: completion_rx,
            in_flight: Vec::new(),
            last_status: None,
            notices_enabled: self.notices_enabled,
            pager_start_disabled: self.pager_start_disabled,
            teardown,
            stats: DashboardStats::default(),
        })
    }
}

impl Default for DashboardControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
