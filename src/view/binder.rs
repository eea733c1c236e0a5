use super::state_machine::ViewStateDescriptor;
use tracing::{debug, info};

/// Applies view state to concrete widgets.
///
/// Called only from the dashboard's rendering context and must not block.
pub trait ViewBinder: Send + Sync {
    fn apply_view_state(&self, descriptor: &ViewStateDescriptor);

    /// Show or hide the tab strip and allow paging between dashboard pages
    fn set_pager_visible(&self, visible: bool);

    /// Enable or disable the action button outside of a status change
    fn set_action_enabled(&self, enabled: bool);
}

/// Binder that renders view state into the log
#[derive(Debug, Default)]
pub struct TracingViewBinder;

impl TracingViewBinder {
    pub fn new() -> Self {
        Self
    }
}

impl ViewBinder for TracingViewBinder {
    fn apply_view_state(&self, descriptor: &ViewStateDescriptor) {
        if descriptor.is_unchanged() {
            debug!("View state unchanged");
            return;
        }

        info!(
            icon = ?descriptor.action_icon,
            tint = ?descriptor.action_tint,
            label = ?descriptor.action_label,
            spinner = ?descriptor.spinner_visible,
            enabled = ?descriptor.action_enabled,
            "Applying view state"
        );
    }

    fn set_pager_visible(&self, visible: bool) {
        info!("Pager {}", if visible { "enabled" } else { "disabled" });
    }

    fn set_action_enabled(&self, enabled: bool) {
        debug!("Action button enabled: {}", enabled);
    }
}
