use super::binder::ViewBinder;
use super::state_machine::ViewStateDescriptor;
use parking_lot::Mutex;

/// View binder that records every call, for tests
#[derive(Default)]
pub struct RecordingViewBinder {
    descriptors: Mutex<Vec<ViewStateDescriptor>>,
    pager: Mutex<Vec<bool>>,
    action_enabled: Mutex<Vec<bool>>,
}

impl RecordingViewBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptors(&self) -> Vec<ViewStateDescriptor> {
        self.descriptors.lock().clone()
    }

    pub fn last_descriptor(&self) -> Option<ViewStateDescriptor> {
        self.descriptors.lock().last().copied()
    }

    /// Every pager visibility change, in order
    pub fn pager_calls(&self) -> Vec<bool> {
        self.pager.lock().clone()
    }

    pub fn pager_enable_count(&self) -> usize {
        self.pager.lock().iter().filter(|visible| **visible).count()
    }

    pub fn action_enabled_calls(&self) -> Vec<bool> {
        self.action_enabled.lock().clone()
    }
}

impl ViewBinder for RecordingViewBinder {
    fn apply_view_state(&self, descriptor: &ViewStateDescriptor) {
        self.descriptors.lock().push(*descriptor);
    }

    fn set_pager_visible(&self, visible: bool) {
        self.pager.lock().push(visible);
    }

    fn set_action_enabled(&self, enabled: bool) {
        self.action_enabled.lock().push(enabled);
    }
}
