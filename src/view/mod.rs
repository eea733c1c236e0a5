mod binder;
mod mock;
mod state_machine;

pub use binder::{TracingViewBinder, ViewBinder};
pub use mock::RecordingViewBinder;
pub use state_machine::{
    action_for, derive, ActionIcon, ActionLabel, Effect, ServiceCommand, TintRole, Transition,
    ViewStateDescriptor,
};
