use std::fmt;

/// Lifecycle of one orchestrated component (service, dashboard, commands, keyboard)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentState::Stopped => "stopped",
            ComponentState::Starting => "starting",
            ComponentState::Running => "running",
            ComponentState::Stopping => "stopping",
            ComponentState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why the dashboard is shutting down
#[derive(Debug, Clone)]
pub enum ShutdownReason {
    Signal(String),
    Error(String),
    UserRequest,
    ScriptFinished,
}

impl ShutdownReason {
    /// Process exit code implied by the reason alone
    pub fn exit_code(&self) -> i32 {
        match self {
            ShutdownReason::Error(_) => 1,
            _ => 0,
        }
    }
}
