pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod keyboard_input;
pub mod notices;
pub mod service;
pub mod status;
pub mod status_source;
pub mod view;

pub use app::{ComponentState, DashboardOrchestrator, ShutdownReason};
pub use config::{DashboardConfig, NoticePresentation};
pub use dashboard::{DashboardController, DashboardControllerBuilder, DashboardStats};
pub use error::{DashboardError, NoticeFetchError, Result};
pub use notices::{
    FileNoticeClient, MockNoticeClient, Notice, NoticeCheckGuard, NoticeClient, NoticeOutcome,
    NoticePresenter, NoticeStream, RecordingNoticePresenter, TracingNoticePresenter,
};
pub use service::ServiceSimulator;
pub use status::{parse_status_script, LifecycleStatus};
pub use status_source::{StatusReceiver, StatusSource, Subscription};
pub use view::{
    action_for, derive, ActionIcon, ActionLabel, Effect, RecordingViewBinder, ServiceCommand,
    TintRole, TracingViewBinder, Transition, ViewBinder, ViewStateDescriptor,
};
