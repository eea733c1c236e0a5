mod client;
mod guard;
mod mock;
mod presenter;

pub use client::{FileNoticeClient, Notice, NoticeClient, NoticeStream};
pub use guard::{NoticeCheckGuard, NoticeOutcome};
pub use mock::{MockNoticeClient, RecordingNoticePresenter};
pub use presenter::{NoticePresenter, TracingNoticePresenter};
