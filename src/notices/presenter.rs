use super::client::NoticeStream;
use crate::config::NoticePresentation;
use crate::error::NoticeFetchError;
use tracing::{debug, error, warn};

/// Presentation sinks for the notice check.
///
/// Invoked on the dashboard's rendering context only.
pub trait NoticePresenter: Send + Sync {
    fn show_notices(&self, notices: NoticeStream);

    fn show_error(&self, error: &NoticeFetchError);
}

/// Presenter that consumes notices according to the configured policy
#[derive(Debug, Clone, Copy)]
pub struct TracingNoticePresenter {
    presentation: NoticePresentation,
}

impl TracingNoticePresenter {
    pub fn new(presentation: NoticePresentation) -> Self {
        Self { presentation }
    }
}

impl NoticePresenter for TracingNoticePresenter {
    fn show_notices(&self, notices: NoticeStream) {
        match self.presentation {
            NoticePresentation::Drain => {
                let drained = notices.count();
                debug!("Drained {} deprecation notices", drained);
            }
            NoticePresentation::Log => {
                for notice in notices {
                    warn!(
                        deprecated_in = notice.deprecated_version.as_deref().unwrap_or("-"),
                        removed_in = notice.scheduled_version.as_deref().unwrap_or("-"),
                        migration = notice.migration_link.as_deref().unwrap_or("-"),
                        "Deprecated: {}",
                        notice.description
                    );
                }
            }
        }
    }

    fn show_error(&self, error: &NoticeFetchError) {
        error!("Failed to check deprecation notices: {}", error);
    }
}
