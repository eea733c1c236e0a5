use super::client::{Notice, NoticeClient, NoticeStream};
use super::presenter::NoticePresenter;
use crate::error::NoticeFetchError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Notice client returning a fixed response, for tests and offline runs
pub struct MockNoticeClient {
    notices: Vec<Notice>,
    failure: Option<String>,
    calls: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl MockNoticeClient {
    /// Succeeds with the given notices
    pub fn with_notices(notices: Vec<Notice>) -> Self {
        Self {
            notices,
            failure: None,
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Succeeds with no notices
    pub fn empty() -> Self {
        Self::with_notices(Vec::new())
    }

    /// Fails every fetch as if the control plane were unreachable
    pub fn failing<S: Into<String>>(reason: S) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::empty()
        }
    }

    /// Hold every fetch until [`MockNoticeClient::release`] is called
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let `count` held fetches complete
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    /// Number of fetches started so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NoticeClient for MockNoticeClient {
    async fn fetch_deprecated_notices(&self) -> Result<NoticeStream, NoticeFetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Mock notice fetch #{}", call);

        if let Some(gate) = &self.gate {
            let permit = gate.acquire().await.map_err(|_| NoticeFetchError::Closed)?;
            permit.forget();
        }

        match &self.failure {
            Some(reason) => Err(NoticeFetchError::Unavailable {
                endpoint: "mock".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, reason.clone()),
            }),
            None => Ok(NoticeStream::new(self.notices.clone())),
        }
    }
}

/// Presenter that records what it was asked to show
#[derive(Default)]
pub struct RecordingNoticePresenter {
    shown: Mutex<Vec<Vec<Notice>>>,
    errors: Mutex<Vec<String>>,
}

impl RecordingNoticePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per `show_notices` call, holding the notices it received
    pub fn shown(&self) -> Vec<Vec<Notice>> {
        self.shown.lock().clone()
    }

    /// One entry per `show_error` call
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl NoticePresenter for RecordingNoticePresenter {
    fn show_notices(&self, notices: NoticeStream) {
        self.shown.lock().push(notices.collect());
    }

    fn show_error(&self, error: &NoticeFetchError) {
        self.errors.lock().push(error.to_string());
    }
}
