use crate::error::NoticeFetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A deprecation notice published by the service control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub description: String,
    #[serde(default)]
    pub deprecated_version: Option<String>,
    #[serde(default)]
    pub scheduled_version: Option<String>,
    #[serde(default)]
    pub migration_link: Option<String>,
}

impl Notice {
    pub fn new<S: Into<String>>(description: S) -> Self {
        Self {
            description: description.into(),
            deprecated_version: None,
            scheduled_version: None,
            migration_link: None,
        }
    }
}

/// Lazy sequence of notices handed from a client to a presenter
pub struct NoticeStream {
    inner: Peekable<Box<dyn Iterator<Item = Notice> + Send>>,
}

impl NoticeStream {
    pub fn new<I>(notices: I) -> Self
    where
        I: IntoIterator<Item = Notice>,
        I::IntoIter: Send + 'static,
    {
        let boxed: Box<dyn Iterator<Item = Notice> + Send> = Box::new(notices.into_iter());
        Self {
            inner: boxed.peekable(),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// True while at least one notice remains, without consuming it
    pub fn has_next(&mut self) -> bool {
        self.inner.peek().is_some()
    }
}

impl Iterator for NoticeStream {
    type Item = Notice;

    fn next(&mut self) -> Option<Notice> {
        self.inner.next()
    }
}

impl fmt::Debug for NoticeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoticeStream").finish_non_exhaustive()
    }
}

/// Fetches deprecation notices from the service control plane
#[async_trait]
pub trait NoticeClient: Send + Sync {
    async fn fetch_deprecated_notices(&self) -> Result<NoticeStream, NoticeFetchError>;
}

/// Reads notices from a JSON array on disk
pub struct FileNoticeClient {
    path: PathBuf,
}

impl FileNoticeClient {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_notices(path: &Path) -> Result<Vec<Notice>, NoticeFetchError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| NoticeFetchError::Unavailable {
                endpoint: path.display().to_string(),
                source: e,
            })?;

        serde_json::from_str(&contents).map_err(|e| NoticeFetchError::Malformed {
            details: format!("{}: {}", path.display(), e),
        })
    }
}

#[async_trait]
impl NoticeClient for FileNoticeClient {
    async fn fetch_deprecated_notices(&self) -> Result<NoticeStream, NoticeFetchError> {
        let path = self.path.clone();
        debug!("Reading deprecation notices from {}", path.display());

        let notices = tokio::task::spawn_blocking(move || Self::read_notices(&path))
            .await
            .map_err(|_| NoticeFetchError::Closed)??;

        Ok(NoticeStream::new(notices))
    }
}
