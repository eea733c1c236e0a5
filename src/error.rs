use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    #[error("Notice fetch error: {0}")]
    NoticeFetch(#[from] NoticeFetchError),

    #[error("Status channel error: {details}")]
    StatusChannel { details: String },

    #[error("System error: {message}")]
    System { message: String },

    #[error("Component error in {component}: {message}")]
    Component { component: String, message: String },
}

/// Failures of the deprecation notice fetch. Never escapes the notice guard.
#[derive(Error, Debug)]
pub enum NoticeFetchError {
    #[error("Notice source unavailable at {endpoint}: {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed notice payload: {details}")]
    Malformed { details: String },

    #[error("Notice client closed")]
    Closed,
}

impl DashboardError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    pub fn component<S: Into<String>>(component: S, message: S) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
