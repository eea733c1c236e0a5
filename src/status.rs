use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse lifecycle phase reported by the connection service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleStatus {
    #[default]
    Stopped,
    Starting,
    Started,
    Stopping,
    /// A value the dashboard does not recognise, carried with its raw code
    Unknown(i32),
}

impl LifecycleStatus {
    /// Map the service's integer status code
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => LifecycleStatus::Stopped,
            1 => LifecycleStatus::Starting,
            2 => LifecycleStatus::Started,
            3 => LifecycleStatus::Stopping,
            other => LifecycleStatus::Unknown(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            LifecycleStatus::Stopped => 0,
            LifecycleStatus::Starting => 1,
            LifecycleStatus::Started => 2,
            LifecycleStatus::Stopping => 3,
            LifecycleStatus::Unknown(code) => *code,
        }
    }

    /// True only for the active phase
    pub fn is_started(&self) -> bool {
        matches!(self, LifecycleStatus::Started)
    }

    /// True while the service is moving between phases
    pub fn is_transitioning(&self) -> bool {
        matches!(self, LifecycleStatus::Starting | LifecycleStatus::Stopping)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStatus::Stopped => "stopped",
            LifecycleStatus::Starting => "starting",
            LifecycleStatus::Started => "started",
            LifecycleStatus::Stopping => "stopping",
            LifecycleStatus::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Unknown(code) => write!(f, "unknown({})", code),
            other => f.write_str(other.as_str()),
        }
    }
}

impl FromStr for LifecycleStatus {
    type Err = String;

    /// Accepts status names (case-insensitive) or raw integer codes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "stopped" => Ok(LifecycleStatus::Stopped),
            "starting" => Ok(LifecycleStatus::Starting),
            "started" => Ok(LifecycleStatus::Started),
            "stopping" => Ok(LifecycleStatus::Stopping),
            other => other
                .parse::<i32>()
                .map(LifecycleStatus::from_code)
                .map_err(|_| format!("unrecognised lifecycle status '{}'", trimmed)),
        }
    }
}

/// Parse a comma separated list of statuses, e.g. `stopped,starting,started`
pub fn parse_status_script(script: &str) -> Result<Vec<LifecycleStatus>, String> {
    script
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(str::parse)
        .collect()
}
