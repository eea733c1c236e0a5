use chrono::{DateTime, Utc};
use serde::Serialize;

/// Dashboard controller statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub status_changes: u64,
    pub activations: u64,
    pub pager_enabled: u64,
    pub notice_checks: u64,
    pub notices_delivered: u64,
    pub fetch_failures: u64,
    pub suppressed_completions: u64,
    pub last_status_time: Option<DateTime<Utc>>,
}

impl DashboardStats {
    pub fn record_status_change(&mut self) {
        self.status_changes += 1;
        self.last_status_time = Some(Utc::now());
    }

    pub fn record_activation(&mut self) {
        self.activations += 1;
    }

    pub fn record_pager_enabled(&mut self) {
        self.pager_enabled += 1;
    }

    pub fn record_notice_check(&mut self) {
        self.notice_checks += 1;
    }

    pub fn record_notices_delivered(&mut self) {
        self.notices_delivered += 1;
    }

    pub fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    /// Share of dispatched checks that ended in a failure
    pub fn failure_rate(&self) -> f64 {
        if self.notice_checks == 0 {
            0.0
        } else {
            self.fetch_failures as f64 / self.notice_checks as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
