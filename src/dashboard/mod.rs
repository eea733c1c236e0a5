mod controller;
mod stats;
#[cfg(test)]
mod tests;

pub use controller::{DashboardController, DashboardControllerBuilder};
pub use stats::DashboardStats;
