pub mod api;
pub mod config;
pub mod cron;
pub mod db;
pub mod service;
pub mod sources;
pub mod utils;

pub use crate::config::Settings;
pub use api::{create_router, ApiState};
pub use cron::{CronScheduler, CronSettings};
pub use db::MetricsStore;
pub use service::{MetricsService, RefreshOrchestrator};
pub use sources::{MetricsSource, Synthesizer};
