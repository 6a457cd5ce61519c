pub mod models;
pub mod store;

pub use store::{window_start, MetricsStore, StoreCounts};
