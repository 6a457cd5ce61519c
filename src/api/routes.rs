//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers::*, ApiState};

/// Dashboard metrics routes, mounted under `/api`
pub fn create_metrics_routes() -> Router<ApiState> {
    Router::new()
        .route("/solana/metrics", get(get_solana_metrics))
        .route("/defi/protocols", get(get_defi_protocols))
        .route("/wallet-flows", get(get_wallet_flows))
        .route("/transaction-volume", get(get_transaction_volume))
        .route("/refresh", post(refresh_all))
}
