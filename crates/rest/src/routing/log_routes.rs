//! Log RPC route configuration.

use axum::{
    Router,
    routing::{get, post},
};
use bizlog_persistence::types::{CustomerAccountLog, LogDocument, LogRecord};

use crate::handlers;
use crate::state::{AppState, HealthState};

/// Path prefix of the business log RPCs.
pub const BUSINESS_LOG_PATH: &str = "/api/businessLog";

/// Path prefix of the customer account log RPCs.
pub const CUSTOMER_ACCOUNT_LOG_PATH: &str = "/api/customerAccountLog";

/// Creates all routes.
///
/// # Routes
///
/// ## Per log kind (`businessLog`, `customerAccountLog`)
/// - `POST /api/{kind}/save`
/// - `POST /api/{kind}/batchSave`
/// - `POST /api/{kind}/listPage`
/// - `POST /api/{kind}/list`
/// - `POST /api/{kind}/deleteAll`
///
/// ## Service-wide
/// - `GET /health` - Health check
pub fn create_routes(
    business: AppState<LogRecord>,
    accounts: AppState<CustomerAccountLog>,
    health: HealthState,
) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .with_state(health)
        .nest(BUSINESS_LOG_PATH, kind_routes(business))
        .nest(CUSTOMER_ACCOUNT_LOG_PATH, kind_routes(accounts))
}

/// Creates the five RPC routes of one log kind.
pub fn kind_routes<D: LogDocument>(state: AppState<D>) -> Router {
    Router::new()
        .route("/save", post(handlers::save_handler::<D>))
        .route("/batchSave", post(handlers::batch_save_handler::<D>))
        .route("/listPage", post(handlers::list_page_handler::<D>))
        .route("/list", post(handlers::list_handler::<D>))
        .route("/deleteAll", post(handlers::delete_all_handler::<D>))
        .with_state(state)
}
