use std::sync::Arc;

use axum::{
    http::{Method, Uri},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::OrdersService;

use crate::errors::RpcError;
use crate::openapi::ApiDoc;

pub mod orders;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrdersService>,
}

impl AppState {
    pub fn new(orders: OrdersService) -> Self {
        Self { orders: Arc::new(orders) }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn not_found(method: Method, uri: Uri) -> RpcError {
    RpcError::new(404, format!("Cannot {method} {}", uri.path()))
}

/// Build the application router: health, orders API and the OpenAPI docs.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let orders_api = Router::new()
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/:id", get(orders::get).patch(orders::change_status));

    Router::new()
        .route("/health", get(health))
        .merge(orders_api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
