use axum::{Json, Router, http::Method, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::services::{ContainerRepository, NodeRepository};
use crate::version::VERSION;
use crate::web::routes::{container_routes, node_routes};

pub mod error;
pub mod routes;


pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub node_service: Arc<dyn NodeRepository>,
    pub container_service: Arc<dyn ContainerRepository>,
}

async fn health_check_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": VERSION }))
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest("/api/v1/node", node_routes::create_node_router())
        .nest("/api/v1/container", container_routes::create_container_router())
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
