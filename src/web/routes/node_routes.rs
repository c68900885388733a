use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::{Node, NodeUpdate};
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn get_node_handler(
    State(app_state): State<Arc<AppState>>,
    Path(node_id): Path<Uuid>,
) -> Result<Json<Node>, AppError> {
    let node = app_state.node_service.get_node(node_id).await?;
    Ok(Json(node))
}

async fn list_nodes_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Node>>, AppError> {
    let nodes = app_state.node_service.list_nodes().await?;
    Ok(Json(nodes))
}

async fn create_node_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Node>), AppError> {
    let node = app_state.node_service.add_node().await?;
    Ok((StatusCode::CREATED, Json(node)))
}

async fn update_node_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NodeUpdate>,
) -> Result<StatusCode, AppError> {
    app_state.node_service.update_node(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_node_handler(
    State(app_state): State<Arc<AppState>>,
    Path(node_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.node_service.delete_node(node_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Router ---

pub fn create_node_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(list_nodes_handler)
                .post(create_node_handler)
                .put(update_node_handler),
        )
        .route(
            "/{resource_id}",
            get(get_node_handler).delete(delete_node_handler),
        )
}
