use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::models::{Container, ContainerUpdate, NewContainer};
use crate::web::{AppError, AppState};

async fn get_container_handler(
    State(app_state): State<Arc<AppState>>,
    Path(container_id): Path<Uuid>,
) -> Result<Json<Container>, AppError> {
    let container = app_state
        .container_service
        .get_container(container_id)
        .await?;
    Ok(Json(container))
}

async fn list_containers_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<Container>>, AppError> {
    let containers = app_state.container_service.list_containers().await?;
    Ok(Json(containers))
}

fn require_image(image: &str) -> Result<(), AppError> {
    if image.trim().is_empty() {
        return Err(AppError::InvalidInput("image must not be empty".to_string()));
    }
    Ok(())
}

async fn create_container_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<NewContainer>,
) -> Result<(StatusCode, Json<Container>), AppError> {
    require_image(&payload.image)?;
    let container = app_state
        .container_service
        .add_container(payload.node_id, &payload.image)
        .await?;
    Ok((StatusCode::CREATED, Json(container)))
}

async fn update_container_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ContainerUpdate>,
) -> Result<StatusCode, AppError> {
    require_image(&payload.image)?;
    app_state.container_service.update_container(payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_container_handler(
    State(app_state): State<Arc<AppState>>,
    Path(container_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .container_service
        .delete_container(container_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_container_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(list_containers_handler)
                .post(create_container_handler)
                .put(update_container_handler),
        )
        .route(
            "/{resource_id}",
            get(get_container_handler).delete(delete_container_handler),
        )
}
