use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    prelude::Expr,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::entities::container;
use crate::db::enums::ContainerStatus;
use crate::db::models::{Container, ContainerUpdate};
use crate::db::services::ContainerRepository;
use crate::web::AppError;

// --- Container Service ---

pub struct ContainerService {
    db: Arc<DatabaseConnection>,
}

impl ContainerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// A foreign key violation on insert means the referenced node is gone.
fn map_insert_error(db_err: DbErr, node_id: Uuid) -> AppError {
    match db_err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::UnknownNode(node_id),
        _ => AppError::DatabaseError(db_err.to_string()),
    }
}

#[async_trait]
impl ContainerRepository for ContainerService {
    async fn get_container(&self, id: Uuid) -> Result<Container, AppError> {
        let model = container::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("container {id}")))?;
        Container::try_from(model).map_err(AppError::corrupt_row)
    }

    async fn list_containers(&self) -> Result<Vec<Container>, AppError> {
        let models = container::Entity::find().all(self.db.as_ref()).await?;
        let containers = models
            .into_iter()
            .map(Container::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::corrupt_row)?;
        debug!(count = containers.len(), "Listed containers.");
        Ok(containers)
    }

    async fn add_container(&self, node_id: Uuid, image: &str) -> Result<Container, AppError> {
        let new_container = Container::new(node_id, image);
        let active_model = container::ActiveModel {
            id: Set(new_container.id),
            node_id: Set(new_container.node_id),
            image: Set(new_container.image.clone()),
            status: Set(new_container.status.as_str().to_owned()),
        };
        container::Entity::insert(active_model)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|db_err| map_insert_error(db_err, node_id))?;

        info!(container_id = %new_container.id, node_id = %node_id, image = %image, "Container created.");
        Ok(new_container)
    }

    async fn update_container(&self, update: ContainerUpdate) -> Result<(), AppError> {
        let status: ContainerStatus = update.status.parse()?;

        let mut statement = container::Entity::update_many()
            .col_expr(container::Column::Image, Expr::value(update.image.as_str()))
            .col_expr(container::Column::Status, Expr::value(status.as_str()))
            .filter(container::Column::Id.eq(update.id));
        if let Some(node_id) = update.node_id {
            statement = statement.filter(container::Column::NodeId.eq(node_id));
        }
        let result = statement.exec(self.db.as_ref()).await?;

        if result.rows_affected == 0 {
            // A row that exists but did not match carries a different node.
            if let Some(requested) = update.node_id {
                if let Some(stored) = container::Entity::find_by_id(update.id)
                    .one(self.db.as_ref())
                    .await?
                {
                    return Err(AppError::InvalidInput(format!(
                        "container {} belongs to node {}, not {requested}",
                        update.id, stored.node_id
                    )));
                }
            }
            return Err(AppError::NotFound(format!("container {}", update.id)));
        }
        info!(container_id = %update.id, %status, "Container updated.");
        Ok(())
    }

    async fn delete_container(&self, id: Uuid) -> Result<(), AppError> {
        let result = container::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            debug!(container_id = %id, "Delete matched no container.");
        } else {
            info!(container_id = %id, "Container deleted.");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::InvalidStatus;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, RuntimeErr};

    fn model(node_id: Uuid, image: &str, status: &str) -> container::Model {
        container::Model {
            id: Uuid::new_v4(),
            node_id,
            image: image.to_string(),
            status: status.to_string(),
        }
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_add_container_starts_as_pending() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(1)])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let node_id = Uuid::new_v4();
        let created = service.add_container(node_id, "nginx:latest").await.unwrap();
        assert_eq!(created.status, ContainerStatus::Pending);
        assert_eq!(created.node_id, node_id);
        assert_eq!(created.image, "nginx:latest");
    }

    #[tokio::test]
    async fn test_add_container_keeps_other_store_errors_generic() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::Exec(RuntimeErr::Internal(
                "insert or update on table \"container\" violates foreign key constraint".into(),
            ))])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let result = service.add_container(Uuid::new_v4(), "nginx").await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_get_container() {
        let stored = model(Uuid::new_v4(), "redis:7", "running");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let fetched = service.get_container(stored.id).await.unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.node_id, stored.node_id);
        assert_eq!(fetched.status, ContainerStatus::Running);
    }

    #[tokio::test]
    async fn test_get_missing_container_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<container::Model>::new()])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        assert!(matches!(
            service.get_container(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_containers_empty_is_ok() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<container::Model>::new()])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        assert_eq!(service.list_containers().await.unwrap(), Vec::new());
    }

    #[tokio::test]
    async fn test_list_containers_with_drifted_status_is_a_store_error() {
        let node_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                model(node_id, "a", "pending"),
                model(node_id, "b", "RUNNING"),
            ]])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        assert!(matches!(
            service.list_containers().await,
            Err(AppError::DatabaseError(msg)) if msg.contains("RUNNING")
        ));
    }

    #[tokio::test]
    async fn test_update_container_validates_before_writing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = ContainerService::new(Arc::new(db));

        let result = service
            .update_container(ContainerUpdate {
                id: Uuid::new_v4(),
                node_id: None,
                image: "nginx".to_string(),
                status: "new".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::InvalidStatus(InvalidStatus::Container(_)))
        ));
        let db = Arc::into_inner(service.db).unwrap();
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_container_writes_image_and_status() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(1)])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        service
            .update_container(ContainerUpdate {
                id: Uuid::new_v4(),
                node_id: Some(Uuid::new_v4()),
                image: "nginx:1.27".to_string(),
                status: "running".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_container_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(0)])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let result = service
            .update_container(ContainerUpdate {
                id: Uuid::new_v4(),
                node_id: None,
                image: "nginx".to_string(),
                status: "failed".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_container_refuses_to_move_it() {
        let stored = model(Uuid::new_v4(), "nginx", "pending");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(0)])
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let result = service
            .update_container(ContainerUpdate {
                id: stored.id,
                node_id: Some(Uuid::new_v4()),
                image: "nginx".to_string(),
                status: "running".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_missing_container_with_node_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(0)])
            .append_query_results([Vec::<container::Model>::new()])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let result = service
            .update_container(ContainerUpdate {
                id: Uuid::new_v4(),
                node_id: Some(Uuid::new_v4()),
                image: "nginx".to_string(),
                status: "running".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_result(1)])
            .append_query_results([Vec::<container::Model>::new()])
            .into_connection();
        let service = ContainerService::new(Arc::new(db));

        let id = Uuid::new_v4();
        service.delete_container(id).await.unwrap();
        assert!(matches!(
            service.get_container(id).await,
            Err(AppError::NotFound(_))
        ));
    }
}
