use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, prelude::Expr,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::entities::node;
use crate::db::enums::NodeStatus;
use crate::db::models::{Node, NodeUpdate};
use crate::db::services::NodeRepository;
use crate::db::services::node_aggregate::{self, JoinRow};
use crate::web::AppError;

// --- Node Service ---

pub struct NodeService {
    db: Arc<DatabaseConnection>,
}

impl NodeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NodeRepository for NodeService {
    async fn get_node(&self, id: Uuid) -> Result<Node, AppError> {
        let rows = node_aggregate::node_with_containers()
            .filter(node::Column::Id.eq(id))
            .into_model::<node_aggregate::NodeContainerRow>()
            .all(self.db.as_ref())
            .await?;

        node_aggregate::fold_single(rows.into_iter().map(JoinRow::from))
            .map_err(AppError::corrupt_row)?
            .ok_or_else(|| AppError::NotFound(format!("node {id}")))
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, AppError> {
        let rows = node_aggregate::node_with_containers()
            .into_model::<node_aggregate::NodeContainerRow>()
            .all(self.db.as_ref())
            .await?;

        let nodes = node_aggregate::fold_rows(rows.into_iter().map(JoinRow::from))
            .map_err(AppError::corrupt_row)?;
        debug!(count = nodes.len(), "Listed nodes.");
        Ok(nodes)
    }

    async fn add_node(&self) -> Result<Node, AppError> {
        let new_node = Node::new();
        let active_model = node::ActiveModel {
            id: Set(new_node.id),
            status: Set(new_node.status.as_str().to_owned()),
        };
        node::Entity::insert(active_model)
            .exec_without_returning(self.db.as_ref())
            .await?;

        info!(node_id = %new_node.id, "Node created.");
        Ok(new_node)
    }

    async fn update_node(&self, update: NodeUpdate) -> Result<(), AppError> {
        let status: NodeStatus = update.status.parse()?;

        let result = node::Entity::update_many()
            .col_expr(node::Column::Status, Expr::value(status.as_str()))
            .filter(node::Column::Id.eq(update.id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("node {}", update.id)));
        }
        info!(node_id = %update.id, %status, "Node status updated.");
        Ok(())
    }

    async fn delete_node(&self, id: Uuid) -> Result<(), AppError> {
        // Containers go with the node through the ON DELETE CASCADE foreign key.
        let result = node::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            debug!(node_id = %id, "Delete matched no node.");
        } else {
            info!(node_id = %id, "Node deleted.");
        }
        Ok(())
    }
}
