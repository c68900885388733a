//! Assembly of nodes together with their containers.
//!
//! Both node reads issue one `node LEFT JOIN container` query. Every result row
//! is first classified as a [`JoinRow`] (a node with or without a matching
//! container) and the rows are then folded into [`Node`] values, keeping the
//! order in which the store returned the nodes.

use sea_orm::{EntityTrait, FromQueryResult, JoinType, QuerySelect, RelationTrait, Select};
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

use crate::db::entities::{container, node};
use crate::db::enums::InvalidStatus;
use crate::db::models::{Container, Node};

/// Flat shape of one join result row. The container columns are null when the
/// node has no containers.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct NodeContainerRow {
    pub node_id: Uuid,
    pub node_status: String,
    pub container_id: Option<Uuid>,
    pub container_node_id: Option<Uuid>,
    pub container_image: Option<String>,
    pub container_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinRow {
    NodeOnly(node::Model),
    NodeWithContainer(node::Model, container::Model),
}

impl From<NodeContainerRow> for JoinRow {
    fn from(row: NodeContainerRow) -> Self {
        let node = node::Model {
            id: row.node_id,
            status: row.node_status,
        };
        match (row.container_id, row.container_image, row.container_status) {
            (Some(id), Some(image), Some(status)) => JoinRow::NodeWithContainer(
                node,
                container::Model {
                    id,
                    node_id: row.container_node_id.unwrap_or(row.node_id),
                    image,
                    status,
                },
            ),
            _ => JoinRow::NodeOnly(node),
        }
    }
}

/// `SELECT node.*, container.* FROM node LEFT JOIN container ON node.id = container.node_id`
/// with the columns aliased to match [`NodeContainerRow`].
pub fn node_with_containers() -> Select<node::Entity> {
    node::Entity::find()
        .select_only()
        .column_as(node::Column::Id, "node_id")
        .column_as(node::Column::Status, "node_status")
        .column_as(container::Column::Id, "container_id")
        .column_as(container::Column::NodeId, "container_node_id")
        .column_as(container::Column::Image, "container_image")
        .column_as(container::Column::Status, "container_status")
        .join(JoinType::LeftJoin, node::Relation::Container.def())
}

/// Folds join rows into nodes. Any node or container whose persisted status
/// fails validation fails the whole fold.
pub fn fold_rows<I>(rows: I) -> Result<Vec<Node>, InvalidStatus>
where
    I: IntoIterator<Item = JoinRow>,
{
    let mut nodes: Vec<Node> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let (node_model, container_model) = match row {
            JoinRow::NodeOnly(node_model) => (node_model, None),
            JoinRow::NodeWithContainer(node_model, container_model) => {
                (node_model, Some(container_model))
            }
        };

        let position = match positions.get(&node_model.id) {
            Some(&position) => position,
            None => {
                nodes.push(Node {
                    id: node_model.id,
                    status: node_model.status.parse()?,
                    containers: Vec::new(),
                });
                positions.insert(node_model.id, nodes.len() - 1);
                nodes.len() - 1
            }
        };

        if let Some(container_model) = container_model {
            if container_model.node_id != node_model.id {
                warn!(
                    node_id = %node_model.id,
                    container_id = %container_model.id,
                    "Join returned a container belonging to another node, skipping it."
                );
                continue;
            }
            nodes[position]
                .containers
                .push(Container::try_from(container_model)?);
        }
    }

    Ok(nodes)
}

/// Folds the rows of a single-node query. `None` means the query produced no rows.
pub fn fold_single<I>(rows: I) -> Result<Option<Node>, InvalidStatus>
where
    I: IntoIterator<Item = JoinRow>,
{
    Ok(fold_rows(rows)?.into_iter().next())
}
