use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::entities::container;
use crate::db::enums::{ContainerStatus, InvalidStatus, NodeStatus};

/// A compute host. `containers` is never stored; it is assembled from the
/// `container` table at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub status: NodeStatus,
    pub containers: Vec<Container>,
}

impl Node {
    /// A fresh node with a new id, status `new` and no containers.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: NodeStatus::New,
            containers: Vec::new(),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// A workload assigned to exactly one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: Uuid,
    pub node_id: Uuid,
    pub image: String,
    pub status: ContainerStatus,
}

impl Container {
    /// A fresh container with a new id and status `pending`.
    pub fn new(node_id: Uuid, image: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            node_id,
            image: image.into(),
            status: ContainerStatus::Pending,
        }
    }
}

impl TryFrom<container::Model> for Container {
    type Error = InvalidStatus;

    fn try_from(model: container::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            status: model.status.parse()?,
            id: model.id,
            node_id: model.node_id,
            image: model.image,
        })
    }
}

// --- Request payloads ---

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewContainer {
    pub node_id: Uuid,
    pub image: String,
}

/// Node update payload. The status stays a raw string so that it goes through
/// the same validation as every other write; a full `Node` body (with
/// `containers`) deserializes into this too, the extra fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeUpdate {
    pub id: Uuid,
    pub status: String,
}

/// Container update payload. `node_id` is never written; when present it must
/// name the node the container already belongs to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerUpdate {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<Uuid>,
    pub image: String,
    pub status: String,
}
