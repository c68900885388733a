//! The `services` module is the storage-facing API of the application.
//!
//! The HTTP layer only sees the [`NodeRepository`] and [`ContainerRepository`]
//! contracts; [`NodeService`] and [`ContainerService`] implement them on top of
//! a shared SeaORM connection pool.

use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Container, ContainerUpdate, Node, NodeUpdate};
use crate::web::AppError;

pub mod container_service;
pub mod node_aggregate;
pub mod node_service;

pub use container_service::ContainerService;
pub use node_service::NodeService;


#[async_trait]
pub trait NodeRepository: Send + Sync {
    /// Fetches a node with all of its containers.
    async fn get_node(&self, id: Uuid) -> Result<Node, AppError>;
    /// Lists every node, each with its containers.
    async fn list_nodes(&self) -> Result<Vec<Node>, AppError>;
    /// Persists a fresh node in status `new`.
    async fn add_node(&self) -> Result<Node, AppError>;
    /// Validates and writes a new status for an existing node.
    async fn update_node(&self, update: NodeUpdate) -> Result<(), AppError>;
    /// Removes the node together with its containers.
    async fn delete_node(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait ContainerRepository: Send + Sync {
    async fn get_container(&self, id: Uuid) -> Result<Container, AppError>;
    async fn list_containers(&self) -> Result<Vec<Container>, AppError>;
    /// Persists a fresh container in status `pending` under `node_id`.
    async fn add_container(&self, node_id: Uuid, image: &str) -> Result<Container, AppError>;
    /// Validates and writes the image and status of an existing container.
    async fn update_container(&self, update: ContainerUpdate) -> Result<(), AppError>;
    async fn delete_container(&self, id: Uuid) -> Result<(), AppError>;
}
