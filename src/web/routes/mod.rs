pub mod container_routes;
pub mod node_routes;
