//! SeaORM entities mapping the `node` and `container` tables.
//!
//! Statuses are kept as raw text here; the service layer turns them into
//! `NodeStatus` / `ContainerStatus` and rejects anything it doesn't recognise.

pub mod container;
pub mod node;
