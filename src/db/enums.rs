use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A status string that is not one of the declared tags for its entity kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStatus {
    #[error("invalid node status: {0:?}")]
    Node(String),
    #[error("invalid container status: {0:?}")]
    Container(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    New,
    Running,
    Failed,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::New => "new",
            NodeStatus::Running => "running",
            NodeStatus::Failed => "failed",
        }
    }
}

/// Exact-match parse; no trimming or case folding.
impl FromStr for NodeStatus {
    type Err = InvalidStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "new" => Ok(NodeStatus::New),
            "running" => Ok(NodeStatus::Running),
            "failed" => Ok(NodeStatus::Failed),
            other => Err(InvalidStatus::Node(other.to_owned())),
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    #[default]
    Pending,
    Running,
    Failed,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Pending => "pending",
            ContainerStatus::Running => "running",
            ContainerStatus::Failed => "failed",
        }
    }
}

impl FromStr for ContainerStatus {
    type Err = InvalidStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "pending" => Ok(ContainerStatus::Pending),
            "running" => Ok(ContainerStatus::Running),
            "failed" => Ok(ContainerStatus::Failed),
            other => Err(InvalidStatus::Container(other.to_owned())),
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_status_accepts_declared_tags() {
        for status in [NodeStatus::New, NodeStatus::Running, NodeStatus::Failed] {
            assert_eq!(status.as_str().parse::<NodeStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_node_status_rejects_everything_else() {
        for raw in ["", "pending", "paused", "New", "RUNNING", " new", "failed\n"] {
            assert_eq!(
                raw.parse::<NodeStatus>(),
                Err(InvalidStatus::Node(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_container_status_accepts_declared_tags() {
        for status in [
            ContainerStatus::Pending,
            ContainerStatus::Running,
            ContainerStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ContainerStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_container_status_rejects_everything_else() {
        for raw in ["", "new", "paused", "Pending", "running ", "FAILED"] {
            assert_eq!(
                raw.parse::<ContainerStatus>(),
                Err(InvalidStatus::Container(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_defaults_are_initial_lifecycle_states() {
        assert_eq!(NodeStatus::default(), NodeStatus::New);
        assert_eq!(ContainerStatus::default(), ContainerStatus::Pending);
    }

    #[test]
    fn test_serde_uses_exact_tags() {
        assert_eq!(serde_json::to_string(&NodeStatus::Running).unwrap(), "\"running\"");
        assert_eq!(
            serde_json::from_str::<ContainerStatus>("\"failed\"").unwrap(),
            ContainerStatus::Failed
        );
        assert!(serde_json::from_str::<NodeStatus>("\"Running\"").is_err());
    }
}
