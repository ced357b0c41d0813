//! Error types for arscene

use crate::node::NodeId;
use thiserror::Error;

/// Main error type for arscene operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Session failed: {0}")]
    SessionFailure(String),

    #[error("Session interrupted: {0}")]
    Interruption(String),

    #[error("Model asset not found: {model_id}")]
    AssetNotFound { model_id: String },

    #[error("Node {node} has {found} geometry, expected {expected}")]
    InvalidGeometryCast {
        node: NodeId,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for arscene operations
pub type Result<T> = std::result::Result<T, Error>;
