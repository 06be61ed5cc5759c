//! Error types for the editor

use blockdoc_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Malformed mutation: {0}")]
    Json(#[from] serde_json::Error),
}
