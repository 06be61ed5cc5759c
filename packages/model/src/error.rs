//! Error types for the token model
//!
//! Every variant is a contract violation by the caller (or a corrupted
//! list), never a user-facing condition. Nothing here is retried.

use crate::{ContainerId, TokenId};
use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Token {0} is detached where a neighbour was required")]
    DetachedToken(TokenId),

    #[error("Span of container {container} is not well-nested")]
    IllFormedSpan { container: ContainerId },

    #[error("Socket {socket} already holds a child")]
    SocketOverflow { socket: ContainerId },

    #[error("Cannot move container {container} into its own span")]
    MoveIntoSelf { container: ContainerId },

    #[error("Container {container} is not a {expected}")]
    WrongKind {
        container: ContainerId,
        expected: &'static str,
    },

    #[error("Markup token {0} cannot be used without its container")]
    LoneMarkup(TokenId),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ModelError {
    pub fn ill_formed(container: ContainerId) -> Self {
        Self::IllFormedSpan { container }
    }

    pub fn wrong_kind(container: ContainerId, expected: &'static str) -> Self {
        Self::WrongKind {
            container,
            expected,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Config(e.to_string())
    }
}
