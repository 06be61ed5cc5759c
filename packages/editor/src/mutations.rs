//! # Mutations
//!
//! The operations a controller may perform on a document, as plain data.
//!
//! ## Design Principles
//!
//! 1. **Structural**: every mutation is a splice of the token list
//! 2. **Validated**: ids and container kinds are checked before anything moves
//! 3. **Serializable**: mutations travel as JSON between controller and model
//!
//! ## Mutation Semantics
//!
//! ### MoveContainer
//! - Relocates a block or segment after a token, or detaches it
//! - Leaves no emptied segment and no blank line behind
//! - Re-evaluates parens at the destination
//!
//! ### SetPrecedence
//! - Changing a block re-checks its own parens
//! - Changing a socket re-checks the block it holds

use blockdoc_model::{
    ContainerId, ContainerKind, Model, ModelError, SocketContent, TokenId, TokenKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Move a block or segment after `after`, or detach it
    MoveContainer {
        container: ContainerId,
        after: Option<TokenId>,
    },

    /// Place a deep copy of a container after `after`
    CloneContainer {
        container: ContainerId,
        after: Option<TokenId>,
    },

    /// Remove a segment's boundary, keeping its contents
    DissolveSegment {
        segment: ContainerId,
    },

    /// Change the precedence of a block or socket
    SetPrecedence {
        container: ContainerId,
        precedence: i32,
    },

    /// Mark a socket as freeform text
    SetHandwritten {
        socket: ContainerId,
        handwritten: bool,
    },

    /// Insert a text token after `after`
    InsertText {
        after: TokenId,
        text: String,
    },

    /// Remove a leaf token
    RemoveToken {
        token: TokenId,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Container not found: {0}")]
    ContainerNotFound(ContainerId),

    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Entity created by a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Created {
    Container(ContainerId),
    Token(TokenId),
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// What the mutation created, if anything
    pub created: Option<Created>,
}

impl Mutation {
    /// Apply mutation to the model with validation
    pub fn apply(&self, model: &mut Model) -> Result<Option<Created>, MutationError> {
        self.validate(model)?;

        match self {
            Mutation::MoveContainer { container, after } => {
                model.move_to(*container, *after)?;
                Ok(None)
            }

            Mutation::CloneContainer { container, after } => {
                let copy = model.clone_container(*container)?;
                if after.is_some() {
                    model.move_to(copy, *after)?;
                }
                Ok(Some(Created::Container(copy)))
            }

            Mutation::DissolveSegment { segment } => {
                model.dissolve(*segment)?;
                Ok(None)
            }

            Mutation::SetPrecedence {
                container,
                precedence,
            } => {
                model.set_precedence(*container, *precedence)?;
                Self::recheck_parens(model, *container)?;
                Ok(None)
            }

            Mutation::SetHandwritten {
                socket,
                handwritten,
            } => {
                model.set_handwritten(*socket, *handwritten)?;
                Ok(None)
            }

            Mutation::InsertText { after, text } => {
                let token = model.new_text(text.clone());
                model.insert(*after, token);
                Ok(Some(Created::Token(token)))
            }

            Mutation::RemoveToken { token } => {
                model.remove(*token);
                Ok(None)
            }
        }
    }

    fn recheck_parens(model: &mut Model, container: ContainerId) -> Result<(), MutationError> {
        match model.container(container).kind {
            ContainerKind::Block { .. } => model.check_paren_wrap(container)?,
            ContainerKind::Socket { .. } => {
                if let Some(SocketContent::Container(child)) = model.content(container)? {
                    if matches!(model.container(child).kind, ContainerKind::Block { .. }) {
                        model.check_paren_wrap(child)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Validate without applying
    pub fn validate(&self, model: &Model) -> Result<(), MutationError> {
        match self {
            Mutation::MoveContainer { container, after }
            | Mutation::CloneContainer { container, after } => {
                Self::check_container(model, *container)?;
                if let Some(after) = after {
                    Self::check_attached(model, *after)?;
                }
                // A clone with no target stays detached, so any kind may be cloned
                if matches!(self, Mutation::MoveContainer { .. }) || after.is_some() {
                    match model.container(*container).kind {
                        ContainerKind::Block { .. } | ContainerKind::Segment => {}
                        _ => {
                            return Err(MutationError::InvalidStructure(
                                "Only blocks and segments can be placed".to_string(),
                            ))
                        }
                    }
                }
                Ok(())
            }

            Mutation::DissolveSegment { segment } => {
                Self::check_container(model, *segment)?;
                match model.container(*segment).kind {
                    ContainerKind::Segment => Ok(()),
                    _ => Err(MutationError::InvalidStructure(format!(
                        "{} is not a segment",
                        segment
                    ))),
                }
            }

            Mutation::SetPrecedence { container, .. } => {
                Self::check_container(model, *container)?;
                match model.container(*container).kind.precedence() {
                    Some(_) => Ok(()),
                    None => Err(MutationError::InvalidStructure(format!(
                        "{} has no precedence",
                        container
                    ))),
                }
            }

            Mutation::SetHandwritten { socket, .. } => {
                Self::check_container(model, *socket)?;
                match model.container(*socket).kind {
                    ContainerKind::Socket { .. } => Ok(()),
                    _ => Err(MutationError::InvalidStructure(format!(
                        "{} is not a socket",
                        socket
                    ))),
                }
            }

            Mutation::InsertText { after, .. } => {
                Self::check_attached(model, *after)?;
                if model.kind(*after).closes().is_some() && model.token(*after).next().is_none() {
                    return Err(MutationError::InvalidStructure(
                        "Cannot insert after the end of the document".to_string(),
                    ));
                }
                Ok(())
            }

            Mutation::RemoveToken { token } => {
                Self::check_token(model, *token)?;
                match model.kind(*token) {
                    TokenKind::Text(_) | TokenKind::Newline | TokenKind::Cursor => Ok(()),
                    _ => Err(ModelError::LoneMarkup(*token).into()),
                }
            }
        }
    }

    fn check_container(model: &Model, id: ContainerId) -> Result<(), MutationError> {
        if model.has_container(id) {
            Ok(())
        } else {
            Err(MutationError::ContainerNotFound(id))
        }
    }

    fn check_token(model: &Model, id: TokenId) -> Result<(), MutationError> {
        if model.has_token(id) {
            Ok(())
        } else {
            Err(MutationError::TokenNotFound(id))
        }
    }

    /// Target tokens must still be on a list. A lone container start counts:
    /// it is always linked to its own end.
    fn check_attached(model: &Model, id: TokenId) -> Result<(), MutationError> {
        Self::check_token(model, id)?;
        if model.token(id).is_detached() {
            return Err(ModelError::DetachedToken(id).into());
        }
        Ok(())
    }

    /// Parse a mutation from its JSON form
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_serialization() {
        let mut model = Model::new();
        let block = model.new_block(&[], 0).unwrap();
        let mutation = Mutation::MoveContainer {
            container: block,
            after: Some(model.start_of(block)),
        };

        let json = mutation.to_json().unwrap();
        let deserialized = Mutation::from_json(&json).unwrap();

        assert_eq!(mutation, deserialized);
    }

    #[test]
    fn test_validation_rejects_unknown_ids() {
        let model = Model::new();
        let mutation = Mutation::from_json(r#"{"DissolveSegment":{"segment":7}}"#).unwrap();

        assert!(matches!(
            mutation.validate(&model),
            Err(MutationError::ContainerNotFound(_))
        ));
    }

    #[test]
    fn test_validation_rejects_markup_removal() {
        let mut model = Model::new();
        let block = model.new_block(&[], 0).unwrap();
        let mutation = Mutation::RemoveToken {
            token: model.start_of(block),
        };

        assert!(matches!(
            mutation.validate(&model),
            Err(MutationError::Model(ModelError::LoneMarkup(_)))
        ));
    }

    #[test]
    fn test_placed_clone_must_be_block_or_segment() {
        let mut model = Model::new();
        let socket = model.new_socket(None, 0).unwrap();
        let root = model.new_segment(&[]).unwrap();
        let before = model.container_count();

        let placed = Mutation::CloneContainer {
            container: socket,
            after: Some(model.start_of(root)),
        };
        assert!(matches!(
            placed.validate(&model),
            Err(MutationError::InvalidStructure(_))
        ));
        assert!(placed.apply(&mut model).is_err());
        assert_eq!(model.container_count(), before);

        let detached = Mutation::CloneContainer {
            container: socket,
            after: None,
        };
        assert!(matches!(
            detached.apply(&mut model),
            Ok(Some(Created::Container(_)))
        ));
    }

    #[test]
    fn test_socket_precedence_rechecks_child() {
        let mut model = Model::new();
        let x = model.new_text("x");
        let block = model.new_block(&[x.into()], 2).unwrap();
        let socket = model.new_socket(None, 0).unwrap();
        model.move_to(block, Some(model.start_of(socket))).unwrap();
        assert_eq!(model.text(socket).unwrap(), "x");

        Mutation::SetPrecedence {
            container: socket,
            precedence: 7,
        }
        .apply(&mut model)
        .unwrap();
        assert_eq!(model.text(socket).unwrap(), "(x)");
    }
}
