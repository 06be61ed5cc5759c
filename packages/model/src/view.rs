//! # View hook
//!
//! Every token and container asks a [`ViewProvider`] for a companion
//! presentation handle when it is created. The model stores the handle and
//! never looks inside it; rendering lives entirely outside this crate.

use serde::{Deserialize, Serialize};

use crate::{ContainerId, ContainerKind, TokenId, TokenKind};

/// Opaque handle to a presentation object owned by the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewHandle(pub u64);

impl ViewHandle {
    pub const NONE: ViewHandle = ViewHandle(0);
}

/// Entity handed to the provider at construction time
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Token(TokenId, &'a TokenKind),
    Container(ContainerId, &'a ContainerKind),
}

/// Factory for presentation companions, keyed by entity kind
pub trait ViewProvider {
    fn create_view(&mut self, entity: Entity<'_>) -> ViewHandle;
}

/// Provider used when no view layer is attached
#[derive(Debug, Default)]
pub struct NoViews;

impl ViewProvider for NoViews {
    fn create_view(&mut self, _entity: Entity<'_>) -> ViewHandle {
        ViewHandle::NONE
    }
}
