//! # Containers
//!
//! The tree half of the model. A container owns exactly two tokens, its
//! start and end sentinels; everything between them belongs to the list and
//! may in turn belong to nested containers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{TokenId, TokenKind, ViewHandle};

/// Stable index of a container in the model arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub(crate) u32);

impl ContainerId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ContainerKind {
    /// An expression or statement
    Block {
        precedence: i32,
        /// Synthetic parens are currently the first and last content tokens
        paren_wrapped: bool,
        /// Editor UI flag; the model never reads it
        selected: bool,
    },

    /// An indented region
    Indent { depth: usize },

    /// Invisible grouping of siblings
    Segment,

    /// A single slot
    Socket {
        precedence: i32,
        /// Freeform-text socket, interpreted by the controller only
        handwritten: bool,
    },
}

impl ContainerKind {
    pub fn block(precedence: i32) -> Self {
        ContainerKind::Block {
            precedence,
            paren_wrapped: false,
            selected: false,
        }
    }

    pub fn socket(precedence: i32) -> Self {
        ContainerKind::Socket {
            precedence,
            handwritten: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContainerKind::Block { .. } => "block",
            ContainerKind::Indent { .. } => "indent",
            ContainerKind::Segment => "segment",
            ContainerKind::Socket { .. } => "socket",
        }
    }

    pub fn precedence(&self) -> Option<i32> {
        match self {
            ContainerKind::Block { precedence, .. } | ContainerKind::Socket { precedence, .. } => {
                Some(*precedence)
            }
            _ => None,
        }
    }

    /// Start and end sentinel kinds for a container with this kind
    pub(crate) fn sentinels(&self, id: ContainerId) -> (TokenKind, TokenKind) {
        match self {
            ContainerKind::Block { .. } => (TokenKind::BlockStart(id), TokenKind::BlockEnd(id)),
            ContainerKind::Indent { .. } => (TokenKind::IndentStart(id), TokenKind::IndentEnd(id)),
            ContainerKind::Segment => (TokenKind::SegmentStart(id), TokenKind::SegmentEnd(id)),
            ContainerKind::Socket { .. } => (TokenKind::SocketStart(id), TokenKind::SocketEnd(id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Container {
    pub kind: ContainerKind,
    pub(crate) start: TokenId,
    pub(crate) end: TokenId,
    pub(crate) view: ViewHandle,
}

impl Container {
    pub fn start(&self) -> TokenId {
        self.start
    }

    pub fn end(&self) -> TokenId {
        self.end
    }

    pub fn view(&self) -> ViewHandle {
        self.view
    }
}

/// Something a new container can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Token(TokenId),
    Container(ContainerId),
}

impl From<TokenId> for Child {
    fn from(id: TokenId) -> Self {
        Child::Token(id)
    }
}

impl From<ContainerId> for Child {
    fn from(id: ContainerId) -> Self {
        Child::Container(id)
    }
}

/// What a socket currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketContent {
    Container(ContainerId),
    /// Typed-in content that is not wrapped in a container
    Token(TokenId),
}
