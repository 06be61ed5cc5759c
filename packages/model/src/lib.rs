//! # Blockdoc Model
//!
//! Document model for a block-based code editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ controller: drag/drop, keys (external)      │
//! └─────────────────────────────────────────────┘
//!                     ↓ move_to / clone / find
//! ┌─────────────────────────────────────────────┐
//! │ containers: Block, Indent, Segment, Socket  │
//! │  - own a start/end sentinel pair            │
//! │  - all edits are splices of the token list  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ tokens: doubly linked list in an arena      │
//! │  - stringified by a single forward walk     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **The list is the source of truth**: text is always produced by
//!    walking tokens, never by walking the tree
//! 2. **Containers own only their sentinels**: everything in between belongs
//!    to the list
//! 3. **Spans stay well-nested**: every start sentinel inside a span is
//!    closed before the span ends
//! 4. **Cloning is the only copy**: clones share no tokens with the source
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockdoc_model::Model;
//!
//! let mut model = Model::new();
//! let x = model.new_text("x");
//! let block = model.new_block(&[x.into()], 1)?;
//! let socket = model.new_socket(None, 5)?;
//!
//! model.move_to(block, Some(model.start_of(socket)))?;
//! assert_eq!(model.text(socket)?, "(x)");
//! ```

mod config;
mod container;
mod error;
mod model;
mod relocate;
mod segment;
mod socket;
mod token;
mod traverse;
mod validate;
mod view;

pub use config::ModelConfig;
pub use container::{Child, Container, ContainerId, ContainerKind, SocketContent};
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use token::{FormatState, Token, TokenId, TokenKind};
pub use view::{Entity, NoViews, ViewHandle, ViewProvider};
