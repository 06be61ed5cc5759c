//! # Blockdoc Editor
//!
//! Document editing layer over the block model.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ controller: pointer / keyboard (external)   │
//! └─────────────────────────────────────────────┘
//!                     ↓ Mutation (JSON)
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + mutations                │
//! │  - Validate ids and container kinds         │
//! │  - Apply as token-list splices              │
//! │  - Version counter, structured logging      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ model: tokens + Block/Indent/Segment/Socket │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockdoc_editor::{Document, Mutation};
//!
//! let mut doc = Document::new(Default::default())?;
//! let x = doc.model_mut().new_text("x");
//! let block = doc.model_mut().new_block(&[x.into()], 1)?;
//!
//! let after = doc.model().start_of(doc.root());
//! doc.apply(Mutation::MoveContainer { container: block, after: Some(after) })?;
//! assert_eq!(doc.text()?, "x");
//! ```

mod document;
mod errors;
mod mutations;

pub use document::Document;
pub use errors::EditorError;
pub use mutations::{Created, Mutation, MutationError, MutationResult};

// Re-export model types for convenience
pub use blockdoc_model::{Child, ContainerId, ContainerKind, Model, ModelConfig, TokenId};
