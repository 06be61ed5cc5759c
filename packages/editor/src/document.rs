//! # Document Handle
//!
//! A Document is one model plus the root segment that holds the program.
//! Controllers edit it only through [`Mutation`]s, which keeps a version
//! counter meaningful and every edit logged.
//!
//! ## Lifecycle
//!
//! ```text
//! Config → Document → apply(Mutation)* → text()
//!                         ↓
//!                   move / clone / dissolve
//! ```

use blockdoc_model::{ContainerId, Model, ModelConfig};
use tracing::{debug, instrument, warn};

use crate::{EditorError, Mutation, MutationResult};

#[derive(Debug)]
pub struct Document {
    model: Model,

    /// Segment spanning the whole program
    root: ContainerId,

    /// Current version number (increments on each applied mutation)
    pub version: u64,
}

impl Document {
    /// Create an empty document
    pub fn new(config: ModelConfig) -> Result<Self, EditorError> {
        let mut model = Model::with_config(config);
        let root = model.new_segment(&[])?;
        Ok(Self::from_model(model, root))
    }

    /// Create an empty document from a JSON model config
    pub fn from_config_json(source: &str) -> Result<Self, EditorError> {
        Self::new(ModelConfig::from_json(source)?)
    }

    /// Wrap an existing model whose program lives under `root`
    pub fn from_model(model: Model, root: ContainerId) -> Self {
        Self {
            model,
            root,
            version: 0,
        }
    }

    pub fn root(&self) -> ContainerId {
        self.root
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Direct model access, for building new content before placing it
    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    /// Source text of the whole program
    pub fn text(&self) -> Result<String, EditorError> {
        Ok(self.model.text(self.root)?)
    }

    /// Apply a mutation
    #[instrument(skip(self, mutation), fields(version = self.version))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.guard_root(&mutation)?;

        let created = match mutation.apply(&mut self.model) {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, ?mutation, "Mutation rejected");
                return Err(e.into());
            }
        };
        self.version += 1;
        debug!(?mutation, ?created, version = self.version, "Mutation applied");

        Ok(MutationResult {
            version: self.version,
            created,
        })
    }

    /// Apply a mutation received as JSON
    pub fn apply_json(&mut self, source: &str) -> Result<MutationResult, EditorError> {
        let mutation = Mutation::from_json(source)?;
        self.apply(mutation)
    }

    /// Hit-test from the root
    pub fn find<F>(&self, mut predicate: F) -> Result<Option<ContainerId>, EditorError>
    where
        F: FnMut(&Model, ContainerId) -> bool,
    {
        Ok(self.model.find(self.root, &mut predicate)?)
    }

    /// Detached deep copy of the whole program
    pub fn snapshot(&mut self) -> Result<ContainerId, EditorError> {
        Ok(self.model.clone_container(self.root)?)
    }

    /// The root itself may not be moved or dissolved
    fn guard_root(&self, mutation: &Mutation) -> Result<(), EditorError> {
        let touches_root = match mutation {
            Mutation::MoveContainer { container, .. } => *container == self.root,
            Mutation::DissolveSegment { segment } => *segment == self.root,
            _ => false,
        };
        if touches_root {
            return Err(crate::MutationError::InvalidStructure(
                "The document root cannot be moved or dissolved".to_string(),
            )
            .into());
        }
        Ok(())
    }
}
