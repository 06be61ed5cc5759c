use tracing::instrument;

use crate::{ContainerId, ContainerKind, Model, ModelError, ModelResult};

impl Model {
    /// Take a segment's sentinels out of the list, leaving its contents in
    /// place between the segment's former neighbours. The segment is left
    /// as an empty shell.
    #[instrument(level = "debug", skip(self), fields(segment = %id))]
    pub fn dissolve(&mut self, id: ContainerId) -> ModelResult<()> {
        if !matches!(self.container(id).kind, ContainerKind::Segment) {
            return Err(ModelError::wrong_kind(id, "segment"));
        }
        let (start, end) = (self.start_of(id), self.end_of(id));
        self.remove(start);
        self.remove(end);
        self.append(start, end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dissolve_keeps_text() {
        let mut model = Model::new();
        let one = model.new_text("1");
        let two = model.new_text("2");
        let inner = model.new_segment(&[two.into()]).unwrap();
        let root = model.new_segment(&[one.into(), inner.into()]).unwrap();
        let before = model.text(root).unwrap();

        let one_copy = model.token(model.start_of(root)).next().unwrap();
        let inner_start = model.token(one_copy).next().unwrap();
        let inner = model.owner(inner_start).unwrap();
        model.dissolve(inner).unwrap();

        assert_eq!(model.text(root).unwrap(), before);
        assert_eq!(model.text(inner).unwrap(), "");
        assert!(model.validate(root).is_ok());
    }

    #[test]
    fn test_dissolve_block_fails() {
        let mut model = Model::new();
        let block = model.new_block(&[], 0).unwrap();
        assert!(model.dissolve(block).is_err());
    }
}
