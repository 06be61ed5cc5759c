//! # Span traversal
//!
//! One walker over the tokens between a container's sentinels, shared by
//! clone and find for every container kind. A nested container is reported
//! once and then skipped as a unit by jumping past its end sentinel.

use tracing::instrument;

use crate::{ContainerId, ContainerKind, Model, ModelError, ModelResult, TokenId, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpanItem {
    Token(TokenId),
    Nested(ContainerId),
}

/// How nested segments are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segments {
    /// As nested containers
    Opaque,
    /// Sentinels skipped, contents reported as if they were direct children
    Transparent,
}

impl Model {
    /// Direct children of `id`, in list order
    pub(crate) fn walk_span(&self, id: ContainerId, segments: Segments) -> ModelResult<Vec<SpanItem>> {
        let container = self.container(id);
        let end = container.end;
        let mut items = Vec::new();
        let mut open_segments: Vec<ContainerId> = Vec::new();
        let mut cursor = self.token(container.start).next;

        loop {
            let current = cursor.ok_or(ModelError::ill_formed(id))?;
            if current == end {
                if !open_segments.is_empty() {
                    return Err(ModelError::ill_formed(id));
                }
                return Ok(items);
            }

            match self.kind(current) {
                TokenKind::SegmentStart(s) if segments == Segments::Transparent => {
                    open_segments.push(*s);
                }
                TokenKind::SegmentEnd(s) if segments == Segments::Transparent => {
                    if open_segments.pop() != Some(*s) {
                        return Err(ModelError::ill_formed(id));
                    }
                }
                kind => {
                    if let Some(nested) = kind.opens() {
                        if self.start_of(nested) != current {
                            return Err(ModelError::ill_formed(id));
                        }
                        items.push(SpanItem::Nested(nested));
                        cursor = self.token(self.end_of(nested)).next;
                        continue;
                    }
                    if kind.closes().is_some() {
                        return Err(ModelError::ill_formed(id));
                    }
                    items.push(SpanItem::Token(current));
                }
            }
            cursor = self.token(current).next;
        }
    }

    /// Deep copy of a container sharing no tokens with the original.
    /// Cursor tokens are left behind; a block's selection flag is not copied.
    #[instrument(level = "trace", skip(self), fields(container = %id))]
    pub fn clone_container(&mut self, id: ContainerId) -> ModelResult<ContainerId> {
        let items = self.walk_span(id, Segments::Opaque)?;
        let kind = match self.container(id).kind.clone() {
            ContainerKind::Block {
                precedence,
                paren_wrapped,
                ..
            } => ContainerKind::Block {
                precedence,
                paren_wrapped,
                selected: false,
            },
            other => other,
        };

        let copy = self.alloc_container(kind);
        let mut tail = self.start_of(copy);
        for item in items {
            let (first, last) = match item {
                SpanItem::Token(t) => {
                    if matches!(self.kind(t), TokenKind::Cursor) {
                        continue;
                    }
                    let t = self.clone_token(t)?;
                    (t, t)
                }
                SpanItem::Nested(nested) => {
                    let nested = self.clone_container(nested)?;
                    (self.start_of(nested), self.end_of(nested))
                }
            };
            self.append(tail, first);
            tail = last;
        }
        let end = self.end_of(copy);
        self.append(tail, end);
        Ok(copy)
    }

    /// Hit-test below and including `id`.
    ///
    /// Children are scanned in order with segments treated as transparent.
    /// The first nested block, indent or socket accepted by `predicate` wins
    /// and the search continues inside it, returning whatever it returns.
    /// Only when no child matches is `id` itself tested. The result is the
    /// deepest match along the first matching chain.
    pub fn find<F>(&self, id: ContainerId, predicate: &mut F) -> ModelResult<Option<ContainerId>>
    where
        F: FnMut(&Model, ContainerId) -> bool,
    {
        for item in self.walk_span(id, Segments::Transparent)? {
            if let SpanItem::Nested(nested) = item {
                if predicate(self, nested) {
                    return self.find(nested, predicate);
                }
            }
        }
        Ok(predicate(self, id).then_some(id))
    }

    /// Whether `target` lies on the list between the container's sentinels,
    /// sentinels included
    pub fn span_contains(&self, id: ContainerId, target: TokenId) -> bool {
        let container = self.container(id);
        let mut cursor = Some(container.start);
        while let Some(current) = cursor {
            if current == target {
                return true;
            }
            if current == container.end {
                break;
            }
            cursor = self.token(current).next;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Child;

    fn sample(model: &mut Model) -> ContainerId {
        let x = model.new_text("x");
        let inner = model.new_block(&[x.into()], 1).unwrap();
        let socket = model.new_socket(Some(inner.into()), 5).unwrap();
        let plus = model.new_text("+");
        let cursor = model.new_cursor();
        model.new_block(&[socket.into(), plus.into(), cursor.into()], 2).unwrap()
    }

    fn tokens_of(model: &Model, id: ContainerId) -> Vec<TokenId> {
        let mut out = Vec::new();
        let mut cursor = Some(model.start_of(id));
        while let Some(t) = cursor {
            out.push(t);
            if t == model.end_of(id) {
                break;
            }
            cursor = model.token(t).next();
        }
        out
    }

    #[test]
    fn test_clone_is_independent() {
        let mut model = Model::new();
        let block = sample(&mut model);
        let copy = model.clone_container(block).unwrap();

        assert_eq!(model.text(copy).unwrap(), model.text(block).unwrap());
        let original = tokens_of(&model, block);
        for t in tokens_of(&model, copy) {
            assert!(!original.contains(&t));
        }
    }

    #[test]
    fn test_clone_drops_cursor() {
        let mut model = Model::new();
        let block = sample(&mut model);
        let copy = model.clone_container(block).unwrap();

        let cursors = |model: &Model, id| {
            tokens_of(model, id)
                .into_iter()
                .filter(|t| matches!(model.kind(*t), TokenKind::Cursor))
                .count()
        };
        assert_eq!(cursors(&model, block), 1);
        assert_eq!(cursors(&model, copy), 0);
    }

    #[test]
    fn test_clone_nested_segment_gets_new_owner() {
        let mut model = Model::new();
        let a = model.new_text("a");
        let segment = model.new_segment(&[a.into()]).unwrap();
        let block = model.new_block(&[segment.into()], 0).unwrap();
        let copy = model.clone_container(block).unwrap();

        let first = model.token(model.start_of(copy)).next().unwrap();
        let owner = model.owner(first).unwrap();
        assert_eq!(model.start_of(owner), first);
        assert_eq!(model.text(copy).unwrap(), "a");
    }

    #[test]
    fn test_find_descends_then_tests_self() {
        let mut model = Model::new();
        let block = sample(&mut model);
        let blocks = |model: &Model, c: ContainerId| {
            matches!(model.container(c).kind, ContainerKind::Block { .. })
        };

        // The outer block has no block as a direct child, so it matches itself
        assert_eq!(model.find(block, &mut |m, c| blocks(m, c)).unwrap(), Some(block));

        // Accepting everything walks down to the innermost block
        let found = model.find(block, &mut |_, _| true).unwrap().unwrap();
        assert_eq!(model.text(found).unwrap(), "(x)");
        assert_eq!(model.container(found).kind.precedence(), Some(1));
    }

    #[test]
    fn test_find_sees_through_segments() {
        let mut model = Model::new();
        let y = model.new_text("y");
        let inner = model.new_block(&[y.into()], 0).unwrap();
        let segment = model.new_segment(&[inner.into()]).unwrap();
        let outer = model.new_indent(&[Child::Container(segment)], 2).unwrap();

        let found = model
            .find(outer, &mut |m, c| matches!(m.container(c).kind, ContainerKind::Block { .. }))
            .unwrap();
        let found = found.unwrap();
        assert_eq!(model.text(found).unwrap(), "y");
    }

    #[test]
    fn test_find_none() {
        let mut model = Model::new();
        let block = sample(&mut model);
        assert_eq!(model.find(block, &mut |_, _| false).unwrap(), None);
    }

    #[test]
    fn test_walk_detects_detached_end() {
        let mut model = Model::new();
        let a = model.new_text("a");
        let block = model.new_block(&[a.into()], 0).unwrap();
        let end = model.end_of(block);
        model.remove(end);
        assert_eq!(
            model.clone_container(block),
            Err(ModelError::IllFormedSpan { container: block })
        );
    }
}
