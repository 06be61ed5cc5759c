use crate::traverse::{Segments, SpanItem};
use crate::{ContainerId, ContainerKind, Model, ModelError, ModelResult, SocketContent, TokenKind};

impl Model {
    /// What the socket holds, unwrapped through any segments around it
    pub fn content(&self, id: ContainerId) -> ModelResult<Option<SocketContent>> {
        if !matches!(self.container(id).kind, ContainerKind::Socket { .. }) {
            return Err(ModelError::wrong_kind(id, "socket"));
        }
        let end = self.end_of(id);
        let mut cursor = self.token(self.start_of(id)).next;
        while let Some(current) = cursor {
            if current == end {
                return Ok(None);
            }
            match self.kind(current) {
                // A cursor is caret state, not content
                TokenKind::SegmentStart(_) | TokenKind::SegmentEnd(_) | TokenKind::Cursor => {}
                TokenKind::BlockStart(c) | TokenKind::IndentStart(c) | TokenKind::SocketStart(c) => {
                    return Ok(Some(SocketContent::Container(*c)));
                }
                _ => return Ok(Some(SocketContent::Token(current))),
            }
            cursor = self.token(current).next;
        }
        Err(ModelError::ill_formed(id))
    }

    /// Whether the socket holds anything besides cursors, segment markup
    /// and (optionally) one container that is about to move
    pub(crate) fn socket_occupied(&self, id: ContainerId, ignoring: Option<ContainerId>) -> ModelResult<bool> {
        let occupied = self
            .walk_span(id, Segments::Transparent)?
            .into_iter()
            .any(|item| match item {
                SpanItem::Nested(c) => Some(c) != ignoring,
                SpanItem::Token(t) => !matches!(self.kind(t), TokenKind::Cursor),
            });
        Ok(occupied)
    }
}
