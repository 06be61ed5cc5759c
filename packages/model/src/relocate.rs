//! # Relocation
//!
//! Moving a block or segment is a splice of its whole span, with two
//! clean-ups at the old location and a parenthesization pass at the new one:
//!
//! 1. A segment that held nothing but the moved span is dissolved.
//! 2. If the moved span sat alone on a line, one of the surrounding
//!    newlines is removed so no blank line is left behind.
//! 3. The span is unlinked from its old neighbours.
//! 4. The span is linked in after the target token.
//! 5. Blocks are wrapped in parens when their socket binds tighter than
//!    they do, and unwrapped otherwise. A detached block has no socket, so
//!    it always ends up unwrapped.

use tracing::{debug, instrument};

use crate::{ContainerId, ContainerKind, Model, ModelError, ModelResult, TokenId, TokenKind};

impl Model {
    /// Relocate a block or segment to just after `new_prev`, or detach it
    /// when `new_prev` is `None`.
    #[instrument(skip(self), fields(container = %id))]
    pub fn move_to(&mut self, id: ContainerId, new_prev: Option<TokenId>) -> ModelResult<()> {
        let is_block = match self.container(id).kind {
            ContainerKind::Block { .. } => true,
            ContainerKind::Segment => false,
            _ => return Err(ModelError::wrong_kind(id, "block or segment")),
        };
        let (start, end) = (self.start_of(id), self.end_of(id));

        if let Some(target) = new_prev {
            if self.span_contains(id, target) {
                return Err(ModelError::MoveIntoSelf { container: id });
            }
        }

        // Plan both clean-ups before touching anything so a target that is
        // about to disappear can be re-anchored
        let emptied = self.emptied_segment(id);
        let blank = self.blank_line_newline(id);
        let mut doomed = Vec::new();
        if let Some(segment) = emptied {
            doomed.push(self.start_of(segment));
            doomed.push(self.end_of(segment));
        }
        doomed.extend(blank);

        let target = match new_prev {
            Some(target) => Some(self.surviving_anchor(id, target, &doomed)?),
            None => None,
        };
        if let Some(target) = target {
            self.check_socket_room(id, target)?;
        }

        if let Some(segment) = emptied {
            debug!(segment = %segment, "Dissolving emptied segment");
            self.dissolve(segment)?;
        }
        if let Some(newline) = blank {
            debug!(newline = %newline, "Collapsing blank line");
            self.remove(newline);
        }

        let origin = self.token(start).prev.or(self.token(end).next);
        self.unsplice(start, end);

        if let Some(target) = target {
            self.splice_after(target, start, end);
        }
        if is_block {
            self.check_paren_wrap(id)?;
        }

        if self.config.verify_mutations {
            self.verify_list(start)?;
            if let Some(origin) = origin {
                self.verify_list(origin)?;
            }
            if let Some(target) = target {
                self.verify_list(target)?;
            }
        }
        Ok(())
    }

    /// Wrap or unwrap a block in parens according to its current parent
    #[instrument(level = "debug", skip(self), fields(block = %id))]
    pub fn check_paren_wrap(&mut self, id: ContainerId) -> ModelResult<()> {
        let (precedence, wrapped) = match self.container(id).kind {
            ContainerKind::Block {
                precedence,
                paren_wrapped,
                ..
            } => (precedence, paren_wrapped),
            _ => return Err(ModelError::wrong_kind(id, "block")),
        };

        let needs_parens = match self.structural_parent(id) {
            Some(parent) => match self.container(parent).kind {
                ContainerKind::Socket {
                    precedence: socket, ..
                } => socket > precedence,
                _ => false,
            },
            None => false,
        };

        let (start, end) = (self.start_of(id), self.end_of(id));
        if needs_parens && !wrapped {
            let open = self.new_text(self.config.open_paren.clone());
            let close = self.new_text(self.config.close_paren.clone());
            self.insert(start, open);
            self.insert_before(end, close);
            self.set_paren_wrapped(id, true);
            debug!("Wrapped in parens");
        } else if !needs_parens && wrapped {
            let open = self.token(start).next.ok_or(ModelError::DetachedToken(start))?;
            let close = self.token(end).prev.ok_or(ModelError::DetachedToken(end))?;
            if open == end || close == start {
                return Err(ModelError::ill_formed(id));
            }
            self.remove(open);
            self.remove(close);
            self.set_paren_wrapped(id, false);
            debug!("Removed parens");
        }
        Ok(())
    }

    /// Whether the container sits directly in a socket, looking through any
    /// enclosing segments
    pub fn in_socket(&self, id: ContainerId) -> bool {
        self.structural_parent(id)
            .is_some_and(|parent| matches!(self.container(parent).kind, ContainerKind::Socket { .. }))
    }

    /// Container whose start sentinel immediately precedes this one, once
    /// enclosing segment starts are skipped
    pub fn structural_parent(&self, id: ContainerId) -> Option<ContainerId> {
        let start = self.start_of(id);
        self.parent_of_position(self.token(start).prev?)
    }

    /// Container whose start sentinel is `at` or precedes it across
    /// segment starts
    fn parent_of_position(&self, at: TokenId) -> Option<ContainerId> {
        let mut cursor = at;
        loop {
            match self.kind(cursor) {
                TokenKind::SegmentStart(_) => cursor = self.token(cursor).prev?,
                kind => return kind.opens(),
            }
        }
    }

    /// Innermost non-segment container holding the position right after
    /// `at`. Whole sibling spans are skipped on the way back.
    fn enclosing_container(&self, at: TokenId) -> Option<ContainerId> {
        let mut cursor = at;
        loop {
            let kind = self.kind(cursor);
            if let Some(c) = kind.opens() {
                if !matches!(kind, TokenKind::SegmentStart(_)) {
                    return Some(c);
                }
            } else if let Some(c) = kind.closes() {
                cursor = self.start_of(c);
            }
            cursor = self.token(cursor).prev?;
        }
    }

    fn set_paren_wrapped(&mut self, id: ContainerId, value: bool) {
        if let ContainerKind::Block { paren_wrapped, .. } = &mut self.containers[id.index()].kind {
            *paren_wrapped = value;
        }
    }

    /// Segment that contains exactly this span and nothing else
    fn emptied_segment(&self, id: ContainerId) -> Option<ContainerId> {
        let before = self.token(self.start_of(id)).prev?;
        let after = self.token(self.end_of(id)).next?;
        match self.kind(before) {
            TokenKind::SegmentStart(segment) if self.end_of(*segment) == after => Some(*segment),
            _ => None,
        }
    }

    /// Newline to remove so that taking this span out leaves no blank line.
    ///
    /// Applies when the nearest real token before the span is a newline and
    /// the nearest real token after it is another newline, or the end of an
    /// indent unless that newline opens the indent's first line. There is no
    /// matching rule for the last line of a top-level segment.
    fn blank_line_newline(&self, id: ContainerId) -> Option<TokenId> {
        let before = self.real_prev(self.start_of(id))?;
        let after = self.real_next(self.end_of(id))?;
        if !matches!(self.kind(before), TokenKind::Newline) {
            return None;
        }
        match self.kind(after) {
            TokenKind::Newline => Some(before),
            TokenKind::IndentEnd(_) if !self.opens_indent(before) => Some(before),
            _ => None,
        }
    }

    fn opens_indent(&self, newline: TokenId) -> bool {
        self.real_prev(newline)
            .is_some_and(|t| matches!(self.kind(t), TokenKind::IndentStart(_)))
    }

    /// Nearest token before `from` that is not segment markup or a cursor
    fn real_prev(&self, from: TokenId) -> Option<TokenId> {
        let mut cursor = self.token(from).prev;
        while let Some(t) = cursor {
            if !self.is_invisible(t) {
                return Some(t);
            }
            cursor = self.token(t).prev;
        }
        None
    }

    /// Nearest token after `from` that is not segment markup or a cursor
    fn real_next(&self, from: TokenId) -> Option<TokenId> {
        let mut cursor = self.token(from).next;
        while let Some(t) = cursor {
            if !self.is_invisible(t) {
                return Some(t);
            }
            cursor = self.token(t).next;
        }
        None
    }

    fn is_invisible(&self, t: TokenId) -> bool {
        let kind = self.kind(t);
        kind.is_segment_markup() || matches!(kind, TokenKind::Cursor)
    }

    /// Walk back from a target that is about to be removed to the first
    /// token that will survive. Walking back from the end of an emptied
    /// segment lands on our own end first; that is skipped by jumping to
    /// just before our start.
    fn surviving_anchor(&self, id: ContainerId, target: TokenId, doomed: &[TokenId]) -> ModelResult<TokenId> {
        let (start, end) = (self.start_of(id), self.end_of(id));
        let mut anchor = target;
        loop {
            if anchor == end {
                anchor = self.token(start).prev.ok_or(ModelError::DetachedToken(target))?;
            } else if doomed.contains(&anchor) {
                anchor = self.token(anchor).prev.ok_or(ModelError::DetachedToken(target))?;
            } else {
                return Ok(anchor);
            }
        }
    }

    /// Refuse to drop a container anywhere inside a socket that holds
    /// something other than the container itself
    fn check_socket_room(&self, id: ContainerId, target: TokenId) -> ModelResult<()> {
        let Some(parent) = self.enclosing_container(target) else {
            return Ok(());
        };
        if !matches!(self.container(parent).kind, ContainerKind::Socket { .. }) {
            return Ok(());
        }
        if self.socket_occupied(parent, Some(id))? {
            return Err(ModelError::SocketOverflow { socket: parent });
        }
        Ok(())
    }

    fn unsplice(&mut self, start: TokenId, end: TokenId) {
        let prev = self.tokens[start.index()].prev.take();
        let next = self.tokens[end.index()].next.take();
        if let Some(prev) = prev {
            self.tokens[prev.index()].next = next;
        }
        if let Some(next) = next {
            self.tokens[next.index()].prev = prev;
        }
    }

    fn splice_after(&mut self, target: TokenId, start: TokenId, end: TokenId) {
        let next = self.tokens[target.index()].next;
        self.tokens[end.index()].next = next;
        if let Some(next) = next {
            self.tokens[next.index()].prev = Some(end);
        }
        self.tokens[target.index()].next = Some(start);
        self.tokens[start.index()].prev = Some(target);
    }
}
