//! # Tokens
//!
//! The flat half of the model: a doubly linked list of tokens stored in the
//! [`Model`] arena. Leaf tokens carry text; markup tokens are the start/end
//! sentinels of containers and carry the id of the container that owns them.
//!
//! Splicing only rewrites `prev`/`next` indices, so a detached token simply
//! stays in the arena with both links cleared.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ContainerId, ContainerKind, Model, ViewHandle};

/// Stable index of a token in the model arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub(crate) u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum TokenKind {
    Text(String),
    Newline,
    Cursor,
    BlockStart(ContainerId),
    BlockEnd(ContainerId),
    SocketStart(ContainerId),
    SocketEnd(ContainerId),
    SegmentStart(ContainerId),
    SegmentEnd(ContainerId),
    IndentStart(ContainerId),
    IndentEnd(ContainerId),
}

impl TokenKind {
    /// Container whose span this token opens, if it is a start sentinel
    pub fn opens(&self) -> Option<ContainerId> {
        match self {
            TokenKind::BlockStart(c)
            | TokenKind::SocketStart(c)
            | TokenKind::SegmentStart(c)
            | TokenKind::IndentStart(c) => Some(*c),
            _ => None,
        }
    }

    /// Container whose span this token closes, if it is an end sentinel
    pub fn closes(&self) -> Option<ContainerId> {
        match self {
            TokenKind::BlockEnd(c)
            | TokenKind::SocketEnd(c)
            | TokenKind::SegmentEnd(c)
            | TokenKind::IndentEnd(c) => Some(*c),
            _ => None,
        }
    }

    pub fn is_markup(&self) -> bool {
        self.opens().is_some() || self.closes().is_some()
    }

    pub fn is_segment_markup(&self) -> bool {
        matches!(self, TokenKind::SegmentStart(_) | TokenKind::SegmentEnd(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Text(_) => "text",
            TokenKind::Newline => "newline",
            TokenKind::Cursor => "cursor",
            TokenKind::BlockStart(_) => "blockStart",
            TokenKind::BlockEnd(_) => "blockEnd",
            TokenKind::SocketStart(_) => "socketStart",
            TokenKind::SocketEnd(_) => "socketEnd",
            TokenKind::SegmentStart(_) => "segmentStart",
            TokenKind::SegmentEnd(_) => "segmentEnd",
            TokenKind::IndentStart(_) => "indentStart",
            TokenKind::IndentEnd(_) => "indentEnd",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub(crate) prev: Option<TokenId>,
    pub(crate) next: Option<TokenId>,
    pub(crate) view: ViewHandle,
}

impl Token {
    pub fn prev(&self) -> Option<TokenId> {
        self.prev
    }

    pub fn next(&self) -> Option<TokenId> {
        self.next
    }

    pub fn view(&self) -> ViewHandle {
        self.view
    }

    pub fn is_detached(&self) -> bool {
        self.prev.is_none() && self.next.is_none()
    }
}

/// Accumulator threaded through stringification
#[derive(Debug, Default, Clone)]
pub struct FormatState {
    pub out: String,
    /// Spaces emitted after every newline; grows inside indents
    pub indent: String,
}

// Splice primitives

impl Model {
    /// Link `token` directly after `head`. Any existing `head.next` is
    /// overwritten, so this is only for building fresh chains.
    pub fn append(&mut self, head: TokenId, token: TokenId) -> TokenId {
        self.tokens[token.index()].prev = Some(head);
        self.tokens[head.index()].next = Some(token);
        token
    }

    /// Insert `token` immediately after `at`
    pub fn insert(&mut self, at: TokenId, token: TokenId) -> TokenId {
        let next = self.tokens[at.index()].next;
        {
            let t = &mut self.tokens[token.index()];
            t.prev = Some(at);
            t.next = next;
        }
        if let Some(next) = next {
            self.tokens[next.index()].prev = Some(token);
        }
        self.tokens[at.index()].next = Some(token);
        token
    }

    /// Insert `token` immediately before `at`
    pub fn insert_before(&mut self, at: TokenId, token: TokenId) -> TokenId {
        let prev = self.tokens[at.index()].prev;
        {
            let t = &mut self.tokens[token.index()];
            t.next = Some(at);
            t.prev = prev;
        }
        if let Some(prev) = prev {
            self.tokens[prev.index()].next = Some(token);
        }
        self.tokens[at.index()].prev = Some(token);
        token
    }

    /// Splice `token` out of its list. Safe to call on a detached token.
    pub fn remove(&mut self, token: TokenId) {
        let (prev, next) = {
            let t = &mut self.tokens[token.index()];
            (t.prev.take(), t.next.take())
        };
        if let Some(prev) = prev {
            self.tokens[prev.index()].next = next;
        }
        if let Some(next) = next {
            self.tokens[next.index()].prev = prev;
        }
    }

    /// Text of `from` and every token after it
    pub fn stringify_from(&self, from: TokenId) -> String {
        let mut state = FormatState::default();
        self.render(from, None, &mut state);
        state.out
    }

    /// Render forward from `from` into `state`.
    ///
    /// Stops right after `until` has been rendered and returns the output
    /// length at that boundary; returns `None` if the walk ran off the end
    /// of the list without meeting `until`.
    pub fn render(&self, from: TokenId, until: Option<TokenId>, state: &mut FormatState) -> Option<usize> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            self.render_token(id, state);
            if until == Some(id) {
                return Some(state.out.len());
            }
            cursor = self.tokens[id.index()].next;
        }
        None
    }

    fn render_token(&self, id: TokenId, state: &mut FormatState) {
        match &self.tokens[id.index()].kind {
            TokenKind::Text(value) => state.out.push_str(value),
            TokenKind::Newline => {
                state.out.push('\n');
                state.out.push_str(&state.indent);
            }
            TokenKind::IndentStart(c) => {
                let depth = self.indent_depth(*c);
                state.indent.extend(std::iter::repeat(' ').take(depth));
            }
            TokenKind::IndentEnd(c) => {
                let depth = self.indent_depth(*c);
                let keep = state.indent.len().saturating_sub(depth);
                state.indent.truncate(keep);
            }
            _ => {}
        }
    }

    fn indent_depth(&self, c: ContainerId) -> usize {
        match self.containers[c.index()].kind {
            ContainerKind::Indent { depth } => depth,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Model;

    fn chain(model: &mut Model, parts: &[&str]) -> Vec<crate::TokenId> {
        let ids: Vec<_> = parts.iter().map(|p| model.new_text(*p)).collect();
        for pair in ids.windows(2) {
            model.append(pair[0], pair[1]);
        }
        ids
    }

    #[test]
    fn test_insert_after_tail() {
        let mut model = Model::new();
        let ids = chain(&mut model, &["a", "b"]);
        let c = model.new_text("c");
        model.insert(ids[1], c);
        assert_eq!(model.stringify_from(ids[0]), "abc");
        assert_eq!(model.token(c).prev(), Some(ids[1]));
        assert_eq!(model.token(c).next(), None);
    }

    #[test]
    fn test_insert_before_head_and_middle() {
        let mut model = Model::new();
        let ids = chain(&mut model, &["a", "c"]);
        let b = model.new_text("b");
        model.insert_before(ids[1], b);
        let z = model.new_text("z");
        model.insert_before(ids[0], z);
        assert_eq!(model.stringify_from(z), "zabc");
        assert_eq!(model.token(ids[0]).prev(), Some(z));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut model = Model::new();
        let ids = chain(&mut model, &["a", "b", "c"]);
        model.remove(ids[1]);
        model.remove(ids[1]);
        assert!(model.token(ids[1]).is_detached());
        assert_eq!(model.stringify_from(ids[0]), "ac");
        assert_eq!(model.token(ids[2]).prev(), Some(ids[0]));
    }

    #[test]
    fn test_newline_renders_current_indent() {
        let mut model = Model::new();
        let a = model.new_text("a");
        let nl = model.new_newline();
        let b = model.new_text("b");
        model.append(a, nl);
        model.append(nl, b);
        assert_eq!(model.stringify_from(a), "a\nb");
    }

    #[test]
    fn test_render_reports_boundary() {
        let mut model = Model::new();
        let ids = chain(&mut model, &["ab", "cd", "ef"]);
        let mut state = crate::FormatState::default();
        let boundary = model.render(ids[0], Some(ids[1]), &mut state);
        assert_eq!(boundary, Some(4));
        assert_eq!(state.out, "abcd");
    }
}
