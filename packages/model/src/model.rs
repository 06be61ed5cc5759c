//! # Model Arena
//!
//! Owns every token and container. Ids handed out by the model stay valid
//! for its whole lifetime; splicing something out of the list leaves it in
//! the arena as a dead entry.

use std::fmt;

use tracing::trace;

use crate::{
    Child, Container, ContainerId, ContainerKind, Entity, FormatState, ModelConfig, ModelError,
    ModelResult, NoViews, SocketContent, Token, TokenId, TokenKind, ViewProvider,
};

pub struct Model {
    pub(crate) tokens: Vec<Token>,
    pub(crate) containers: Vec<Container>,
    pub(crate) config: ModelConfig,
    views: Box<dyn ViewProvider>,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("tokens", &self.tokens.len())
            .field("containers", &self.containers.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self::with_views(config, Box::new(NoViews))
    }

    /// Create a model whose entities obtain view handles from `views`
    pub fn with_views(config: ModelConfig, views: Box<dyn ViewProvider>) -> Self {
        Self {
            tokens: Vec::new(),
            containers: Vec::new(),
            config,
            views,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.index()]
    }

    pub fn kind(&self, id: TokenId) -> &TokenKind {
        &self.tokens[id.index()].kind
    }

    pub fn start_of(&self, id: ContainerId) -> TokenId {
        self.containers[id.index()].start
    }

    pub fn end_of(&self, id: ContainerId) -> TokenId {
        self.containers[id.index()].end
    }

    /// Whether `id` was handed out by this model
    pub fn has_token(&self, id: TokenId) -> bool {
        id.index() < self.tokens.len()
    }

    pub fn has_container(&self, id: ContainerId) -> bool {
        id.index() < self.containers.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    /// Container owning a markup token
    pub fn owner(&self, id: TokenId) -> Option<ContainerId> {
        let kind = self.kind(id);
        kind.opens().or_else(|| kind.closes())
    }

    // Allocation

    pub(crate) fn alloc_token(&mut self, kind: TokenKind) -> TokenId {
        let id = TokenId(self.tokens.len() as u32);
        let view = self.views.create_view(Entity::Token(id, &kind));
        self.tokens.push(Token {
            kind,
            prev: None,
            next: None,
            view,
        });
        id
    }

    /// Create an empty container: its sentinels linked to each other
    pub(crate) fn alloc_container(&mut self, kind: ContainerKind) -> ContainerId {
        let id = ContainerId(self.containers.len() as u32);
        let (start_kind, end_kind) = kind.sentinels(id);
        let start = self.alloc_token(start_kind);
        let end = self.alloc_token(end_kind);
        self.append(start, end);

        let view = self.views.create_view(Entity::Container(id, &kind));
        self.containers.push(Container {
            kind,
            start,
            end,
            view,
        });
        trace!(container = %id, kind = self.containers[id.index()].kind.name(), "Allocated container");
        id
    }

    pub fn new_text(&mut self, value: impl Into<String>) -> TokenId {
        self.alloc_token(TokenKind::Text(value.into()))
    }

    pub fn new_newline(&mut self) -> TokenId {
        self.alloc_token(TokenKind::Newline)
    }

    pub fn new_cursor(&mut self) -> TokenId {
        self.alloc_token(TokenKind::Cursor)
    }

    /// Copy a single leaf token. Markup sentinels are refused because a
    /// copy would claim a container that does not own it.
    pub fn clone_token(&mut self, id: TokenId) -> ModelResult<TokenId> {
        let kind = self.kind(id).clone();
        if kind.is_markup() {
            return Err(ModelError::LoneMarkup(id));
        }
        Ok(self.alloc_token(kind))
    }

    // Constructors. Children are cloned on the way in, so the caller's
    // originals are never linked into the new container.

    pub fn new_block(&mut self, children: &[Child], precedence: i32) -> ModelResult<ContainerId> {
        self.build(ContainerKind::block(precedence), children)
    }

    pub fn new_indent(&mut self, children: &[Child], depth: usize) -> ModelResult<ContainerId> {
        self.build(ContainerKind::Indent { depth }, children)
    }

    pub fn new_segment(&mut self, children: &[Child]) -> ModelResult<ContainerId> {
        self.build(ContainerKind::Segment, children)
    }

    /// A socket holding a copy of `content`. A block placed in it is
    /// wrapped in parens right away if the socket binds tighter.
    pub fn new_socket(&mut self, content: Option<Child>, precedence: i32) -> ModelResult<ContainerId> {
        let children: Vec<Child> = content.into_iter().collect();
        let id = self.build(ContainerKind::socket(precedence), &children)?;
        if let Some(SocketContent::Container(child)) = self.content(id)? {
            if matches!(self.container(child).kind, ContainerKind::Block { .. }) {
                self.check_paren_wrap(child)?;
            }
        }
        Ok(id)
    }

    fn build(&mut self, kind: ContainerKind, children: &[Child]) -> ModelResult<ContainerId> {
        let id = self.alloc_container(kind);
        let mut tail = self.start_of(id);
        for child in children {
            let (first, last) = match *child {
                Child::Token(t) => {
                    let copy = self.clone_token(t)?;
                    (copy, copy)
                }
                Child::Container(c) => {
                    let copy = self.clone_container(c)?;
                    (self.start_of(copy), self.end_of(copy))
                }
            };
            self.append(tail, first);
            tail = last;
        }
        let end = self.end_of(id);
        self.append(tail, end);
        Ok(id)
    }

    // Attributes

    pub fn set_precedence(&mut self, id: ContainerId, value: i32) -> ModelResult<()> {
        match &mut self.containers[id.index()].kind {
            ContainerKind::Block { precedence, .. } | ContainerKind::Socket { precedence, .. } => {
                *precedence = value;
                Ok(())
            }
            _ => Err(ModelError::wrong_kind(id, "block or socket")),
        }
    }

    pub fn set_selected(&mut self, id: ContainerId, value: bool) -> ModelResult<()> {
        match &mut self.containers[id.index()].kind {
            ContainerKind::Block { selected, .. } => {
                *selected = value;
                Ok(())
            }
            _ => Err(ModelError::wrong_kind(id, "block")),
        }
    }

    pub fn set_handwritten(&mut self, id: ContainerId, value: bool) -> ModelResult<()> {
        match &mut self.containers[id.index()].kind {
            ContainerKind::Socket { handwritten, .. } => {
                *handwritten = value;
                Ok(())
            }
            _ => Err(ModelError::wrong_kind(id, "socket")),
        }
    }

    pub fn is_paren_wrapped(&self, id: ContainerId) -> bool {
        matches!(
            self.containers[id.index()].kind,
            ContainerKind::Block {
                paren_wrapped: true,
                ..
            }
        )
    }

    // Stringification

    /// Exact source text spanned by a container, sentinels included
    pub fn text(&self, id: ContainerId) -> ModelResult<String> {
        let mut state = FormatState::default();
        self.render_container(id, &mut state)?;
        Ok(state.out)
    }

    /// Render a container into `state`, returning the output length at its
    /// end boundary
    pub fn render_container(&self, id: ContainerId, state: &mut FormatState) -> ModelResult<usize> {
        let container = self.container(id);
        self.render(container.start, Some(container.end), state)
            .ok_or(ModelError::ill_formed(id))
    }
}
