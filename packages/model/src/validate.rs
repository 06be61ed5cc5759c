//! Structural checks: link symmetry and well-nestedness of sentinels

use tracing::error;

use crate::{ContainerId, Model, ModelError, ModelResult, TokenId};

impl Model {
    /// Check a container's span: every link is mirrored by its neighbour and
    /// every sentinel inside is closed, in order, before the container ends
    pub fn validate(&self, id: ContainerId) -> ModelResult<()> {
        let (start, end) = (self.start_of(id), self.end_of(id));
        self.check_run(start, Some(end)).map_err(|_| ModelError::ill_formed(id))
    }

    /// Check the whole list that `member` belongs to, logging on failure
    pub(crate) fn verify_list(&self, member: TokenId) -> ModelResult<()> {
        let mut head = member;
        while let Some(prev) = self.token(head).prev {
            head = prev;
        }
        let result = self.check_run(head, None);
        if let Err(e) = &result {
            error!(error = %e, head = %head, "Token list failed verification");
        }
        result
    }

    fn check_run(&self, from: TokenId, until: Option<TokenId>) -> ModelResult<()> {
        let mut open: Vec<ContainerId> = Vec::new();
        let mut cursor = Some(from);

        while let Some(current) = cursor {
            let kind = self.kind(current);
            if let Some(c) = kind.opens() {
                if self.start_of(c) != current {
                    return Err(ModelError::ill_formed(c));
                }
                open.push(c);
            } else if let Some(c) = kind.closes() {
                if self.end_of(c) != current || open.pop() != Some(c) {
                    return Err(ModelError::ill_formed(c));
                }
            }

            if until == Some(current) {
                return if open.is_empty() {
                    Ok(())
                } else {
                    Err(ModelError::ill_formed(open[0]))
                };
            }

            let next = self.token(current).next;
            if let Some(next) = next {
                if self.token(next).prev != Some(current) {
                    return Err(ModelError::DetachedToken(next));
                }
            }
            cursor = next;
        }

        match (until, open.first()) {
            (Some(_), _) => Err(ModelError::DetachedToken(from)),
            (None, Some(c)) => Err(ModelError::ill_formed(*c)),
            (None, None) => Ok(()),
        }
    }
}
