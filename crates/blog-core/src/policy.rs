//! Ownership policy for post mutations.

use crate::domain::{Actor, Post};

/// Mutations that require ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    Update,
    Delete,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether `actor` may perform `action` on `post`.
///
/// Only the owner may update or delete a post.
pub fn authorize(action: PostAction, post: &Post, actor: &Actor) -> Decision {
    match action {
        PostAction::Update | PostAction::Delete if post.user_id == actor.user_id => {
            Decision::Allow
        }
        PostAction::Update | PostAction::Delete => Decision::Deny,
    }
}
