//! Post operations: list, show, create, update and delete.
//!
//! Every mutating operation takes the request's [`Actor`] explicitly and runs
//! the same precondition chain: authentication, field validation, lookup,
//! ownership, then the store write.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Actor, Post, PostInput};
use crate::error::{DomainError, RepoError};
use crate::policy::{PostAction, authorize};
use crate::ports::{BaseRepository, PostRepository};

/// Post resource service.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Every stored post, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let posts = self.posts.find_all().await?;
        tracing::debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    pub async fn show(&self, id: Uuid) -> Result<Post, DomainError> {
        self.find(id).await
    }

    pub async fn create(
        &self,
        actor: Option<Actor>,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let actor = actor.ok_or(DomainError::Unauthenticated)?;
        let content = input.into_valid().map_err(DomainError::Validation)?;

        let post = self.posts.insert(Post::new(actor.user_id, content)).await?;
        tracing::info!(post_id = %post.id, user_id = %actor.user_id, "Post created");

        Ok(post)
    }

    pub async fn update(
        &self,
        actor: Option<Actor>,
        id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let actor = actor.ok_or(DomainError::Unauthenticated)?;
        let content = input.into_valid().map_err(DomainError::Validation)?;

        let mut post = self.find(id).await?;
        Self::ensure_allowed(PostAction::Update, &post, &actor)?;

        post.revise(content);
        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| Self::missing_as_not_found(e, id))?;
        tracing::info!(post_id = %post.id, user_id = %actor.user_id, "Post updated");

        Ok(post)
    }

    pub async fn delete(&self, actor: Option<Actor>, id: Uuid) -> Result<(), DomainError> {
        let actor = actor.ok_or(DomainError::Unauthenticated)?;

        let post = self.find(id).await?;
        Self::ensure_allowed(PostAction::Delete, &post, &actor)?;

        self.posts
            .delete(id)
            .await
            .map_err(|e| Self::missing_as_not_found(e, id))?;
        tracing::info!(post_id = %id, user_id = %actor.user_id, "Post deleted");

        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        tracing::debug!(post_id = %id, "Finding post");

        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id,
            })
    }

    fn ensure_allowed(action: PostAction, post: &Post, actor: &Actor) -> Result<(), DomainError> {
        if authorize(action, post, actor).is_allowed() {
            return Ok(());
        }

        tracing::warn!(
            post_id = %post.id,
            owner_id = %post.user_id,
            user_id = %actor.user_id,
            ?action,
            "Denied post mutation by non-owner"
        );
        Err(DomainError::Forbidden)
    }

    // A concurrent delete can remove the row between lookup and write.
    fn missing_as_not_found(err: RepoError, id: Uuid) -> DomainError {
        match err {
            RepoError::NotFound => DomainError::NotFound {
                entity_type: "Post",
                id,
            },
            other => other.into(),
        }
    }
}
