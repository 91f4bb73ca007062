use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::FieldErrors;

/// Post entity - a blog post owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub desc: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `user_id`.
    pub fn new(user_id: Uuid, content: ValidPost) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: content.title,
            desc: content.desc,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite title and desc. `id`, `user_id` and `created_at` are kept.
    pub fn revise(&mut self, content: ValidPost) {
        self.title = content.title;
        self.desc = content.desc;
        self.updated_at = Utc::now();
    }
}

/// Unvalidated post fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PostInput {
    #[serde(default)]
    #[validate(
        required(message = "The title field is required."),
        custom(function = "not_blank", message = "The title field is required.")
    )]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "The desc field is required."),
        custom(function = "not_blank", message = "The desc field is required.")
    )]
    pub desc: Option<String>,
}

/// Post fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub desc: String,
}

impl PostInput {
    pub fn new(title: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            desc: Some(desc.into()),
        }
    }

    /// Check both required fields, reporting every failing field at once.
    pub fn into_valid(self) -> Result<ValidPost, FieldErrors> {
        self.validate().map_err(FieldErrors::from)?;

        match (self.title, self.desc) {
            (Some(title), Some(desc)) => Ok(ValidPost { title, desc }),
            // validate() rejects a missing field before we get here
            (title, desc) => {
                let mut errors = FieldErrors::default();
                if title.is_none() {
                    errors.add("title", "The title field is required.");
                }
                if desc.is_none() {
                    errors.add("desc", "The desc field is required.");
                }
                Err(errors)
            }
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
