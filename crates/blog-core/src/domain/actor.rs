use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal behind a single request.
///
/// Handlers resolve it from the request and pass it into every mutating
/// operation; it is never stored globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
}

impl Actor {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
