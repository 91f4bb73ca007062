//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::PostService;
use blog_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use blog_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    /// Name of the active storage backend, reported by the health check.
    pub storage: &'static str,
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn UserRepository>, &'static str);

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let (posts, users, storage) = Self::repositories(config).await;

        tracing::info!(storage, "Application state initialized");

        Self::assemble(posts, users, storage, config.jwt.clone())
    }

    /// State backed entirely by in-memory repositories.
    pub fn in_memory(jwt: JwtConfig) -> Self {
        let (posts, users, storage) = Self::memory_repositories();
        Self::assemble(posts, users, storage, jwt)
    }

    fn assemble(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        storage: &'static str,
        jwt: JwtConfig,
    ) -> Self {
        Self {
            posts: PostService::new(posts),
            users,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            storage,
        }
    }

    fn memory_repositories() -> Repositories {
        (
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            "memory",
        )
    }

    #[cfg(feature = "postgres")]
    async fn repositories(config: &AppConfig) -> Repositories {
        use blog_infra::DatabasePool;
        use blog_infra::database::{PostgresPostRepository, PostgresUserRepository};

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::memory_repositories();
        };

        let pool = match DatabasePool::init(db_config).await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return Self::memory_repositories();
            }
        };

        if let Err(e) = pool.ensure_schema().await {
            tracing::error!(
                "Failed to prepare database schema: {}. Using in-memory fallback.",
                e
            );
            return Self::memory_repositories();
        }

        (
            Arc::new(PostgresPostRepository::new(pool.conn.clone())),
            Arc::new(PostgresUserRepository::new(pool.conn)),
            "postgres",
        )
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_config: &AppConfig) -> Repositories {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::memory_repositories()
    }
}
