use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DbConn, DbErr, EntityTrait, Schema,
};

use super::entity::{post, user};

/// Configuration for the main database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Connection pool to the post store.
pub struct DatabasePool {
    pub conn: DbConn,
}

impl DatabasePool {
    /// Open the pool described by `config`.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Database connected");

        Ok(Self { conn })
    }

    /// Create the `users` and `posts` tables when they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        self.create_table(user::Entity).await?;
        self.create_table(post::Entity).await?;
        tracing::info!("Database schema ready");
        Ok(())
    }

    async fn create_table<E: EntityTrait>(&self, entity: E) -> Result<(), DbErr> {
        let backend = self.conn.get_database_backend();
        let mut statement = Schema::new(backend).create_table_from_entity(entity);
        statement.if_not_exists();

        self.conn.execute(backend.build(&statement)).await?;
        Ok(())
    }
}
