//! Store bundle that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use dashcam_core::config::database::DatabaseConfig;
use dashcam_core::error::AppError;
use dashcam_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::repositories::{AccountRepository, ShareRepository, TokenRepository, VideoRepository};
use crate::store::{AccountStore, ShareStore, TokenStore, VideoStore};

#[derive(Debug, Clone)]
enum Backend {
    Postgres(DatabasePool),
    Memory,
}

/// Handles on every store, cheap to clone and handed to services by
/// constructor injection.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<dyn TokenStore>,
    pub videos: Arc<dyn VideoStore>,
    pub shares: Arc<dyn ShareStore>,
    backend: Backend,
}

impl Stores {
    /// Build the stores named by `config.provider`, connecting and
    /// migrating PostgreSQL when selected.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                info!("Initializing PostgreSQL store provider");
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    db.migrate().await?;
                }
                Ok(Self::postgres(db))
            }
            "memory" => {
                info!("Initializing in-memory store provider");
                Ok(Self::memory(Arc::new(MemoryStore::new())))
            }
            other => Err(AppError::configuration(format!(
                "Unknown store provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Stores backed by PostgreSQL repositories sharing one pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            accounts: Arc::new(AccountRepository::new(pool.clone())),
            tokens: Arc::new(TokenRepository::new(pool.clone())),
            videos: Arc::new(VideoRepository::new(pool.clone())),
            shares: Arc::new(ShareRepository::new(pool)),
            backend: Backend::Postgres(db),
        }
    }

    /// Stores backed by one shared in-memory store.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            accounts: store.clone(),
            tokens: store.clone(),
            videos: store.clone(),
            shares: store,
            backend: Backend::Memory,
        }
    }

    /// Liveness of the underlying provider.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.backend {
            Backend::Postgres(db) => db.health_check().await,
            Backend::Memory => Ok(true),
        }
    }

    /// Short provider name for logs and health output.
    pub fn provider_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }

    /// Release pooled connections.
    pub async fn close(&self) {
        if let Backend::Postgres(db) = &self.backend {
            db.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_provider_is_selected_from_config() {
        let config = DatabaseConfig {
            provider: "memory".into(),
            ..Default::default()
        };
        let stores = Stores::connect(&config).await.unwrap();
        assert_eq!(stores.provider_name(), "memory");
        assert!(stores.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_is_a_configuration_error() {
        let config = DatabaseConfig {
            provider: "sqlite".into(),
            ..Default::default()
        };
        let err = Stores::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, dashcam_core::error::ErrorKind::Configuration);
    }
}
