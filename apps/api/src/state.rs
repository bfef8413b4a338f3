use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::storage::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Generated-document storage. Default: S3DocumentStore.
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// State with a lazily connected pool and an in-memory store.
    ///
    /// Only routes that never reach the database can be exercised with it.
    pub fn for_tests(store: Arc<crate::storage::InMemoryDocumentStore>) -> Self {
        let config = Config::for_tests();
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool from a valid url");
        AppState { db, store, config }
    }
}
