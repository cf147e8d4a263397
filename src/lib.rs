pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod seating;
pub mod services;
pub mod store;

use std::sync::Arc;

// Shared state for the whole application. Note what is NOT here: no seat
// grid and no booking list — occupancy is recomputed from a fresh read on
// every request, only the immutable layouts sit behind a cache.
pub struct AppState {
    pub db: database::Database,
    pub cache: cache::LayoutCache,
    pub bookings: services::BookingService<store::PgBookingStore>,
    pub config: config::Config,
}

impl AppState {
    pub async fn new(config: config::Config) -> anyhow::Result<Arc<Self>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        let cache = cache::LayoutCache::connect(
            &config.redis.url,
            db.clone(),
            config.cache.layout_ttl_seconds,
        )
        .await?;
        let bookings =
            services::BookingService::new(store::PgBookingStore::new(db.pool.clone()));

        Ok(Arc::new(Self {
            db,
            cache,
            bookings,
            config,
        }))
    }
}
