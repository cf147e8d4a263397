//! Redis-backed cache for seat-layout definitions. Layouts are the only
//! cacheable input: they are read-only for the lifetime of a view. Booking
//! lists are deliberately NOT cached anywhere — occupancy is recomputed from
//! a fresh read on every request.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use tracing::info;

use crate::database::Database;
use crate::models::SeatLayoutDefinition;
use crate::store::load_layout_for_session;

#[derive(Clone)]
pub struct LayoutCache {
    conn: MultiplexedConnection,
    db: Database,
    ttl_seconds: u64,
}

impl LayoutCache {
    pub async fn connect(
        redis_url: &str,
        db: Database,
        ttl_seconds: u64,
    ) -> redis::RedisResult<Self> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        info!("Redis connected");
        Ok(LayoutCache {
            conn,
            db,
            ttl_seconds,
        })
    }

    /// Layout for a session: Redis first, database on miss. A session with
    /// no layout configured is not an error and is never negatively cached.
    pub async fn layout_for_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SeatLayoutDefinition>, sqlx::Error> {
        if let Some(cached) = self.get_cached(session_id).await {
            return Ok(Some(cached));
        }

        let layout = load_layout_for_session(&self.db.pool, session_id).await?;
        if let Some(ref def) = layout {
            self.save_to_cache(session_id, def).await;
        }
        Ok(layout)
    }

    async fn get_cached(&self, session_id: &str) -> Option<SeatLayoutDefinition> {
        let mut conn = self.conn.clone();
        let key = layout_key(session_id);
        let data: Option<String> = conn.get(&key).await.ok().flatten();
        data.and_then(|json| serde_json::from_str(&json).ok())
    }

    // Cache failures are never fatal; the database copy is authoritative.
    async fn save_to_cache(&self, session_id: &str, layout: &SeatLayoutDefinition) {
        let Ok(json) = serde_json::to_string(layout) else {
            return;
        };
        let mut conn = self.conn.clone();
        let key = layout_key(session_id);
        let result: Result<(), redis::RedisError> =
            conn.set_ex(&key, json, self.ttl_seconds).await;
        if let Err(e) = result {
            tracing::warn!("failed to cache layout for session {session_id}: {e}");
        }
    }
}

fn layout_key(session_id: &str) -> String {
    format!("layout:session:{}", session_id)
}
