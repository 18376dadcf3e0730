use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::errors::StoreError;
use crate::structs::starboard::GuildStarConfig;

/// Atomic per-guild persistence for starboard records.
#[async_trait]
pub trait StarStore: Send + Sync {
    /// Loads the guild's record, defaulting to an empty one when absent.
    async fn load(&self, guild_id: u64) -> Result<GuildStarConfig, StoreError>;

    async fn save(&self, guild_id: u64, config: &GuildStarConfig) -> Result<(), StoreError>;

    async fn remove(&self, guild_id: u64) -> Result<(), StoreError>;
}

/// Keeps one JSON document per guild in a single table.
#[derive(Clone)]
pub struct SqliteStarStore {
    pool: SqlitePool,
}

impl SqliteStarStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS star_configs (
                guild_id TEXT PRIMARY KEY,
                data TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl StarStore for SqliteStarStore {
    async fn load(&self, guild_id: u64) -> Result<GuildStarConfig, StoreError> {
        let row = sqlx::query("SELECT data FROM star_configs WHERE guild_id = ?")
            .bind(guild_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("data").map_err(StoreError::Database)?;
                Ok(serde_json::from_str(&raw)?)
            }
            None => Ok(GuildStarConfig::default()),
        }
    }

    async fn save(&self, guild_id: u64, config: &GuildStarConfig) -> Result<(), StoreError> {
        let raw = serde_json::to_string(config)?;
        sqlx::query(
            "INSERT OR REPLACE INTO star_configs (guild_id, data) VALUES (?, ?)",
        )
        .bind(guild_id.to_string())
        .bind(raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, guild_id: u64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM star_configs WHERE guild_id = ?")
            .bind(guild_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-memory store for exercising the sync engine without sqlite.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStarStore {
    configs: std::sync::Mutex<std::collections::HashMap<u64, GuildStarConfig>>,
}

#[cfg(test)]
#[async_trait]
impl StarStore for MemoryStarStore {
    async fn load(&self, guild_id: u64) -> Result<GuildStarConfig, StoreError> {
        Ok(self
            .configs
            .lock()
            .unwrap()
            .get(&guild_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, guild_id: u64, config: &GuildStarConfig) -> Result<(), StoreError> {
        self.configs.lock().unwrap().insert(guild_id, config.clone());
        Ok(())
    }

    async fn remove(&self, guild_id: u64) -> Result<(), StoreError> {
        self.configs.lock().unwrap().remove(&guild_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStarStore {
        // a single connection so every query sees the same in-memory db
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteStarStore::new(pool);
        store.create_tables().await.unwrap();
        store
    }

    #[tokio::test]
    async fn missing_guild_loads_the_default() {
        let store = store().await;
        let config = store.load(1).await.unwrap();
        assert!(config.starboard_channel_id.is_none());
        assert!(config.entries.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_preserves_the_record() {
        let store = store().await;

        let mut config = GuildStarConfig {
            starboard_channel_id: Some(55),
            ..Default::default()
        };
        config.record_endorsement(10, 20, 30).unwrap();
        store.save(1, &config).await.unwrap();

        let back = store.load(1).await.unwrap();
        assert_eq!(back.starboard_channel_id, Some(55));
        assert_eq!(back.entry(10).unwrap().starred_by, vec![20]);

        store.remove(1).await.unwrap();
        assert!(store.load(1).await.unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn guilds_are_independent_keys() {
        let store = store().await;

        let mut a = GuildStarConfig::default();
        a.record_endorsement(1, 2, 3).unwrap();
        store.save(100, &a).await.unwrap();
        store.save(200, &GuildStarConfig::default()).await.unwrap();

        assert!(store.load(100).await.unwrap().entry(1).is_some());
        assert!(store.load(200).await.unwrap().entry(1).is_none());
    }
}
