use sqlx::{Row, SqlitePool};

use crate::errors::StoreError;
use crate::structs::splatoon::{ScheduleEntry, Weapon};

/// Splatoon reference data (stage list, weapon roster, rotation schedule),
/// kept as JSON documents in a small key/value table.
#[derive(Clone)]
pub struct SplatoonStore {
    pool: SqlitePool,
}

impl SplatoonStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_tables(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS splatoon_data (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_document<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Vec<T>, StoreError> {
        let row = sqlx::query("SELECT value FROM splatoon_data WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("value").map_err(StoreError::Database)?;
                Ok(serde_json::from_str(&raw)?)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn put_document<T: serde::Serialize>(
        &self,
        key: &str,
        value: &[T],
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        sqlx::query("INSERT OR REPLACE INTO splatoon_data (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(raw)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn stages(&self) -> Result<Vec<String>, StoreError> {
        self.get_document("maps").await
    }

    pub async fn weapons(&self) -> Result<Vec<Weapon>, StoreError> {
        self.get_document("weapons").await
    }

    pub async fn schedule(&self) -> Result<Vec<ScheduleEntry>, StoreError> {
        self.get_document("schedule").await
    }

    pub async fn put_schedule(&self, entries: &[ScheduleEntry]) -> Result<(), StoreError> {
        self.put_document("schedule", entries).await
    }

    /// Case-insensitive substring search over name, sub and special.
    pub async fn find_weapons(&self, query: &str) -> Result<Vec<Weapon>, StoreError> {
        let weapons = self.weapons().await?;
        Ok(weapons.into_iter().filter(|w| w.matches(query)).collect())
    }

    /// Drops rotation entries that already ended. Returns how many were
    /// removed; the write only happens when something actually changed.
    pub async fn prune_schedule(&self) -> Result<usize, StoreError> {
        let schedule = self.schedule().await?;
        let keep: Vec<ScheduleEntry> =
            schedule.iter().filter(|e| !e.is_over()).cloned().collect();
        let dropped = schedule.len() - keep.len();
        if dropped > 0 {
            self.put_schedule(&keep).await?;
        }
        Ok(dropped)
    }
}
