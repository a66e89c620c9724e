use sqlx::AnyPool;

use crate::models::PasteRecord;

#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    /// Connect to a database by URL and ensure the schema exists.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let db = Self {
            pool: AnyPool::connect(url).await?,
        };
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Bootstrap the schema. The index on `id` is deliberately
    /// non-unique: identifier generation does not guard against
    /// collisions, and lookups resolve duplicates by recency.
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS paste ( \
                 key TEXT PRIMARY KEY, \
                 id TEXT NOT NULL, \
                 content TEXT NOT NULL, \
                 timestamp TIMESTAMP NOT NULL, \
                 email TEXT, \
                 title TEXT, \
                 language TEXT \
             )",
        )
        .execute(&mut conn)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS paste_id_idx ON paste (id)")
            .execute(&mut conn)
            .await?;
        Ok(())
    }

    /// Insert a paste.
    pub async fn insert_paste(&mut self, record: &PasteRecord) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "INSERT INTO paste (key, id, content, timestamp, email, title, language) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.key)
        .bind(&record.id)
        .bind(&record.content)
        .bind(record.timestamp)
        .bind(&record.email)
        .bind(&record.title)
        .bind(&record.language)
        .execute(&mut conn)
        .await?;
        Ok(())
    }

    /// Get a paste by its public id. The id column is not unique; when
    /// several rows match, the most recent one wins, with the key as a
    /// tiebreak so the result is deterministic.
    pub async fn get_paste_by_id(&mut self, id: &str) -> crate::ApiResult<PasteRecord> {
        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, PasteRecord>(
            "SELECT key, id, content, timestamp, email, title, language FROM paste \
             WHERE id = ? ORDER BY timestamp DESC, key DESC LIMIT 1",
        )
        .bind(id)
        .fetch_one(&mut conn)
        .await?;
        Ok(record)
    }

    /// Get a paste by its store key. Absence is not an error here; the
    /// delete flow treats a missing row as already gone.
    pub async fn get_paste_by_key(&mut self, key: &str) -> crate::ApiResult<Option<PasteRecord>> {
        let mut conn = self.pool.acquire().await?;
        let record = sqlx::query_as::<_, PasteRecord>(
            "SELECT key, id, content, timestamp, email, title, language FROM paste \
             WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&mut conn)
        .await?;
        Ok(record)
    }

    /// Delete a paste by its store key.
    pub async fn delete_paste(&mut self, key: &str) -> crate::ApiResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM paste WHERE key = ?")
            .bind(key)
            .execute(&mut conn)
            .await?;
        Ok(())
    }
}
