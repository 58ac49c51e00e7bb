//! SQLite backend
//!
//! One table, `leads`, keyed by id. Timestamps are stored as Unix
//! milliseconds so ordering is numeric and round-trips are exact.

use crate::error::StoreError;
use crate::store::{ensure_unique_ids, LeadStore};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use leadbook_core::{Lead, LeadDraft, LeadId, LeadStatus};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Default pool size for file databases
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const SCHEMA: [&str; 2] = [
    r"CREATE TABLE IF NOT EXISTS leads (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        company TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('New', 'Contacted', 'Qualified', 'Lost', 'Won')),
        notes TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    r"CREATE INDEX IF NOT EXISTS leads_updated_at_idx ON leads (updated_at DESC)",
];

const SELECT_ALL: &str = r"SELECT id, name, phone, company, status, notes, updated_at
    FROM leads
    ORDER BY updated_at DESC, id ASC";

// Opening with a write takes the write lock up front, so concurrent replaces
// queue on the busy timeout instead of failing on a lock upgrade.
const DELETE_MISSING: &str = r"DELETE FROM leads
    WHERE id NOT IN (SELECT value FROM json_each(?1))";

const UPSERT: &str = r"INSERT INTO leads (id, name, phone, company, status, notes, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (id) DO UPDATE SET
        name = excluded.name,
        phone = excluded.phone,
        company = excluded.company,
        status = excluded.status,
        notes = excluded.notes,
        updated_at = excluded.updated_at";

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: String,
    name: String,
    phone: String,
    company: String,
    status: String,
    notes: String,
    updated_at: i64,
}

impl LeadRow {
    fn into_lead(self) -> Result<Lead, StoreError> {
        let row = self;
        let corrupt = |reason: String| StoreError::CorruptRow {
            id: row.id.clone(),
            reason,
        };
        let id = LeadId::new(row.id.clone()).map_err(|e| corrupt(e.to_string()))?;
        let status = LeadStatus::from_str(&row.status).map_err(|e| corrupt(e.to_string()))?;
        let updated_at = Utc
            .timestamp_millis_opt(row.updated_at)
            .single()
            .ok_or_else(|| corrupt(format!("timestamp {} out of range", row.updated_at)))?;

        let draft = LeadDraft {
            name: row.name,
            phone: row.phone,
            company: row.company,
            status,
            notes: row.notes,
        };
        Ok(Lead::new(id, draft, updated_at))
    }
}

/// Lead store over a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteLeadStore {
    pool: SqlitePool,
}

impl SqliteLeadStore {
    /// Open (creating if missing) the database at `url` and apply the schema
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        Self::connect_with(url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// As [`Self::connect`], with an explicit pool size.
    ///
    /// In-memory databases are per-connection, so they always get a single
    /// connection that is never recycled.
    pub async fn connect_with(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new();
        if is_memory_url(url) {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.max_connections(max_connections.max(1));
        }

        let pool = pool_options.connect_with(options).await?;
        tracing::info!(url, "connected to lead database");
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool and apply the schema
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    /// Underlying pool
    #[inline]
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Number of stored leads
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[async_trait]
impl LeadStore for SqliteLeadStore {
    async fn fetch_all(&self) -> Result<Vec<Lead>, StoreError> {
        let rows: Vec<LeadRow> = sqlx::query_as(SELECT_ALL).fetch_all(&self.pool).await?;
        rows.into_iter().map(LeadRow::into_lead).collect()
    }

    async fn replace_all(&self, leads: &[Lead]) -> Result<(), StoreError> {
        ensure_unique_ids(leads)?;

        let wanted: Vec<&str> = leads.iter().map(|lead| lead.id().as_str()).collect();
        let wanted = serde_json::to_string(&wanted)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        // Dropping `tx` without commit rolls everything back.
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(DELETE_MISSING)
            .bind(wanted)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        for lead in leads {
            sqlx::query(UPSERT)
                .bind(lead.id().as_str())
                .bind(lead.name.as_str())
                .bind(lead.phone.as_str())
                .bind(lead.company.as_str())
                .bind(lead.status.as_str())
                .bind(lead.notes.as_str())
                .bind(lead.updated_at.timestamp_millis())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(upserted = leads.len(), removed, "lead set replaced");
        Ok(())
    }
}
