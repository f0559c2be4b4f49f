//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{ClickRecord, NewClick, NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    code: String,
    target_url: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    click_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ClickRow {
    code: String,
    clicked_at: DateTime<Utc>,
    ip_address: Option<String>,
    referrer: String,
    location: String,
    user_agent: Option<String>,
}

impl LinkRow {
    fn into_link(self, clicks: Vec<ClickRecord>) -> ShortLink {
        ShortLink {
            code: self.code,
            target_url: self.target_url,
            created_at: self.created_at,
            expires_at: self.expires_at,
            click_count: self.click_count,
            clicks,
        }
    }
}

impl From<ClickRow> for ClickRecord {
    fn from(row: ClickRow) -> Self {
        Self {
            timestamp: row.clicked_at,
            ip_address: row.ip_address,
            referrer: row.referrer,
            location: row.location,
            user_agent: row.user_agent,
        }
    }
}

/// PostgreSQL repository for links and clicks.
///
/// Links live in `short_links` (primary key `code`), clicks in `link_clicks`.
/// Recording a click increments `short_links.click_count` and inserts the
/// click row inside one transaction; the row lock taken by the `UPDATE`
/// serializes concurrent redirects on the same code. Reads run in a
/// `REPEATABLE READ` transaction so a snapshot never shows a counter that
/// disagrees with its click rows.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Opens a read transaction that sees one snapshot for all its statements,
    /// so `click_count` and the click rows always agree.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

async fn clicks_for(conn: &mut PgConnection, code: &str) -> Result<Vec<ClickRecord>, AppError> {
    let rows = sqlx::query_as::<_, ClickRow>(
        r#"
        SELECT code, clicked_at, ip_address, referrer, location, user_agent
        FROM link_clicks
        WHERE code = $1
        ORDER BY clicked_at ASC, id ASC
        "#,
    )
    .bind(code)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(ClickRecord::from).collect())
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO short_links (code, target_url, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING code, target_url, created_at, expires_at, click_count
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.target_url)
        .bind(new_link.created_at)
        .bind(new_link.expires_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into_link(Vec::new()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let mut tx = self.begin_snapshot().await?;

        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, target_url, created_at, expires_at, click_count
            FROM short_links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let link = match row {
            Some(row) => {
                let clicks = clicks_for(&mut *tx, code).await?;
                Some(row.into_link(clicks))
            }
            None => None,
        };

        tx.commit().await?;

        Ok(link)
    }

    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM short_links WHERE code = $1)",
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, AppError> {
        let mut tx = self.begin_snapshot().await?;

        let links = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT code, target_url, created_at, expires_at, click_count
            FROM short_links
            ORDER BY created_at DESC, code ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let click_rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT code, clicked_at, ip_address, referrer, location, user_agent
            FROM link_clicks
            ORDER BY clicked_at ASC, id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut clicks_by_code: HashMap<String, Vec<ClickRecord>> = HashMap::new();
        for row in click_rows {
            clicks_by_code
                .entry(row.code.clone())
                .or_default()
                .push(row.into());
        }

        Ok(links
            .into_iter()
            .map(|row| {
                let clicks = clicks_by_code.remove(&row.code).unwrap_or_default();
                row.into_link(clicks)
            })
            .collect())
    }

    async fn record_click(&self, code: &str, click: NewClick) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE short_links SET click_count = click_count + 1 WHERE code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO link_clicks (code, clicked_at, ip_address, referrer, location, user_agent)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(code)
        .bind(click.timestamp)
        .bind(click.ip_address)
        .bind(click.referrer)
        .bind(click.location)
        .bind(click.user_agent)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
