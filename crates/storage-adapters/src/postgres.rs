//! # PgStore
//!
//! Postgres implementation of both repositories.
//!
//! A thread row keeps its reply ids in a `UUID[]` column, so attaching a
//! reply is a single `array_append` update and cannot lose a concurrent
//! writer's id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    DomainError, PasswordDigest, Reply, ReplyId, ReplyRepository, Result, Thread, ThreadId,
    ThreadRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

const THREAD_COLUMNS: &str =
    "id, board, text, created_on, bumped_on, reported, delete_password, replies";
const REPLY_COLUMNS: &str = "id, thread_id, text, created_on, reported, delete_password";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and brings the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(db_error)?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(format!("migration failed: {e}")))?;
        tracing::info!("database schema is up to date");
        Ok(())
    }
}

fn db_error(err: sqlx::Error) -> DomainError {
    DomainError::Internal(format!("database error: {err}"))
}

fn thread_from_row(row: &PgRow) -> std::result::Result<Thread, sqlx::Error> {
    let replies: Vec<Uuid> = row.try_get("replies")?;
    Ok(Thread {
        id: ThreadId::from(row.try_get::<Uuid, _>("id")?),
        board: row.try_get("board")?,
        text: row.try_get("text")?,
        created_on: row.try_get("created_on")?,
        bumped_on: row.try_get("bumped_on")?,
        reported: row.try_get("reported")?,
        delete_password: PasswordDigest::new(row.try_get::<String, _>("delete_password")?),
        replies: replies.into_iter().map(ReplyId::from).collect(),
    })
}

fn reply_from_row(row: &PgRow) -> std::result::Result<Reply, sqlx::Error> {
    Ok(Reply {
        id: ReplyId::from(row.try_get::<Uuid, _>("id")?),
        thread: ThreadId::from(row.try_get::<Uuid, _>("thread_id")?),
        text: row.try_get("text")?,
        created_on: row.try_get("created_on")?,
        reported: row.try_get("reported")?,
        delete_password: PasswordDigest::new(row.try_get::<String, _>("delete_password")?),
    })
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl ThreadRepository for PgStore {
    async fn insert_thread(&self, thread: Thread) -> Result<()> {
        let replies: Vec<Uuid> = thread.replies.iter().map(ReplyId::as_uuid).collect();
        sqlx::query(
            "INSERT INTO threads (id, board, text, created_on, bumped_on, reported, delete_password, replies) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(thread.id.as_uuid())
        .bind(&thread.board)
        .bind(&thread.text)
        .bind(thread.created_on)
        .bind(thread.bumped_on)
        .bind(thread.reported)
        .bind(thread.delete_password.as_str())
        .bind(replies)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_thread(&self, board: &str, id: ThreadId) -> Result<Option<Thread>> {
        let row = sqlx::query(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE board = $1 AND id = $2"
        ))
        .bind(board)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(thread_from_row).transpose().map_err(db_error)
    }

    async fn list_threads(&self, board: &str, limit: usize) -> Result<Vec<Thread>> {
        let rows = sqlx::query(&format!(
            "SELECT {THREAD_COLUMNS} FROM threads WHERE board = $1 \
             ORDER BY bumped_on DESC, id DESC LIMIT $2"
        ))
        .bind(board)
        .bind(to_limit(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(thread_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(db_error)
    }

    async fn report_thread(&self, board: &str, id: ThreadId) -> Result<bool> {
        let done = sqlx::query("UPDATE threads SET reported = TRUE WHERE board = $1 AND id = $2")
            .bind(board)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }

    async fn delete_thread(&self, board: &str, id: ThreadId) -> Result<bool> {
        let done = sqlx::query("DELETE FROM threads WHERE board = $1 AND id = $2")
            .bind(board)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }

    async fn attach_reply(
        &self,
        id: ThreadId,
        reply: ReplyId,
        created_on: DateTime<Utc>,
    ) -> Result<bool> {
        let done = sqlx::query(
            "UPDATE threads \
             SET replies = array_append(replies, $2), bumped_on = GREATEST(bumped_on, $3) \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(reply.as_uuid())
        .bind(created_on)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }
}

#[async_trait]
impl ReplyRepository for PgStore {
    async fn insert_reply(&self, reply: Reply) -> Result<()> {
        sqlx::query(
            "INSERT INTO replies (id, thread_id, text, created_on, reported, delete_password) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(reply.id.as_uuid())
        .bind(reply.thread.as_uuid())
        .bind(&reply.text)
        .bind(reply.created_on)
        .bind(reply.reported)
        .bind(reply.delete_password.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn find_reply(&self, thread: ThreadId, id: ReplyId) -> Result<Option<Reply>> {
        let row = sqlx::query(&format!(
            "SELECT {REPLY_COLUMNS} FROM replies WHERE thread_id = $1 AND id = $2"
        ))
        .bind(thread.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.as_ref().map(reply_from_row).transpose().map_err(db_error)
    }

    async fn replies_by_ids(&self, ids: &[ReplyId], limit: Option<usize>) -> Result<Vec<Reply>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(ReplyId::as_uuid).collect();

        // LIMIT NULL means no limit in Postgres.
        let rows = sqlx::query(&format!(
            "SELECT {REPLY_COLUMNS} FROM replies WHERE id = ANY($1) \
             ORDER BY created_on DESC, id DESC LIMIT $2"
        ))
        .bind(ids)
        .bind(limit.map(to_limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.iter()
            .map(reply_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(db_error)
    }

    async fn report_reply(&self, thread: ThreadId, id: ReplyId) -> Result<bool> {
        let done =
            sqlx::query("UPDATE replies SET reported = TRUE WHERE thread_id = $1 AND id = $2")
                .bind(thread.as_uuid())
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }

    async fn set_reply_text(&self, thread: ThreadId, id: ReplyId, text: &str) -> Result<bool> {
        let done = sqlx::query("UPDATE replies SET text = $3 WHERE thread_id = $1 AND id = $2")
            .bind(thread.as_uuid())
            .bind(id.as_uuid())
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(done.rows_affected() > 0)
    }
}
