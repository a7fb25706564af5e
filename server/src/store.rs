//! Persistence for to-do items.
//!
//! # Design
//! Handlers only see the [`TodoStore`] trait, held behind an `Arc<dyn _>` in
//! the router state. [`SqliteStore`] is the production implementation over a
//! sqlx connection pool. Each operation is a single statement, so isolation
//! between concurrent writers is whatever SQLite gives a lone statement.
//!
//! "No such row" on a write is reported as [`StoreError::NotFound`], not as a
//! database error, so the HTTP layer can answer 404 for it.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::info;

use crate::model::{ItemFilter, NewTodoItem, TodoItem};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no item with id {0}")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Item collection backed by one table.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All items matching `filter`, in id order.
    async fn list(&self, filter: ItemFilter) -> Result<Vec<TodoItem>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<TodoItem>, StoreError>;

    /// Insert a new row and return it with its assigned id.
    async fn insert(&self, item: NewTodoItem) -> Result<TodoItem, StoreError>;

    /// Overwrite every column of the row `item.id`.
    async fn replace(&self, item: &TodoItem) -> Result<(), StoreError>;

    /// Set or clear the completion date and return the updated row.
    async fn set_completion(
        &self,
        id: i64,
        completion_date: Option<DateTime<Utc>>,
    ) -> Result<TodoItem, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS todo_items (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    title           TEXT NOT NULL,
    description     TEXT,
    due_date        TEXT NOT NULL,
    completion_date TEXT
)";

const SELECT_ALL: &str =
    "SELECT id, title, description, due_date, completion_date FROM todo_items ORDER BY id";
const SELECT_INCOMPLETE: &str = "SELECT id, title, description, due_date, completion_date \
     FROM todo_items WHERE completion_date IS NULL ORDER BY id";
const SELECT_COMPLETED: &str = "SELECT id, title, description, due_date, completion_date \
     FROM todo_items WHERE completion_date IS NOT NULL ORDER BY id";
const SELECT_ONE: &str =
    "SELECT id, title, description, due_date, completion_date FROM todo_items WHERE id = ?1";
const INSERT: &str = "INSERT INTO todo_items (title, description, due_date, completion_date) \
     VALUES (?1, ?2, ?3, ?4) \
     RETURNING id, title, description, due_date, completion_date";
const REPLACE: &str = "UPDATE todo_items \
     SET title = ?1, description = ?2, due_date = ?3, completion_date = ?4 WHERE id = ?5";
const SET_COMPLETION: &str = "UPDATE todo_items SET completion_date = ?1 WHERE id = ?2 \
     RETURNING id, title, description, due_date, completion_date";
const DELETE: &str = "DELETE FROM todo_items WHERE id = ?1";

/// SQLite-backed [`TodoStore`].
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a pool for `database_url`, creating the database file if needed.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// A private in-memory database (for testing).
    ///
    /// Every SQLite memory connection is its own database, so the pool is
    /// pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool, creating the items table if it is missing.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        info!("todo_items table ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn list(&self, filter: ItemFilter) -> Result<Vec<TodoItem>, StoreError> {
        let sql = match filter {
            ItemFilter::All => SELECT_ALL,
            ItemFilter::Incomplete => SELECT_INCOMPLETE,
            ItemFilter::Completed => SELECT_COMPLETED,
        };
        let items = sqlx::query_as::<_, TodoItem>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn get(&self, id: i64) -> Result<Option<TodoItem>, StoreError> {
        let item = sqlx::query_as::<_, TodoItem>(SELECT_ONE)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    async fn insert(&self, item: NewTodoItem) -> Result<TodoItem, StoreError> {
        let created = sqlx::query_as::<_, TodoItem>(INSERT)
            .bind(item.title)
            .bind(item.description)
            .bind(item.due_date)
            .bind(item.completion_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn replace(&self, item: &TodoItem) -> Result<(), StoreError> {
        let result = sqlx::query(REPLACE)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.due_date)
            .bind(item.completion_date)
            .bind(item.id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(item.id));
        }
        Ok(())
    }

    async fn set_completion(
        &self,
        id: i64,
        completion_date: Option<DateTime<Utc>>,
    ) -> Result<TodoItem, StoreError> {
        sqlx::query_as::<_, TodoItem>(SET_COMPLETION)
            .bind(completion_date)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query(DELETE).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 3, 4, 5, 6, 0).unwrap()
    }

    fn new_item(title: &str) -> NewTodoItem {
        NewTodoItem {
            title: title.to_string(),
            description: Some("details".to_string()),
            due_date: due(),
            completion_date: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = SqliteStore::in_memory().await.unwrap();
        let first = store.insert(new_item("first")).await.unwrap();
        let second = store.insert(new_item("second")).await.unwrap();
        assert!(first.id > 0);
        assert!(second.id > first.id);
        assert_eq!(first.title, "first");
        assert_eq!(first.description.as_deref(), Some("details"));
        assert_eq!(first.due_date, due());
        assert!(first.completion_date.is_none());
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_id() {
        let store = SqliteStore::in_memory().await.unwrap();
        assert!(store.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_applies_filter() {
        let store = SqliteStore::in_memory().await.unwrap();
        let open = store.insert(new_item("open")).await.unwrap();
        let done = store.insert(new_item("done")).await.unwrap();
        store.set_completion(done.id, Some(due())).await.unwrap();

        let all = store.list(ItemFilter::All).await.unwrap();
        assert_eq!(all.iter().map(|i| i.id).collect::<Vec<_>>(), vec![open.id, done.id]);

        let incomplete = store.list(ItemFilter::Incomplete).await.unwrap();
        assert_eq!(incomplete.len(), 1);
        assert_eq!(incomplete[0].id, open.id);

        let completed = store.list(ItemFilter::Completed).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, done.id);
        assert_eq!(completed[0].completion_date, Some(due()));
    }

    #[tokio::test]
    async fn replace_overwrites_all_columns() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut item = store.insert(new_item("before")).await.unwrap();
        item.title = "after".to_string();
        item.description = None;
        item.completion_date = Some(due());
        store.replace(&item).await.unwrap();

        let stored = store.get(item.id).await.unwrap().unwrap();
        assert_eq!(stored, item);
    }

    #[tokio::test]
    async fn replace_missing_row_is_not_found() {
        let store = SqliteStore::in_memory().await.unwrap();
        let ghost = TodoItem {
            id: 99,
            title: "ghost".to_string(),
            description: None,
            due_date: due(),
            completion_date: None,
        };
        let err = store.replace(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(99)));
    }

    #[tokio::test]
    async fn set_completion_missing_row_is_not_found() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = store.set_completion(5, None).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(5)));
    }

    #[tokio::test]
    async fn delete_removes_row_once() {
        let store = SqliteStore::in_memory().await.unwrap();
        let item = store.insert(new_item("doomed")).await.unwrap();
        store.delete(item.id).await.unwrap();
        assert!(store.get(item.id).await.unwrap().is_none());
        let err = store.delete(item.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn closed_pool_surfaces_database_error() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.pool().close().await;
        let err = store.list(ItemFilter::All).await.unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
