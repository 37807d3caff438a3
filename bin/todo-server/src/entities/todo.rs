use crate::entities::dao::todo::format_timestamp;
use crate::entities::{SqliteStore, TodoRecord};

use chrono::Utc;
use std::future::Future;

type TodoRow = (String, String, String, String);

/// Document-collection operations on todos. Each call is atomic for the one
/// document it touches and nothing stronger.
pub trait TodoStore: Send + Sync + 'static {
    fn insert_todo(
        &self,
        record: TodoRecord,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    /// Newest first; skips `skip` documents and returns at most `limit`.
    fn list_todos(
        &self,
        skip: i64,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<TodoRecord>, sqlx::Error>> + Send;
    /// Replaces both mutable fields; `None` when `id` is unknown.
    fn update_todo(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> impl Future<Output = Result<Option<TodoRecord>, sqlx::Error>> + Send;
    /// Removes the document; `false` when `id` is unknown.
    fn delete_todo(&self, id: &str) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
    fn count_todos(&self) -> impl Future<Output = Result<i64, sqlx::Error>> + Send;
}

impl TodoStore for SqliteStore {
    async fn insert_todo(&self, record: TodoRecord) -> Result<(), sqlx::Error> {
        let created_at = format_timestamp(&record.created_at);
        sqlx::query(
            "INSERT INTO todos (id, title, description, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_todos(&self, skip: i64, limit: i64) -> Result<Vec<TodoRecord>, sqlx::Error> {
        let rows: Vec<TodoRow> = sqlx::query_as(
            "SELECT id, title, description, created_at FROM todos \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(into_record).collect())
    }

    async fn update_todo(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<Option<TodoRecord>, sqlx::Error> {
        let row: Option<TodoRow> = sqlx::query_as(
            "UPDATE todos SET title = ?1, description = ?2 WHERE id = ?3 \
             RETURNING id, title, description, created_at",
        )
        .bind(title)
        .bind(description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_record))
    }

    async fn delete_todo(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_todos(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn into_record((id, title, description, created_at): TodoRow) -> TodoRecord {
    TodoRecord {
        id,
        title,
        description,
        created_at: created_at.parse().unwrap_or_else(|e: chrono::ParseError| {
            tracing::warn!(raw = %created_at, error = %e, "failed to parse todo created_at; using now");
            Utc::now()
        }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;

    fn record_at(title: &str, offset_secs: i64) -> TodoRecord {
        let mut record = TodoRecord::new(title, format!("{title} details"));
        record.created_at = Utc::now() + Duration::seconds(offset_secs);
        record
    }

    #[tokio::test]
    async fn list_returns_newest_first_in_pages() {
        let store = SqliteStore::in_memory().await;
        for i in 0..12 {
            store.insert_todo(record_at(&format!("todo {i}"), i)).await.unwrap();
        }

        let first = store.list_todos(0, 10).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].title, "todo 11");
        assert_eq!(first[9].title, "todo 2");

        let second = store.list_todos(10, 10).await.unwrap();
        let titles: Vec<_> = second.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["todo 1", "todo 0"]);

        assert!(store.list_todos(20, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_record_reads_back_unchanged() {
        let store = SqliteStore::in_memory().await;
        let record = TodoRecord::new("Buy milk", "2%");
        store.insert_todo(record.clone()).await.unwrap();

        let listed = store.list_todos(0, 10).await.unwrap();
        assert_eq!(listed, vec![record]);
    }

    #[tokio::test]
    async fn same_timestamp_falls_back_to_insertion_order() {
        let store = SqliteStore::in_memory().await;
        let mut a = TodoRecord::new("a", "first");
        let mut b = TodoRecord::new("b", "second");
        let now = Utc::now();
        a.created_at = now;
        b.created_at = now;
        store.insert_todo(a).await.unwrap();
        store.insert_todo(b).await.unwrap();

        let listed = store.list_todos(0, 10).await.unwrap();
        assert_eq!(listed[0].title, "b");
        assert_eq!(listed[1].title, "a");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let store = SqliteStore::in_memory().await;
        let record = TodoRecord::new("Buy milk", "2%");
        store.insert_todo(record.clone()).await.unwrap();

        let updated = store
            .update_todo(&record.id, "Buy milk", "Whole")
            .await
            .unwrap()
            .expect("existing todo");
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.description, "Whole");
        assert_eq!(
            format_timestamp(&updated.created_at),
            format_timestamp(&record.created_at)
        );
    }

    #[tokio::test]
    async fn update_unknown_id_creates_nothing() {
        let store = SqliteStore::in_memory().await;
        let missing = uuid::Uuid::new_v4().to_string();
        assert!(store.update_todo(&missing, "t", "d").await.unwrap().is_none());
        assert_eq!(store.count_todos().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_document_was_removed() {
        let store = SqliteStore::in_memory().await;
        let record = TodoRecord::new("t", "d");
        store.insert_todo(record.clone()).await.unwrap();

        assert!(store.delete_todo(&record.id).await.unwrap());
        assert!(!store.delete_todo(&record.id).await.unwrap());
        assert_eq!(store.count_todos().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_fields_are_rejected_by_the_schema() {
        let store = SqliteStore::in_memory().await;
        assert!(store.insert_todo(TodoRecord::new("  ", "d")).await.is_err());
        assert_eq!(store.count_todos().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn closed_store_fails() {
        let store = SqliteStore::in_memory().await;
        store.close().await;
        assert!(store.list_todos(0, 10).await.is_err());
    }
}
