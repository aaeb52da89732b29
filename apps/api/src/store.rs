// SQLite-backed document storage.
// Every operation opens its own connection and closes it before returning:
// each write is an independent autocommit transaction, so a process restart
// never loses committed documents and never observes a partial record.

use std::path::Path;

use chrono::Utc;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use tracing::info;

use crate::models::document::{Document, NewDocument};

// AUTOINCREMENT keeps deleted ids from ever being reassigned.
const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL,
    content TEXT NOT NULL,
    file_type TEXT NOT NULL,
    uploaded_at TEXT NOT NULL,
    candidate_name TEXT,
    summary TEXT
)";

/// Handle to the CV database. Cheap to clone; holds connection options, not a
/// live connection.
#[derive(Clone)]
pub struct DocumentStore {
    options: SqliteConnectOptions,
}

impl DocumentStore {
    /// Opens the database file, creating it and the schema if missing.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let store = DocumentStore { options };

        let mut conn = store.connect().await?;
        sqlx::query(SCHEMA).execute(&mut conn).await?;
        conn.close().await?;

        info!("Document store schema ready");
        Ok(store)
    }

    async fn connect(&self) -> Result<SqliteConnection, sqlx::Error> {
        SqliteConnection::connect_with(&self.options).await
    }

    /// Inserts a document, stamping the upload time. Returns the assigned id.
    /// The insert is committed before this returns.
    pub async fn create(&self, doc: NewDocument) -> Result<i64, sqlx::Error> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            "INSERT INTO documents (filename, content, file_type, uploaded_at, candidate_name, summary)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&doc.filename)
        .bind(&doc.content)
        .bind(doc.file_type)
        .bind(Utc::now())
        .bind(&doc.candidate_name)
        .bind(&doc.summary)
        .execute(&mut conn)
        .await?;
        conn.close().await?;
        Ok(result.last_insert_rowid())
    }

    /// Returns the full corpus, most recent upload first. No pagination;
    /// callers filter client-side.
    pub async fn list_all(&self) -> Result<Vec<Document>, sqlx::Error> {
        let mut conn = self.connect().await?;
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents ORDER BY uploaded_at DESC, id DESC",
        )
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(documents)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Document>, sqlx::Error> {
        let mut conn = self.connect().await?;
        let document = sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;
        Ok(document)
    }

    /// Removes a document. Deleting an unknown id is a no-op, not an error.
    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        let mut conn = self.connect().await?;
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await?;
        conn.close().await?;
        Ok(())
    }
}
