use anyhow::Context;
use domain::models::Embedding;
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use shared::types::Result;
use std::path::Path;

pub const CORPUS_FINGERPRINT_KEY: &str = "corpus_fingerprint";
pub const EMBEDDING_MODEL_KEY: &str = "embedding_model";

/// What a persisted index was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMeta {
    pub corpus_fingerprint: String,
    pub embedding_model: String,
}

/// Sqlite-backed persisted index: the embedded corpus plus metadata about what it was
/// built from.
pub struct EmbeddingStorage {
    conn: Connection,
}

impl EmbeddingStorage {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let conn = Connection::open(db_path)
            .with_context(|| format!("opening index at {}", db_path.display()))?;
        Self::setup_db(&conn)?;
        Ok(Self { conn })
    }

    fn setup_db(conn: &Connection) -> SqlResult<()> {
        conn.execute_batch(
            "
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS embeddings (
                id TEXT PRIMARY KEY,
                position INTEGER NOT NULL,
                vector BLOB NOT NULL,
                text TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_embeddings_position ON embeddings(position);
            CREATE TABLE IF NOT EXISTS index_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        ",
        )
    }

    /// Swap the whole index in one transaction. The metadata is written last, so its
    /// presence means the rows beside it are complete. A failure leaves the previous
    /// index in place.
    pub fn replace_all(&self, embeddings: &[Embedding], meta: &IndexMeta) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM embeddings", [])?;
        tx.execute("DELETE FROM index_meta", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO embeddings (id, position, vector, text) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for embedding in embeddings {
                let vector_bytes = serde_json::to_vec(&embedding.vector)?;
                stmt.execute(params![
                    embedding.id,
                    embedding.position as i64,
                    vector_bytes,
                    embedding.text
                ])?;
            }
        }
        {
            let mut stmt = tx.prepare("INSERT INTO index_meta (key, value) VALUES (?1, ?2)")?;
            stmt.execute(params![EMBEDDING_MODEL_KEY, meta.embedding_model])?;
            stmt.execute(params![CORPUS_FINGERPRINT_KEY, meta.corpus_fingerprint])?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_all_embeddings(&self) -> Result<Vec<Embedding>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, position, vector, text FROM embeddings ORDER BY position")?;
        let mut rows = stmt.query([])?;
        let mut embeddings = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let position: i64 = row.get(1)?;
            let vector_bytes: Vec<u8> = row.get(2)?;
            let text: String = row.get(3)?;
            let vector: Vec<f32> = serde_json::from_slice(&vector_bytes)
                .with_context(|| format!("decoding vector for {id}"))?;
            embeddings.push(Embedding {
                id,
                position: position as usize,
                vector,
                text,
            });
        }
        Ok(embeddings)
    }

    /// `None` until a build has completed.
    pub fn meta(&self) -> Result<Option<IndexMeta>> {
        let (Some(corpus_fingerprint), Some(embedding_model)) = (
            self.meta_value(CORPUS_FINGERPRINT_KEY)?,
            self.meta_value(EMBEDDING_MODEL_KEY)?,
        ) else {
            return Ok(None);
        };
        Ok(Some(IndexMeta {
            corpus_fingerprint,
            embedding_model,
        }))
    }

    fn meta_value(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM index_meta WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}
