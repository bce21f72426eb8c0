//! SQLite index store
//!
//! One row per (document, locale, gram) with the posting list as JSON, plus a
//! document row recording how many grams it has. Uses an r2d2 pool so
//! concurrent searches read without blocking each other.

use crate::hooks::{IndexRead, IndexStore};
use crate::interface::{DocumentIndex, HookResult, Posting};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Posting encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Locales are stored as text; no locale is the empty string.
fn locale_key(locale: Option<&str>) -> &str {
    locale.unwrap_or("")
}

/// Thread-safe index store backed by SQLite.
pub struct IndexDatabase {
    pool: Pool<SqliteConnectionManager>,
    /// Documents with at most this many grams are handed over whole.
    whole_index_limit: usize,
}

impl IndexDatabase {
    /// Open or create a database at the given path with connection pooling
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "
                PRAGMA journal_mode=WAL;
                PRAGMA synchronous=NORMAL;
                PRAGMA cache_size=-32000;
            ",
            )?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;
        Self::from_pool(pool)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder().max_size(1).build(manager)?;
        Self::from_pool(pool)
    }

    fn from_pool(pool: Pool<SqliteConnectionManager>) -> DatabaseResult<Self> {
        let db = Self {
            pool,
            whole_index_limit: 0,
        };
        db.setup_schema()?;
        Ok(db)
    }

    pub fn with_whole_index_limit(mut self, limit: usize) -> Self {
        self.whole_index_limit = limit;
        self
    }

    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                document TEXT NOT NULL,
                locale TEXT NOT NULL,
                gramCount INTEGER NOT NULL,
                PRIMARY KEY (document, locale)
            );

            CREATE TABLE IF NOT EXISTS postings (
                document TEXT NOT NULL,
                locale TEXT NOT NULL,
                gram TEXT NOT NULL,
                postings TEXT NOT NULL,
                PRIMARY KEY (document, locale, gram)
            );
        "#,
        )?;
        Ok(())
    }

    /// Replace the stored index of `document` in one transaction.
    pub fn save_index(&self, document: &str, index: &DocumentIndex, locale: Option<&str>) -> DatabaseResult<()> {
        let mut conn = self.get_conn()?;
        let locale = locale_key(locale);
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM postings WHERE document = ?1 AND locale = ?2",
            params![document, locale],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO postings (document, locale, gram, postings) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (gram, postings) in index.iter() {
                insert.execute(params![document, locale, gram, serde_json::to_string(postings)?])?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO documents (document, locale, gramCount) VALUES (?1, ?2, ?3)",
            params![document, locale, index.len() as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Gram count of a stored document, `None` when it was never stored.
    pub fn gram_count(&self, document: &str, locale: Option<&str>) -> DatabaseResult<Option<usize>> {
        let conn = self.get_conn()?;
        let count: Option<i64> = conn
            .query_row(
                "SELECT gramCount FROM documents WHERE document = ?1 AND locale = ?2",
                params![document, locale_key(locale)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.map(|c| c.max(0) as usize))
    }

    /// Postings of one gram; `None` when the gram is not stored.
    pub fn load_postings(&self, document: &str, gram: &str, locale: Option<&str>) -> DatabaseResult<Option<Vec<Posting>>> {
        let conn = self.get_conn()?;
        let json: Option<String> = conn
            .query_row(
                "SELECT postings FROM postings WHERE document = ?1 AND locale = ?2 AND gram = ?3",
                params![document, locale_key(locale), gram],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j)).transpose().map_err(DatabaseError::from)
    }

    /// Gram count of `document` and the postings of `gram` in one query.
    /// `None` when the document was never stored; the inner `None` when the
    /// gram is missing.
    pub fn lookup_postings(
        &self,
        document: &str,
        gram: &str,
        locale: Option<&str>,
    ) -> DatabaseResult<Option<(usize, Option<Vec<Posting>>)>> {
        let conn = self.get_conn()?;
        let row: Option<(i64, Option<String>)> = conn
            .query_row(
                r#"
                SELECT d.gramCount, p.postings
                FROM documents d
                LEFT JOIN postings p
                    ON p.document = d.document AND p.locale = d.locale AND p.gram = ?3
                WHERE d.document = ?1 AND d.locale = ?2
            "#,
                params![document, locale_key(locale), gram],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((count, json)) = row else {
            return Ok(None);
        };
        let postings: Option<Vec<Posting>> = json.map(|j| serde_json::from_str(&j)).transpose()?;
        Ok(Some((count.max(0) as usize, postings)))
    }

    pub fn load_index(&self, document: &str, locale: Option<&str>) -> DatabaseResult<Option<DocumentIndex>> {
        if self.gram_count(document, locale)?.is_none() {
            return Ok(None);
        }
        self.load_grams(document, locale).map(Some)
    }

    fn load_grams(&self, document: &str, locale: Option<&str>) -> DatabaseResult<DocumentIndex> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT gram, postings FROM postings WHERE document = ?1 AND locale = ?2")?;
        let rows = stmt.query_map(params![document, locale_key(locale)], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut grams = Vec::new();
        for row in rows {
            let (gram, json) = row?;
            grams.push((gram, serde_json::from_str::<Vec<Posting>>(&json)?));
        }
        Ok(grams.into_iter().collect())
    }

    /// Ids of all stored documents, sorted.
    pub fn documents(&self) -> DatabaseResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT document FROM documents ORDER BY document")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

impl IndexStore for IndexDatabase {
    fn read_index(&self, document: &str, key: &str, locale: Option<&str>) -> HookResult<Option<IndexRead>> {
        let Some((grams, postings)) = self.lookup_postings(document, key, locale)? else {
            return Ok(None);
        };
        if grams <= self.whole_index_limit {
            return Ok(Some(IndexRead::Whole(self.load_grams(document, locale)?)));
        }
        Ok(Some(IndexRead::PerKey(postings.unwrap_or_default())))
    }

    fn store_index(&self, document: &str, index: &DocumentIndex, locale: Option<&str>) -> HookResult<()> {
        self.save_index(document, index, locale)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> DocumentIndex {
        vec![
            ("qu".to_string(), vec![Posting::new(1, "quick", 4, 5)]),
            (
                "ow".to_string(),
                vec![Posting::new(2, "brown", 10, 5), Posting::new(5, "owl", 30, 3)],
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_save_and_load() {
        let db = IndexDatabase::open_in_memory().unwrap();
        db.save_index("doc", &sample_index(), None).unwrap();

        assert_eq!(db.gram_count("doc", None).unwrap(), Some(2));
        assert_eq!(db.load_index("doc", None).unwrap(), Some(sample_index()));
        assert_eq!(db.load_postings("doc", "ow", None).unwrap().unwrap().len(), 2);
        assert_eq!(db.load_postings("doc", "zz", None).unwrap(), None);
        assert_eq!(db.load_index("other", None).unwrap(), None);
    }

    #[test]
    fn test_locales_are_separate() {
        let db = IndexDatabase::open_in_memory().unwrap();
        db.save_index("doc", &sample_index(), Some("fr")).unwrap();
        assert_eq!(db.gram_count("doc", None).unwrap(), None);
        assert_eq!(db.gram_count("doc", Some("fr")).unwrap(), Some(2));
    }

    #[test]
    fn test_save_replaces() {
        let db = IndexDatabase::open_in_memory().unwrap();
        db.save_index("doc", &sample_index(), None).unwrap();
        let smaller: DocumentIndex = vec![("ab".to_string(), vec![Posting::new(0, "ab", 0, 2)])]
            .into_iter()
            .collect();
        db.save_index("doc", &smaller, None).unwrap();
        assert_eq!(db.load_index("doc", None).unwrap(), Some(smaller));
        assert_eq!(db.documents().unwrap(), vec!["doc".to_string()]);
    }

    #[test]
    fn test_read_index_per_key() {
        let db = IndexDatabase::open_in_memory().unwrap();
        db.store_index("doc", &sample_index(), None).unwrap();

        let read = db.read_index("doc", "qu", None).unwrap();
        assert_eq!(read, Some(IndexRead::PerKey(vec![Posting::new(1, "quick", 4, 5)])));
        assert_eq!(db.read_index("doc", "zz", None).unwrap(), Some(IndexRead::PerKey(Vec::new())));
        assert_eq!(db.read_index("nope", "qu", None).unwrap(), None);
    }

    #[test]
    fn test_lookup_postings() {
        let db = IndexDatabase::open_in_memory().unwrap();
        db.save_index("doc", &sample_index(), Some("fr")).unwrap();

        let (count, postings) = db.lookup_postings("doc", "ow", Some("fr")).unwrap().unwrap();
        assert_eq!(count, 2);
        assert_eq!(postings.unwrap().len(), 2);
        assert_eq!(db.lookup_postings("doc", "zz", Some("fr")).unwrap(), Some((2, None)));
        assert_eq!(db.lookup_postings("doc", "ow", None).unwrap(), None);
        assert_eq!(db.lookup_postings("nope", "ow", Some("fr")).unwrap(), None);
    }

    #[test]
    fn test_read_index_whole_for_small_documents() {
        let db = IndexDatabase::open_in_memory().unwrap().with_whole_index_limit(10);
        db.store_index("doc", &sample_index(), None).unwrap();
        let read = db.read_index("doc", "qu", None).unwrap();
        assert_eq!(read, Some(IndexRead::Whole(sample_index())));
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("index.db");
        {
            let db = IndexDatabase::open(&path).unwrap();
            db.save_index("doc", &sample_index(), None).unwrap();
        }
        let reopened = IndexDatabase::open(&path).unwrap();
        assert_eq!(reopened.load_index("doc", None).unwrap(), Some(sample_index()));
    }
}
