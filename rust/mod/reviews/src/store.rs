use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use worklens_core::ServiceError;

use crate::model::{Company, Review, ReviewCategory};

/// SQL DDL for the reviews database.
///
/// Each table stores the full JSON document in a `data` TEXT column,
/// with indexed columns extracted for filtering and uniqueness.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS companies (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        slug TEXT UNIQUE,
        industry TEXT,
        review_count INTEGER DEFAULT 0,
        create_at TEXT,
        update_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        company_id TEXT,
        category TEXT,
        rating INTEGER,
        status TEXT,
        submitted_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_reviews_company
        ON reviews (company_id, category, status)",
];

/// Embedded SQLite store for companies and reviews.
///
/// Single connection behind a mutex; WAL mode for concurrent reads.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self, ServiceError> {
        let conn = Connection::open(path)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Self::init(conn)
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, ServiceError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, ServiceError> {
        for ddl in SCHEMA {
            conn.execute(ddl, [])
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
        }
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ServiceError> {
        self.conn
            .lock()
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    // ── Companies ──

    pub fn insert_company(&self, company: &Company) -> Result<(), ServiceError> {
        let json = serde_json::to_string(company)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let conn = self.locked()?;
        conn.execute(
            "INSERT INTO companies (id, data, name, slug, industry, review_count, create_at, update_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                company.id,
                json,
                company.name,
                company.slug,
                company.industry,
                company.review_count as i64,
                company.create_at,
                company.update_at,
            ],
        )
        .map_err(map_sql_err)?;
        Ok(())
    }

    /// Rewrite a company row (JSON document plus indexed columns).
    pub fn update_company(&self, company: &Company) -> Result<(), ServiceError> {
        let json = serde_json::to_string(company)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let conn = self.locked()?;
        let n = conn
            .execute(
                "UPDATE companies
                 SET data = ?2, name = ?3, industry = ?4, review_count = ?5, update_at = ?6
                 WHERE id = ?1",
                rusqlite::params![
                    company.id,
                    json,
                    company.name,
                    company.industry,
                    company.review_count as i64,
                    company.update_at,
                ],
            )
            .map_err(map_sql_err)?;
        if n == 0 {
            return Err(ServiceError::NotFound(format!("company '{}'", company.id)));
        }
        Ok(())
    }

    pub fn get_company(&self, id: &str) -> Result<Company, ServiceError> {
        self.company_by("id", id)
    }

    pub fn get_company_by_slug(&self, slug: &str) -> Result<Company, ServiceError> {
        self.company_by("slug", slug)
    }

    fn company_by(&self, column: &str, key: &str) -> Result<Company, ServiceError> {
        let conn = self.locked()?;
        let sql = format!("SELECT data FROM companies WHERE {} = ?1", column);
        let json: Option<String> = conn
            .query_row(&sql, [key], |row| row.get(0))
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(map_sql_err(other)),
            })?;
        let json = json.ok_or_else(|| ServiceError::NotFound(format!("company '{}'", key)))?;
        serde_json::from_str(&json).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// List companies with an optional industry filter.
    /// `sort` is "name" (default) or "reviews" (most-reviewed first).
    pub fn list_companies(
        &self,
        industry: Option<&str>,
        sort: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Company>, usize), ServiceError> {
        let conn = self.locked()?;

        let (filter, params): (&str, Vec<String>) = match industry {
            Some(i) => ("WHERE industry = ?1", vec![i.to_string()]),
            None => ("", Vec::new()),
        };
        let order = match sort {
            Some("reviews") => "review_count DESC, name ASC",
            _ => "name ASC",
        };

        let total: usize = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM companies {}", filter),
                rusqlite::params_from_iter(params.iter()),
                |row| row.get::<_, i64>(0),
            )
            .map_err(map_sql_err)? as usize;

        let sql = format!(
            "SELECT data FROM companies {} ORDER BY {} LIMIT {} OFFSET {}",
            filter, order, limit, offset
        );
        let mut stmt = conn.prepare(&sql).map_err(map_sql_err)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                row.get::<_, String>(0)
            })
            .map_err(map_sql_err)?;

        let mut items = Vec::new();
        for row in rows {
            let json = row.map_err(map_sql_err)?;
            let company =
                serde_json::from_str(&json).map_err(|e| ServiceError::Internal(e.to_string()))?;
            items.push(company);
        }
        Ok((items, total))
    }

    // ── Reviews ──

    pub fn insert_review(&self, review: &Review) -> Result<(), ServiceError> {
        let json = serde_json::to_string(review)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let status = serde_json::to_value(review.status)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let conn = self.locked()?;
        conn.execute(
            "INSERT INTO reviews (id, data, company_id, category, rating, status, submitted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                review.id,
                json,
                review.company_id,
                review.category.as_str(),
                review.rating as i64,
                status.as_str().unwrap_or_default(),
                review.submitted_at,
            ],
        )
        .map_err(map_sql_err)?;
        Ok(())
    }

    /// List published reviews of a company, newest first, optionally
    /// filtered by category.
    pub fn list_published_reviews(
        &self,
        company_id: &str,
        category: Option<ReviewCategory>,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Review>, usize), ServiceError> {
        let conn = self.locked()?;

        let (filter, params): (&str, Vec<String>) = match category {
            Some(cat) => (
                "WHERE company_id = ?1 AND status = 'PUBLISHED' AND category = ?2",
                vec![company_id.to_string(), cat.as_str().to_string()],
            ),
            None => (
                "WHERE company_id = ?1 AND status = 'PUBLISHED'",
                vec![company_id.to_string()],
            ),
        };

        let total: usize = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM reviews {}", filter),
                rusqlite::params_from_iter(params.iter()),
                |row| row.get::<_, i64>(0),
            )
            .map_err(map_sql_err)? as usize;

        let sql = format!(
            "SELECT data FROM reviews {} ORDER BY submitted_at DESC, id ASC LIMIT {} OFFSET {}",
            filter, limit, offset
        );
        let mut stmt = conn.prepare(&sql).map_err(map_sql_err)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), |row| {
                row.get::<_, String>(0)
            })
            .map_err(map_sql_err)?;

        let mut items = Vec::new();
        for row in rows {
            let json = row.map_err(map_sql_err)?;
            let review =
                serde_json::from_str(&json).map_err(|e| ServiceError::Internal(e.to_string()))?;
            items.push(review);
        }
        Ok((items, total))
    }

    /// Published review counts per category for one company.
    pub fn category_counts(
        &self,
        company_id: &str,
    ) -> Result<Vec<(ReviewCategory, usize)>, ServiceError> {
        let conn = self.locked()?;
        let mut stmt = conn
            .prepare(
                "SELECT category, COUNT(*) FROM reviews
                 WHERE company_id = ?1 AND status = 'PUBLISHED'
                 GROUP BY category",
            )
            .map_err(map_sql_err)?;
        let rows = stmt
            .query_map([company_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })
            .map_err(map_sql_err)?;

        let mut counts = Vec::new();
        for row in rows {
            let (name, n) = row.map_err(map_sql_err)?;
            if let Some(cat) = ReviewCategory::parse(&name) {
                counts.push((cat, n as usize));
            }
        }
        Ok(counts)
    }
}

fn map_sql_err(e: rusqlite::Error) -> ServiceError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint") {
        ServiceError::Conflict(msg)
    } else {
        ServiceError::Storage(msg)
    }
}
