//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, params, OptionalExtension};
use serde::Serialize;
use crate::{Error, Result, classify};
use crate::bank::{Bank, NewBank};
use crate::review::{Review, parse_review_date};
use super::schema;

/// Ensure both tables and the four review indexes exist on `conn`.
///
/// Runs every statement inside one savepoint with "if not exists"
/// semantics, so repeated calls are no-ops. Touches no row data.
/// Safe to call while the connection already has a transaction open.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("SAVEPOINT ensure_schema")?;
    if let Err(e) = apply_schema(conn) {
        conn.execute_batch("ROLLBACK TO ensure_schema; RELEASE ensure_schema")?;
        return Err(e);
    }
    conn.execute_batch("RELEASE ensure_schema")?;
    Ok(())
}

fn apply_schema(conn: &Connection) -> Result<()> {
    for stmt in schema::all_schema_statements() {
        tracing::debug!("Applying DDL: {}", first_line(stmt));
        conn.execute(stmt, [])?;
    }
    Ok(())
}

fn first_line(stmt: &str) -> &str {
    stmt.trim().lines().next().unwrap_or("")
}

/// SQLite-backed storage for banks and their reviews
pub struct ReviewStore {
    conn: Connection,
}

impl ReviewStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("Opening review store at {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an existing database file without creating it or touching its schema
    pub fn open_existing(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    /// Wrap an already-open connection, enabling foreign keys and ensuring the schema
    pub fn from_connection(conn: Connection) -> Result<Self> {
        // Off by default in SQLite, and a no-op once a transaction is open
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Idempotently create tables and indexes
    pub fn ensure_schema(&self) -> Result<()> {
        ensure_schema(&self.conn)?;
        tracing::info!(
            "Schema ensured: {} tables, {} indexes",
            schema::TABLES.len(),
            schema::INDEXES.len()
        );
        Ok(())
    }

    /// Whether the connection enforces foreign keys
    pub fn foreign_keys_enabled(&self) -> Result<bool> {
        let enabled: i64 = self.conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
        Ok(enabled == 1)
    }

    // ========== Bank Operations ==========

    /// Insert a bank and return its assigned id
    pub fn insert_bank(&self, bank: &NewBank) -> Result<i64> {
        self.conn
            .execute(
                r#"
                INSERT INTO banks (bank_code, bank_name, app_id, current_rating, total_ratings, total_reviews)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    bank.bank_code,
                    bank.bank_name,
                    bank.app_id,
                    bank.current_rating,
                    bank.total_ratings,
                    bank.total_reviews,
                ],
            )
            .map_err(classify)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a bank by id
    pub fn get_bank(&self, bank_id: i64) -> Result<Option<Bank>> {
        self.conn
            .query_row(
                "SELECT bank_id, bank_code, bank_name, app_id, current_rating, total_ratings, total_reviews FROM banks WHERE bank_id = ?1",
                [bank_id],
                |row| self.row_to_bank(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Refresh the aggregate rating statistics of a bank.
    /// `bank_id` itself is never rewritten.
    pub fn update_bank_ratings(
        &self,
        bank_id: i64,
        current_rating: Option<f64>,
        total_ratings: Option<i64>,
        total_reviews: Option<i64>,
    ) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE banks SET current_rating = ?2, total_ratings = ?3, total_reviews = ?4 WHERE bank_id = ?1",
                params![bank_id, current_rating, total_ratings, total_reviews],
            )
            .map_err(classify)?;
        if changed == 0 {
            return Err(Error::BankNotFound(bank_id));
        }
        Ok(())
    }

    /// Delete a bank; its reviews go with it. Returns whether a row was removed.
    pub fn delete_bank(&self, bank_id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM banks WHERE bank_id = ?1", [bank_id])
            .map_err(classify)?;
        if removed > 0 {
            tracing::info!("Deleted bank {} and its reviews", bank_id);
        }
        Ok(removed > 0)
    }

    /// Count all banks
    pub fn count_banks(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM banks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a Bank
    fn row_to_bank(&self, row: &rusqlite::Row) -> rusqlite::Result<Bank> {
        Ok(Bank {
            bank_id: row.get(0)?,
            bank_code: row.get(1)?,
            bank_name: row.get(2)?,
            app_id: row.get(3)?,
            current_rating: row.get(4)?,
            total_ratings: row.get(5)?,
            total_reviews: row.get(6)?,
        })
    }

    // ========== Review Operations ==========

    /// Insert a review. Fails on a duplicate `review_id` or an unknown `bank_id`.
    pub fn insert_review(&self, review: &Review) -> Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO reviews (
                    review_id, bank_id, review_text, rating, review_date, review_year, review_month,
                    user_name, thumbs_up, text_length, source, sentiment_label, sentiment_score
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    review.review_id,
                    review.bank_id,
                    review.review_text,
                    review.rating,
                    review.review_date,
                    review.review_year,
                    review.review_month,
                    review.user_name,
                    review.thumbs_up,
                    review.text_length,
                    review.source,
                    review.sentiment_label,
                    review.sentiment_score,
                ],
            )
            .map_err(classify)?;
        Ok(())
    }

    /// Get a review by id
    pub fn get_review(&self, review_id: &str) -> Result<Option<Review>> {
        self.conn
            .query_row(
                r#"
                SELECT review_id, bank_id, review_text, rating, review_date, review_year, review_month,
                       user_name, thumbs_up, text_length, source, sentiment_label, sentiment_score
                FROM reviews WHERE review_id = ?1
                "#,
                [review_id],
                |row| self.row_to_review(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Count all reviews
    pub fn count_reviews(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM reviews", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a Review
    fn row_to_review(&self, row: &rusqlite::Row) -> rusqlite::Result<Review> {
        Ok(Review {
            review_id: row.get(0)?,
            bank_id: row.get(1)?,
            review_text: row.get(2)?,
            rating: row.get(3)?,
            review_date: row
                .get::<_, Option<String>>(4)?
                .map(|raw| parse_review_date(&raw))
                .transpose()
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
                })?,
            review_year: row.get(5)?,
            review_month: row.get(6)?,
            user_name: row.get(7)?,
            thumbs_up: row.get(8)?,
            text_length: row.get(9)?,
            source: row.get(10)?,
            sentiment_label: row.get(11)?,
            sentiment_score: row.get(12)?,
        })
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    // ========== Introspection ==========

    /// Tables and indexes present in the database, excluding SQLite internals
    pub fn schema_objects(&self) -> Result<Vec<SchemaObject>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT type, name, tbl_name FROM sqlite_master
            WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%'
            ORDER BY type DESC, name
            "#,
        )?;

        let objects = stmt
            .query_map([], |row| {
                let kind: String = row.get(0)?;
                Ok(SchemaObject {
                    kind: if kind == "table" { SchemaObjectKind::Table } else { SchemaObjectKind::Index },
                    name: row.get(1)?,
                    table: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(objects)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<SchemaReport> {
        let objects = self.schema_objects()?;
        let (tables, indexes): (Vec<_>, Vec<_>) = objects
            .into_iter()
            .partition(|o| o.kind == SchemaObjectKind::Table);

        let tables: Vec<String> = tables.into_iter().map(|o| o.name).collect();
        let has = |name: &str| tables.iter().any(|t| t == name);
        let banks = if has("banks") { self.count_banks()? } else { 0 };
        let reviews = if has("reviews") { self.count_reviews()? } else { 0 };

        Ok(SchemaReport {
            indexes: indexes.into_iter().map(|o| o.name).collect(),
            banks,
            reviews,
            foreign_keys: self.foreign_keys_enabled()?,
            tables,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaObjectKind {
    Table,
    Index,
}

/// A table or index found in `sqlite_master`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaObject {
    pub kind: SchemaObjectKind,
    pub name: String,
    /// Table the object belongs to (itself, for tables)
    pub table: String,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub tables: Vec<String>,
    pub indexes: Vec<String>,
    pub banks: usize,
    pub reviews: usize,
    pub foreign_keys: bool,
}

impl SchemaReport {
    /// Every expected table and index is present
    pub fn is_complete(&self) -> bool {
        schema::TABLES.iter().all(|t| self.tables.iter().any(|x| x == t))
            && schema::INDEXES.iter().all(|i| self.indexes.iter().any(|x| x == i))
    }

    /// Expected objects that are absent
    pub fn missing(&self) -> Vec<&'static str> {
        schema::TABLES
            .iter()
            .filter(|t| !self.tables.iter().any(|x| x == *t))
            .chain(schema::INDEXES.iter().filter(|i| !self.indexes.iter().any(|x| x == *i)))
            .copied()
            .collect()
    }
}

impl std::fmt::Display for SchemaReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Tables: {}", self.tables.join(", "))?;
        writeln!(f, "  Indexes: {}", self.indexes.join(", "))?;
        writeln!(f, "  Banks: {}", self.banks)?;
        writeln!(f, "  Reviews: {}", self.reviews)?;
        writeln!(f, "  Foreign keys: {}", if self.foreign_keys { "on" } else { "off" })
    }
}
