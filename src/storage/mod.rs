//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - banks(bank_id, bank_code, bank_name, app_id, current_rating, total_ratings, total_reviews)
//! - reviews(review_id, bank_id -> banks ON DELETE CASCADE, review_text, rating, review_date, ...)

pub mod schema;
pub mod sqlite;

pub use sqlite::{ReviewStore, SchemaObject, SchemaObjectKind, SchemaReport, ensure_schema};
