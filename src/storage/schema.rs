//! Database schema definitions

/// SQL to create the banks table
pub const CREATE_BANKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS banks (
    bank_id INTEGER PRIMARY KEY AUTOINCREMENT,
    bank_code TEXT UNIQUE,
    bank_name TEXT NOT NULL,
    app_id TEXT,
    current_rating REAL,
    total_ratings INTEGER,
    total_reviews INTEGER
)
"#;

/// SQL to create the reviews table
/// Must run after `banks`: `bank_id` references it
pub const CREATE_REVIEWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reviews (
    review_id TEXT PRIMARY KEY,
    bank_id INTEGER REFERENCES banks(bank_id) ON DELETE CASCADE,
    review_text TEXT,
    rating INTEGER,
    review_date DATE,
    review_year INTEGER,
    review_month INTEGER,
    user_name TEXT,
    thumbs_up INTEGER,
    text_length INTEGER,
    source TEXT,
    sentiment_label TEXT,
    sentiment_score REAL
)
"#;

/// Table names in creation order
pub const TABLES: &[&str] = &["banks", "reviews"];

/// Index names, matching `CREATE_INDEXES` one to one
pub const INDEXES: &[&str] = &[
    "idx_reviews_bank_id",
    "idx_reviews_rating",
    "idx_reviews_sentiment_score",
    "idx_reviews_review_date",
];

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_reviews_bank_id ON reviews(bank_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_rating ON reviews(rating)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_sentiment_score ON reviews(sentiment_score)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_review_date ON reviews(review_date)",
];

/// All schema creation statements, tables before indexes
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_BANKS_TABLE, CREATE_REVIEWS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// The schema as a standalone SQL script
pub fn schema_script() -> String {
    let mut script = String::new();
    for stmt in all_schema_statements() {
        script.push_str(stmt.trim());
        script.push_str(";\n");
        if stmt.trim_start().starts_with("CREATE TABLE") {
            script.push('\n');
        }
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banks_created_before_reviews() {
        let stmts = all_schema_statements();
        let banks = stmts.iter().position(|s| s.contains("CREATE TABLE IF NOT EXISTS banks")).unwrap();
        let reviews = stmts.iter().position(|s| s.contains("CREATE TABLE IF NOT EXISTS reviews")).unwrap();
        assert!(banks < reviews);
        assert_eq!(stmts.len(), TABLES.len() + INDEXES.len());
    }

    #[test]
    fn test_index_names_match_statements() {
        for (name, stmt) in INDEXES.iter().zip(CREATE_INDEXES) {
            assert!(stmt.contains(name), "{} not in {}", name, stmt);
        }
    }

    #[test]
    fn test_every_statement_is_idempotent() {
        for stmt in all_schema_statements() {
            assert!(stmt.contains("IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_schema_script_terminates_statements() {
        let script = schema_script();
        assert_eq!(script.matches(';').count(), all_schema_statements().len());
        assert!(script.starts_with("CREATE TABLE IF NOT EXISTS banks"));
    }
}
