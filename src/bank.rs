//! Bank rows - one financial institution being reviewed
//!
//! `bank_id` is assigned by the store on insert and never changes afterwards.
//! `bank_code`, when present, is unique across all banks.

use serde::{Deserialize, Serialize};

/// A persisted bank, as read back from the `banks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bank {
    /// Store-assigned identifier
    pub bank_id: i64,
    /// Optional external code, unique when present
    pub bank_code: Option<String>,
    /// Human-readable name
    pub bank_name: String,
    /// Identifier of the associated mobile application
    pub app_id: Option<String>,
    /// Current aggregate star rating
    pub current_rating: Option<f64>,
    /// Number of ratings behind `current_rating`
    pub total_ratings: Option<i64>,
    /// Number of textual reviews on record
    pub total_reviews: Option<i64>,
}

/// Insert payload for a bank. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBank {
    pub bank_code: Option<String>,
    pub bank_name: String,
    pub app_id: Option<String>,
    pub current_rating: Option<f64>,
    pub total_ratings: Option<i64>,
    pub total_reviews: Option<i64>,
}

impl NewBank {
    /// Create a bank payload with only the required name
    pub fn new(bank_name: impl Into<String>) -> Self {
        Self {
            bank_name: bank_name.into(),
            ..Default::default()
        }
    }

    /// Set the external bank code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.bank_code = Some(code.into());
        self
    }

    /// Set the mobile application id
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set the aggregate rating statistics
    pub fn with_ratings(mut self, current_rating: f64, total_ratings: i64, total_reviews: i64) -> Self {
        self.current_rating = Some(current_rating);
        self.total_ratings = Some(total_ratings);
        self.total_reviews = Some(total_reviews);
        self
    }

    /// Attach the store-assigned id, producing the persisted form
    pub fn into_bank(self, bank_id: i64) -> Bank {
        Bank {
            bank_id,
            bank_code: self.bank_code,
            bank_name: self.bank_name,
            app_id: self.app_id,
            current_rating: self.current_rating,
            total_ratings: self.total_ratings,
            total_reviews: self.total_reviews,
        }
    }
}
