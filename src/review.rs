//! Review rows - one user-submitted review of a bank
//!
//! `review_id` comes from the source feed and is never generated here.
//! Sentiment columns hold the output of an external classifier and are
//! stored as given.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Categorical sentiment produced by an external classifier.
///
/// The `sentiment_label` column is free text; this enum is a convenience for
/// callers that work with the usual three-way classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Get the string representation stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }

    /// Get all labels
    pub fn all() -> &'static [SentimentLabel] {
        &[
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ]
    }
}

impl FromStr for SentimentLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "pos" | "label_2" => Ok(SentimentLabel::Positive),
            "neutral" | "neu" | "label_1" => Ok(SentimentLabel::Neutral),
            "negative" | "neg" | "label_0" => Ok(SentimentLabel::Negative),
            _ => Err(Error::InvalidValue(format!("Unknown sentiment label: {}", s))),
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a stored review date. Accepts `YYYY-MM-DD` optionally followed by a
/// time part (`2024-01-10 00:00:00`, `2024-01-10T08:30:00Z`), which is dropped.
pub fn parse_review_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let (date, rest) = NaiveDate::parse_and_remainder(raw, "%Y-%m-%d")
        .map_err(|e| Error::InvalidValue(format!("Invalid review date '{}': {}", raw, e)))?;
    if !rest.is_empty() && !rest.starts_with(|c: char| c == ' ' || c == 'T') {
        return Err(Error::InvalidValue(format!("Invalid review date '{}'", raw)));
    }
    Ok(date)
}

/// A review in the `reviews` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Identifier owned by the source feed
    pub review_id: String,
    /// Owning bank
    pub bank_id: i64,
    pub review_text: Option<String>,
    /// Star rating, usually 1-5
    pub rating: Option<i16>,
    pub review_date: Option<NaiveDate>,
    /// Denormalized year of `review_date`, written by the caller
    pub review_year: Option<i32>,
    /// Denormalized month of `review_date`, written by the caller
    pub review_month: Option<i32>,
    pub user_name: Option<String>,
    /// Helpfulness votes
    pub thumbs_up: Option<i64>,
    /// Denormalized length of `review_text`, written by the caller
    pub text_length: Option<i64>,
    /// Origin channel, e.g. "Google Play"
    pub source: Option<String>,
    pub sentiment_label: Option<String>,
    pub sentiment_score: Option<f64>,
}

impl Review {
    /// Create a review with only the required identifiers
    pub fn new(review_id: impl Into<String>, bank_id: i64) -> Self {
        Self {
            review_id: review_id.into(),
            bank_id,
            review_text: None,
            rating: None,
            review_date: None,
            review_year: None,
            review_month: None,
            user_name: None,
            thumbs_up: None,
            text_length: None,
            source: None,
            sentiment_label: None,
            sentiment_score: None,
        }
    }

    /// Set the review body
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.review_text = Some(text.into());
        self
    }

    /// Set the star rating
    pub fn with_rating(mut self, rating: i16) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the submission date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.review_date = Some(date);
        self
    }

    /// Set the reviewer display name
    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Set the helpfulness vote count
    pub fn with_thumbs_up(mut self, thumbs_up: i64) -> Self {
        self.thumbs_up = Some(thumbs_up);
        self
    }

    /// Set the origin channel
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the classifier output
    pub fn with_sentiment(mut self, label: impl Into<String>, score: f64) -> Self {
        self.sentiment_label = Some(label.into());
        self.sentiment_score = Some(score);
        self
    }

    /// Parse `review_date` from an ISO-8601 `YYYY-MM-DD` string
    pub fn with_date_str(self, date: &str) -> Result<Self> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|e| Error::InvalidValue(format!("Invalid review date '{}': {}", date, e)))?;
        Ok(self.with_date(parsed))
    }

    /// The sentiment label as a known category, if it is one
    pub fn sentiment(&self) -> Option<SentimentLabel> {
        self.sentiment_label.as_deref().and_then(|s| s.parse().ok())
    }

    /// Fill `review_year`, `review_month` and `text_length` from `review_date`
    /// and `review_text`, leaving any value the caller already set untouched.
    ///
    /// The store never calls this; the denormalized columns are whatever the
    /// writer puts there.
    pub fn derive_missing(mut self) -> Self {
        if let Some(date) = self.review_date {
            self.review_year.get_or_insert(date.year());
            self.review_month.get_or_insert(date.month() as i32);
        }
        if let Some(text) = &self.review_text {
            self.text_length.get_or_insert(text.chars().count() as i64);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_label_roundtrip() {
        for label in SentimentLabel::all() {
            let parsed: SentimentLabel = label.as_str().parse().unwrap();
            assert_eq!(*label, parsed);
        }
    }

    #[test]
    fn test_sentiment_label_aliases() {
        assert_eq!(SentimentLabel::from_str("POSITIVE").unwrap(), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_str("neg").unwrap(), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_str(" Neutral ").unwrap(), SentimentLabel::Neutral);
        assert!(SentimentLabel::from_str("mixed").is_err());
    }

    #[test]
    fn test_derive_missing_fills_only_empty_fields() {
        let review = Review::new("r1", 1)
            .with_text("Great app, fast transfers")
            .with_date_str("2024-01-10")
            .unwrap()
            .derive_missing();

        assert_eq!(review.review_year, Some(2024));
        assert_eq!(review.review_month, Some(1));
        assert_eq!(review.text_length, Some(25));

        let mut supplied = Review::new("r2", 1).with_text("ok").with_date_str("2023-12-31").unwrap();
        supplied.text_length = Some(1);
        supplied.review_month = Some(6);
        let supplied = supplied.derive_missing();
        assert_eq!(supplied.text_length, Some(1));
        assert_eq!(supplied.review_month, Some(6));
        assert_eq!(supplied.review_year, Some(2023));
    }

    #[test]
    fn test_derive_missing_counts_characters() {
        let review = Review::new("r3", 1).with_text("très bien").derive_missing();
        assert_eq!(review.text_length, Some(9));
        assert!(review.review_year.is_none());
    }

    #[test]
    fn test_invalid_date_rejected() {
        let err = Review::new("r4", 1).with_date_str("10/01/2024").unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn test_parse_review_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(parse_review_date("2024-01-10").unwrap(), expected);
        assert_eq!(parse_review_date("2024-01-10 00:00:00").unwrap(), expected);
        assert_eq!(parse_review_date("2024-01-10T08:30:00Z").unwrap(), expected);
        assert!(parse_review_date("2024-01-10x").is_err());
        assert!(parse_review_date("10/01/2024").is_err());
    }

    #[test]
    fn test_free_text_sentiment_label() {
        let review = Review::new("r5", 1).with_sentiment("mixed", 0.1);
        assert_eq!(review.sentiment_label.as_deref(), Some("mixed"));
        assert!(review.sentiment().is_none());

        let review = Review::new("r6", 1).with_sentiment("positive", 0.93);
        assert_eq!(review.sentiment(), Some(SentimentLabel::Positive));
    }
}
