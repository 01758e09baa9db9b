//! Driver listings, vehicle classes and reviews

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum review comment length in characters
pub const MAX_COMMENT_CHARS: usize = 500;

/// A driver as shown in search results and on the public profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverListing {
    pub id: u32,
    pub name: String,
    /// Average score on the 0-10 scale
    pub rating: f32,
    pub review_count: u32,
    /// Base price in cents
    pub price: u64,
    pub typical_duration: String,
    pub capacity_kg: u32,
    pub phone: String,
    pub verified: bool,
    pub description: String,
    pub issues_invoice: bool,
    pub carries_furniture: bool,
    pub service_area: String,
}

impl DriverListing {
    pub fn rating_text(&self) -> &'static str {
        score_label(self.rating)
    }

    pub fn vehicle(&self) -> String {
        format!("{}kg", self.capacity_kg)
    }
}

/// Vehicle capacity class offered on the home screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleClass {
    pub capacity_kg: u32,
    pub height: String,
    pub width: String,
    pub depth: String,
    /// Starting price in cents
    pub starting_price: u64,
}

impl VehicleClass {
    pub fn title(&self) -> String {
        format!("Até {}Kg", self.capacity_kg)
    }
}

/// Label for a 0-10 score. Scores below 1 have no label.
pub fn score_label(score: f32) -> &'static str {
    if score >= 9.0 {
        "Excelente"
    } else if score >= 7.0 {
        "Muito bom"
    } else if score >= 5.0 {
        "Bom"
    } else if score >= 3.0 {
        "Regular"
    } else if score >= 1.0 {
        "Ruim"
    } else {
        ""
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Por favor, dê uma nota de 1 a 10 para o freteiro.")]
    ScoreOutOfRange,
    #[error("O comentário deve ter no máximo 500 caracteres.")]
    CommentTooLong,
}

/// Client review of a finished freight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    pub score: u8,
    pub comment: Option<String>,
    pub date: NaiveDate,
}

impl Review {
    pub fn new(
        author: impl Into<String>,
        score: u8,
        comment: Option<String>,
        date: NaiveDate,
    ) -> Result<Self, ReviewError> {
        if !(1..=10).contains(&score) {
            return Err(ReviewError::ScoreOutOfRange);
        }
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if let Some(ref c) = comment {
            if c.chars().count() > MAX_COMMENT_CHARS {
                return Err(ReviewError::CommentTooLong);
            }
        }

        Ok(Self {
            author: author.into(),
            score,
            comment,
            date,
        })
    }

    pub fn label(&self) -> &'static str {
        score_label(self.score as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_score_labels() {
        assert_eq!(score_label(10.0), "Excelente");
        assert_eq!(score_label(9.0), "Excelente");
        assert_eq!(score_label(8.0), "Muito bom");
        assert_eq!(score_label(6.3), "Bom");
        assert_eq!(score_label(4.0), "Regular");
        assert_eq!(score_label(1.0), "Ruim");
        assert_eq!(score_label(0.0), "");
    }

    #[test]
    fn test_review_requires_score_in_range() {
        assert_eq!(
            Review::new("Ana", 0, None, day()).unwrap_err(),
            ReviewError::ScoreOutOfRange
        );
        assert_eq!(
            Review::new("Ana", 11, None, day()).unwrap_err(),
            ReviewError::ScoreOutOfRange
        );
        assert!(Review::new("Ana", 10, None, day()).is_ok());
    }

    #[test]
    fn test_review_comment_limit_counts_chars() {
        let exactly = "é".repeat(MAX_COMMENT_CHARS);
        assert!(Review::new("Ana", 8, Some(exactly), day()).is_ok());

        let too_long = "a".repeat(MAX_COMMENT_CHARS + 1);
        assert_eq!(
            Review::new("Ana", 8, Some(too_long), day()).unwrap_err(),
            ReviewError::CommentTooLong
        );
    }

    #[test]
    fn test_blank_comment_is_dropped() {
        let review = Review::new("Ana", 7, Some("   ".to_string()), day()).unwrap();
        assert_eq!(review.comment, None);
        assert_eq!(review.label(), "Muito bom");
    }
}
