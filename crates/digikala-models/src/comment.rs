use serde::{Deserialize, Serialize};
use crate::purchase::PurchaseStatus;

/// One public product comment, normalized from the comments API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CommentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub author: String, // May be empty for anonymous reviewers
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>, // 1-5 stars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub purchase_status: PurchaseStatus,
    pub likes: u64,
    pub dislikes: u64,
    pub positive_points: Vec<String>,
    pub negative_points: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>, // Kept verbatim, Digikala sends Jalali dates
}

impl CommentRecord {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    /// Round a raw API rating onto the 1-5 scale; 0 means "not rated"
    pub fn normalize_rating(raw: f64) -> Option<u8> {
        if !raw.is_finite() {
            return None;
        }
        let rounded = raw.round();
        if rounded < Self::MIN_RATING as f64 || rounded > Self::MAX_RATING as f64 {
            return None;
        }
        Some(rounded as u8)
    }
}
