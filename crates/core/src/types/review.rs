//! Product review recorded by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ProductId, ReviewId, UserId};

/// A customer review for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    /// Display name of the reviewer at post time.
    pub user_name: String,
    /// Star rating, 1 to 5.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    /// How many users marked the review helpful.
    #[serde(default)]
    pub helpful: u32,
}
