// src/models/review.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::PublicUser;

/// A single review embedded in an entity's `reviews` JSON column.
/// `user` is the authoring user's id; the user row itself lives in `users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review shape returned by entity read endpoints: the author id is
/// resolved into the reviewer's public profile.
#[derive(Debug, Serialize)]
pub struct PopulatedReview {
    pub id: String,
    pub user: Option<PublicUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewUpsertRequest {
    #[serde(rename = "movieID")]
    pub movie_id: Option<String>,
    #[serde(rename = "restaurantID")]
    pub restaurant_id: Option<String>,
    #[serde(rename = "bookID")]
    pub book_id: Option<String>,
    pub comment: Option<String>,
    pub rating: f64,
}

#[derive(Debug, Deserialize)]
pub struct ReviewDeleteRequest {
    #[serde(rename = "movieID")]
    pub movie_id: Option<String>,
    #[serde(rename = "restaurantID")]
    pub restaurant_id: Option<String>,
    #[serde(rename = "bookID")]
    pub book_id: Option<String>,
    #[serde(rename = "reviewID")]
    pub review_id: Option<String>,
}
