// src/models/restaurant.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::review::Review;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub alias: String,
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: String,
    pub yelp_id: Option<String>,
    pub name: String,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub categories: Json<Vec<Category>>,
    // Yelp's own rating and review count, kept separate from ours
    pub yelp_rating: Option<f64>,
    pub review_count: Option<i64>,
    pub rating: f64,
    pub num_reviews: i64,
    pub reviews: Json<Vec<Review>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog import payload from a Yelp business lookup.
#[derive(Debug, Deserialize)]
pub struct RestaurantForm {
    pub name: String,
    pub yelp_id: Option<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub price: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub categories: Option<Vec<Category>>,
    pub yelp_rating: Option<f64>,
    pub review_count: Option<i64>,
}
