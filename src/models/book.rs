// src/models/book.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::review::Review;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: String,
    pub isbn: String,
    pub google_id: String,
    pub google_link: Option<String>,
    pub openlibrary_key: Option<String>,
    pub openlibrary_url: Option<String>,
    pub openlibrary_id: Option<String>,
    pub goodreads_id: Option<String>,
    pub amazon_id: Option<String>,
    pub authors: Json<Vec<String>>,
    pub title: String,
    pub subjects: Json<Vec<String>>,
    pub description: Option<String>,
    pub text_snippet: Option<String>,
    pub page_count: Option<i64>,
    pub published_date: Option<String>,
    pub google_image_url: Option<String>,
    pub openlib_image_url: Option<String>,
    // Google Books community rating, kept separate from ours
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub rating: f64,
    pub num_reviews: i64,
    pub reviews: Json<Vec<Review>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog import payload merged from Google Books and OpenLibrary lookups.
#[derive(Debug, Deserialize)]
pub struct BookForm {
    pub isbn: String,
    pub google_id: String,
    pub title: String,
    pub google_link: Option<String>,
    pub openlibrary_key: Option<String>,
    pub openlibrary_url: Option<String>,
    pub openlibrary_id: Option<String>,
    pub goodreads_id: Option<String>,
    pub amazon_id: Option<String>,
    pub authors: Option<Vec<String>>,
    pub subjects: Option<Vec<String>>,
    pub description: Option<String>,
    pub text_snippet: Option<String>,
    pub page_count: Option<i64>,
    pub published_date: Option<String>,
    pub google_image_url: Option<String>,
    pub openlib_image_url: Option<String>,
    pub average_rating: Option<f64>,
    pub ratings_count: Option<i64>,
}
