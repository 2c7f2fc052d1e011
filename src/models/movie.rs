// src/models/movie.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::review::Review;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: String,
    pub name: String,
    pub tmdb_id: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<String>,
    pub genres: Json<Vec<String>>,
    pub rating: f64,
    pub num_reviews: i64,
    pub reviews: Json<Vec<Review>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog import payload submitted by an administrator. The metadata
/// comes from a TMDB lookup done outside this server.
#[derive(Debug, Deserialize)]
pub struct MovieForm {
    pub name: String,
    pub tmdb_id: Option<String>,
    pub overview: Option<String>,
    pub tagline: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<String>,
    pub genres: Option<Vec<String>>,
}
