// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub discord_id: Option<String>,
    pub discriminator: Option<String>,
    pub image: Option<String>,
    pub is_reviewer: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// The subset of a user that entity read endpoints attach to reviews.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub discord_id: Option<String>,
    pub discriminator: Option<String>,
    pub image: Option<String>,
}
