// src/reviews.rs
//
// One review mutator for all three entity types. Movies, restaurants and
// books each keep their reviews embedded in a JSON column; the insert /
// replace / remove rule and the aggregate recompute are identical across
// them, so the whole thing is written once against the `Reviewable`
// capability trait.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use crate::auth::Claims;
use crate::models::book::Book;
use crate::models::movie::Movie;
use crate::models::restaurant::Restaurant;
use crate::models::review::{PopulatedReview, Review};
use crate::models::user::PublicUser;

/// What an entity type must expose so the mutator can work on it.
pub trait Reviewable: for<'r> FromRow<'r, MySqlRow> + Serialize + Send + Unpin {
    /// Backing table.
    const TABLE: &'static str;
    /// Key the entity is returned under in the review endpoint response.
    const KEY: &'static str;
    const NOT_FOUND: &'static str;

    fn id(&self) -> &str;
    /// Display name shown in client notifications.
    fn label(&self) -> &str;
    fn rating(&self) -> f64;
    fn num_reviews(&self) -> i64;
    fn reviews(&self) -> &[Review];
    fn reviews_mut(&mut self) -> &mut Vec<Review>;
    fn set_aggregates(&mut self, rating: f64, num_reviews: i64);
}

impl Reviewable for Movie {
    const TABLE: &'static str = "movies";
    const KEY: &'static str = "movie";
    const NOT_FOUND: &'static str = "movie not found";

    fn id(&self) -> &str {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn rating(&self) -> f64 {
        self.rating
    }
    fn num_reviews(&self) -> i64 {
        self.num_reviews
    }
    fn reviews(&self) -> &[Review] {
        &self.reviews.0
    }
    fn reviews_mut(&mut self) -> &mut Vec<Review> {
        &mut self.reviews.0
    }
    fn set_aggregates(&mut self, rating: f64, num_reviews: i64) {
        self.rating = rating;
        self.num_reviews = num_reviews;
    }
}

impl Reviewable for Restaurant {
    const TABLE: &'static str = "restaurants";
    const KEY: &'static str = "restaurant";
    const NOT_FOUND: &'static str = "restaurant not found";

    fn id(&self) -> &str {
        &self.id
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn rating(&self) -> f64 {
        self.rating
    }
    fn num_reviews(&self) -> i64 {
        self.num_reviews
    }
    fn reviews(&self) -> &[Review] {
        &self.reviews.0
    }
    fn reviews_mut(&mut self) -> &mut Vec<Review> {
        &mut self.reviews.0
    }
    fn set_aggregates(&mut self, rating: f64, num_reviews: i64) {
        self.rating = rating;
        self.num_reviews = num_reviews;
    }
}

impl Reviewable for Book {
    const TABLE: &'static str = "books";
    const KEY: &'static str = "book";
    const NOT_FOUND: &'static str = "book not found";

    fn id(&self) -> &str {
        &self.id
    }
    fn label(&self) -> &str {
        &self.title
    }
    fn rating(&self) -> f64 {
        self.rating
    }
    fn num_reviews(&self) -> i64 {
        self.num_reviews
    }
    fn reviews(&self) -> &[Review] {
        &self.reviews.0
    }
    fn reviews_mut(&mut self) -> &mut Vec<Review> {
        &mut self.reviews.0
    }
    fn set_aggregates(&mut self, rating: f64, num_reviews: i64) {
        self.rating = rating;
        self.num_reviews = num_reviews;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Addition,
    Modification,
}

#[derive(Debug)]
pub enum ReviewError {
    EntityNotFound(&'static str),
    ReviewNotFound,
    Unauthorized,
    Db(sqlx::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::EntityNotFound(msg) => write!(f, "{}", msg),
            ReviewError::ReviewNotFound => write!(f, "review not found"),
            ReviewError::Unauthorized => {
                write!(f, "you do not have permissions to delete that review")
            }
            ReviewError::Db(e) => write!(f, "database error: {}", e),
            ReviewError::Serialize(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl std::error::Error for ReviewError {}

impl From<sqlx::Error> for ReviewError {
    fn from(e: sqlx::Error) -> Self {
        ReviewError::Db(e)
    }
}

pub struct UpsertOutcome<T> {
    pub entity: T,
    pub action: ReviewAction,
    pub label: String,
}

/// Mean of all review ratings rounded to one decimal place, 0 when empty.
pub fn aggregate_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: f64 = reviews.iter().map(|r| r.rating).sum();
    (sum / reviews.len() as f64 * 10.0).round() / 10.0
}

fn recompute_aggregates<T: Reviewable>(entity: &mut T) {
    let rating = aggregate_rating(entity.reviews());
    let count = entity.reviews().len() as i64;
    entity.set_aggregates(rating, count);
}

/// Insert-or-replace the author's review. A prior review by the same user
/// is removed first, so an entity never holds two reviews by one user; the
/// replacement gets a fresh id and goes to the end of the list.
pub fn apply_upsert<T: Reviewable>(
    entity: &mut T,
    author_id: &str,
    rating: f64,
    comment: Option<String>,
    now: DateTime<Utc>,
) -> ReviewAction {
    let reviews = entity.reviews_mut();
    let existing = reviews.iter().position(|r| r.user == author_id);
    if let Some(index) = existing {
        reviews.remove(index);
    }
    reviews.push(Review {
        id: Uuid::new_v4().to_string(),
        user: author_id.to_string(),
        comment,
        rating,
        created_at: now,
        updated_at: now,
    });
    recompute_aggregates(entity);
    match existing {
        Some(_) => ReviewAction::Modification,
        None => ReviewAction::Addition,
    }
}

/// Locate the review a delete request refers to. A supplied review id must
/// match exactly; only when no id was sent does the caller's own review
/// get matched by author.
pub fn find_review(reviews: &[Review], review_id: Option<&str>, caller_id: &str) -> Option<usize> {
    match review_id {
        Some(rid) => reviews.iter().position(|r| r.id == rid),
        None => reviews.iter().position(|r| r.user == caller_id),
    }
}

/// Only the author or an administrator may remove a review.
pub fn can_remove(review: &Review, claims: &Claims) -> bool {
    claims.is_admin || review.user == claims.user_id
}

pub fn remove_review_at<T: Reviewable>(entity: &mut T, index: usize) -> Review {
    let removed = entity.reviews_mut().remove(index);
    recompute_aggregates(entity);
    removed
}

pub async fn load_entity<T: Reviewable>(
    pool: &MySqlPool,
    id: &str,
) -> Result<Option<T>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} WHERE id = ?", T::TABLE);
    sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(pool).await
}

pub async fn list_entities<T: Reviewable>(pool: &MySqlPool) -> Result<Vec<T>, sqlx::Error> {
    let sql = format!("SELECT * FROM {} ORDER BY created_at DESC", T::TABLE);
    sqlx::query_as::<_, T>(&sql).fetch_all(pool).await
}

// The embedded array and both aggregates are rewritten together. There is
// deliberately no version token here: concurrent writers race and the last
// write wins, matching the single-document store this mirrors.
async fn store_reviews<T: Reviewable>(pool: &MySqlPool, entity: &T) -> Result<(), sqlx::Error> {
    let sql = format!(
        "UPDATE {} SET reviews = ?, rating = ?, num_reviews = ?, updated_at = NOW() WHERE id = ?",
        T::TABLE
    );
    sqlx::query(&sql)
        .bind(Json(entity.reviews().to_vec()) as Json<Vec<Review>>)
        .bind(entity.rating())
        .bind(entity.num_reviews())
        .bind(entity.id())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn upsert_review<T: Reviewable>(
    pool: &MySqlPool,
    entity_id: &str,
    author_id: &str,
    rating: f64,
    comment: Option<String>,
) -> Result<UpsertOutcome<T>, ReviewError> {
    let mut entity: T = load_entity(pool, entity_id)
        .await?
        .ok_or(ReviewError::EntityNotFound(T::NOT_FOUND))?;
    let action = apply_upsert(&mut entity, author_id, rating, comment, Utc::now());
    store_reviews(pool, &entity).await?;
    let label = entity.label().to_string();
    Ok(UpsertOutcome {
        entity,
        action,
        label,
    })
}

pub async fn remove_review<T: Reviewable>(
    pool: &MySqlPool,
    entity_id: &str,
    review_id: Option<&str>,
    claims: &Claims,
) -> Result<(), ReviewError> {
    let mut entity: T = load_entity(pool, entity_id)
        .await?
        .ok_or(ReviewError::EntityNotFound(T::NOT_FOUND))?;
    let index =
        find_review(entity.reviews(), review_id, &claims.user_id).ok_or(ReviewError::ReviewNotFound)?;
    if !can_remove(&entity.reviews()[index], claims) {
        return Err(ReviewError::Unauthorized);
    }
    remove_review_at(&mut entity, index);
    store_reviews(pool, &entity).await?;
    Ok(())
}

/// Resolve the author ids of `reviews` into public reviewer profiles.
pub async fn populate_reviews(
    pool: &MySqlPool,
    reviews: &[Review],
) -> Result<Vec<PopulatedReview>, sqlx::Error> {
    if reviews.is_empty() {
        return Ok(Vec::new());
    }

    let mut ids: Vec<&str> = reviews.iter().map(|r| r.user.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT id, username, discord_id, discriminator, image FROM users WHERE id IN ({})",
        placeholders
    );
    let mut query = sqlx::query_as::<_, PublicUser>(&sql);
    for id in &ids {
        query = query.bind(*id);
    }
    let users = query.fetch_all(pool).await?;
    let by_id: HashMap<&str, &PublicUser> = users.iter().map(|u| (u.id.as_str(), u)).collect();

    Ok(reviews
        .iter()
        .map(|r| PopulatedReview {
            id: r.id.clone(),
            user: by_id.get(r.user.as_str()).map(|u| (*u).clone()),
            comment: r.comment.clone(),
            rating: r.rating,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

/// Entity JSON with the embedded author ids swapped for reviewer profiles.
pub async fn populate_entity<T: Reviewable>(
    pool: &MySqlPool,
    entity: &T,
) -> Result<serde_json::Value, ReviewError> {
    let populated = populate_reviews(pool, entity.reviews()).await?;
    let mut value = serde_json::to_value(entity).map_err(ReviewError::Serialize)?;
    value["reviews"] = serde_json::to_value(populated).map_err(ReviewError::Serialize)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(user: &str, rating: f64) -> Review {
        Review {
            id: Uuid::new_v4().to_string(),
            user: user.to_string(),
            comment: None,
            rating,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn movie(reviews: Vec<Review>) -> Movie {
        let rating = aggregate_rating(&reviews);
        let num_reviews = reviews.len() as i64;
        Movie {
            id: "m-1".to_string(),
            name: "Blade Runner".to_string(),
            tmdb_id: None,
            overview: None,
            tagline: None,
            poster_url: None,
            backdrop_url: None,
            release_date: None,
            genres: Json(Vec::new()),
            rating,
            num_reviews,
            reviews: Json(reviews),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn claims(user_id: &str, is_admin: bool) -> Claims {
        Claims {
            sub: user_id.to_string(),
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            is_reviewer: true,
            is_admin,
            exp: 0,
        }
    }

    #[test]
    fn upsert_on_an_empty_list_is_an_addition() {
        let mut m = movie(Vec::new());
        let action = apply_upsert(&mut m, "carol", 7.0, None, Utc::now());

        assert_eq!(action, ReviewAction::Addition);
        assert_eq!(m.num_reviews, 1);
        assert_eq!(m.rating, 7.0);
        assert_eq!(m.reviews.0[0].user, "carol");
    }

    #[test]
    fn upsert_replaces_a_prior_review_by_the_same_user() {
        let mut m = movie(vec![review("alice", 8.0), review("bob", 6.0)]);
        let old_id = m.reviews.0[0].id.clone();

        let action = apply_upsert(&mut m, "alice", 4.0, Some("rewatch".to_string()), Utc::now());

        assert_eq!(action, ReviewAction::Modification);
        assert_eq!(m.num_reviews, 2);
        // replaced entry goes to the end of the list
        assert_eq!(m.reviews.0[0].user, "bob");
        assert_eq!(m.reviews.0[1].user, "alice");
        assert_eq!(m.reviews.0[1].rating, 4.0);
        assert_eq!(m.rating, 5.0);
        // the removed entry's id is never reused
        assert_ne!(m.reviews.0[1].id, old_id);
    }

    #[test]
    fn repeated_upserts_keep_a_single_review_per_user() {
        let mut m = movie(Vec::new());
        apply_upsert(&mut m, "alice", 3.0, None, Utc::now());
        apply_upsert(&mut m, "alice", 9.0, None, Utc::now());

        let by_alice: Vec<_> = m.reviews.0.iter().filter(|r| r.user == "alice").collect();
        assert_eq!(by_alice.len(), 1);
        assert_eq!(by_alice[0].rating, 9.0);
        assert_eq!(m.num_reviews, 1);
        assert_eq!(m.rating, 9.0);
    }

    #[test]
    fn aggregate_is_the_mean_rounded_to_one_decimal() {
        assert_eq!(aggregate_rating(&[review("a", 7.0), review("b", 8.0)]), 7.5);
        assert_eq!(
            aggregate_rating(&[review("a", 1.0), review("b", 2.0), review("c", 2.0)]),
            1.7
        );
        assert_eq!(
            aggregate_rating(&[review("a", 8.0), review("b", 6.0), review("c", 4.0)]),
            6.0
        );
        assert_eq!(aggregate_rating(&[]), 0.0);
    }

    #[test]
    fn removing_the_only_review_zeroes_the_aggregates() {
        let mut m = movie(vec![review("alice", 8.0)]);
        remove_review_at(&mut m, 0);

        assert_eq!(m.num_reviews, 0);
        assert_eq!(m.rating, 0.0);
        assert!(m.reviews.0.is_empty());
    }

    #[test]
    fn a_supplied_review_id_must_match_exactly() {
        let reviews = vec![review("alice", 8.0)];
        // alice owns a review, but the id she sent matches nothing
        assert_eq!(find_review(&reviews, Some("nope"), "alice"), None);
        assert_eq!(find_review(&reviews, None, "alice"), Some(0));
        assert_eq!(
            find_review(&reviews, Some(reviews[0].id.as_str()), "someone-else"),
            Some(0)
        );
    }

    #[test]
    fn only_the_author_or_an_admin_may_remove_a_review() {
        let r = review("alice", 8.0);
        assert!(can_remove(&r, &claims("alice", false)));
        assert!(can_remove(&r, &claims("mallory", true)));
        assert!(!can_remove(&r, &claims("mallory", false)));
    }
}
