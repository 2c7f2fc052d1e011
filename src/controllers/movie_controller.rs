// src/controllers/movie_controller.rs
use actix_web::{delete, get, post, web, Error, HttpRequest, HttpResponse};
use serde_json::json;
use sqlx::types::Json;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::auth;
use crate::models::movie::{Movie, MovieForm};
use crate::models::review::Review;
use crate::reviews;

#[get("/api/movie")]
pub async fn get_movies(pool: web::Data<MySqlPool>) -> Result<HttpResponse, Error> {
    let movies: Vec<Movie> = reviews::list_entities(pool.get_ref()).await.map_err(|e| {
        log::error!("failed to list movies: {:?}", e);
        actix_web::error::ErrorInternalServerError("failed to load movies")
    })?;

    let mut shaped = Vec::with_capacity(movies.len());
    for movie in &movies {
        let value = reviews::populate_entity(pool.get_ref(), movie)
            .await
            .map_err(|e| {
                log::error!("failed to shape movie {}: {}", movie.id, e);
                actix_web::error::ErrorInternalServerError("failed to load movies")
            })?;
        shaped.push(value);
    }

    Ok(HttpResponse::Ok().json(shaped))
}

#[get("/api/movie/{id}")]
pub async fn get_movie(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();

    let movie: Option<Movie> = reviews::load_entity(pool.get_ref(), &id).await.map_err(|e| {
        log::error!("failed to load movie {}: {:?}", id, e);
        actix_web::error::ErrorInternalServerError("Could not find movie")
    })?;

    let movie = match movie {
        Some(m) => m,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({ "message": "movie not found" })));
        }
    };

    let shaped = reviews::populate_entity(pool.get_ref(), &movie)
        .await
        .map_err(|e| {
            log::error!("failed to shape movie {}: {}", id, e);
            actix_web::error::ErrorInternalServerError("Could not find movie")
        })?;

    Ok(HttpResponse::Ok().json(shaped))
}

/// Admin: add a movie from a TMDB catalog lookup done by the client.
#[post("/api/movie")]
pub async fn create_movie(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    data: web::Json<MovieForm>,
) -> Result<HttpResponse, Error> {
    let claims =
        auth::verify_jwt(&req).map_err(|e| actix_web::error::ErrorUnauthorized(e.to_string()))?;
    if !claims.is_admin {
        return Err(actix_web::error::ErrorForbidden(
            "Only administrators may curate the catalog",
        ));
    }

    let data = data.into_inner();
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO movies \
         (id, name, tmdb_id, overview, tagline, poster_url, backdrop_url, release_date, genres, rating, num_reviews, reviews) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(&data.tmdb_id)
    .bind(&data.overview)
    .bind(&data.tagline)
    .bind(&data.poster_url)
    .bind(&data.backdrop_url)
    .bind(&data.release_date)
    .bind(Json(data.genres.clone().unwrap_or_default()) as Json<Vec<String>>)
    .bind(Json(Vec::<Review>::new()))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        log::error!("failed to insert movie: {:?}", e);
        actix_web::error::ErrorInternalServerError("failed to create movie")
    })?;

    let movie: Option<Movie> = reviews::load_entity(pool.get_ref(), &id).await.map_err(|e| {
        log::error!("failed to reload movie {}: {:?}", id, e);
        actix_web::error::ErrorInternalServerError("failed to create movie")
    })?;

    match movie {
        Some(m) => Ok(HttpResponse::Created().json(m)),
        None => Ok(HttpResponse::InternalServerError()
            .json(json!({ "message": "failed to create movie" }))),
    }
}

/// Admin: remove a movie. The embedded reviews go with the row.
#[delete("/api/movie/{id}")]
pub async fn delete_movie(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let claims =
        auth::verify_jwt(&req).map_err(|e| actix_web::error::ErrorUnauthorized(e.to_string()))?;
    if !claims.is_admin {
        return Err(actix_web::error::ErrorForbidden(
            "Only administrators may curate the catalog",
        ));
    }

    let id = path.into_inner();
    match sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) => {
            if result.rows_affected() > 0 {
                Ok(HttpResponse::Ok().json(json!({ "message": "Movie deleted" })))
            } else {
                Ok(HttpResponse::NotFound().json(json!({ "message": "movie not found" })))
            }
        }
        Err(e) => {
            log::error!("failed to delete movie {}: {:?}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({ "message": "failed to delete movie" })))
        }
    }
}
