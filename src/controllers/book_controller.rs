// src/controllers/book_controller.rs
use actix_web::{delete, get, post, web, Error, HttpRequest, HttpResponse};
use serde_json::json;
use sqlx::types::Json;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::auth;
use crate::models::book::{Book, BookForm};
use crate::models::review::Review;
use crate::reviews;

#[get("/api/book")]
pub async fn get_books(pool: web::Data<MySqlPool>) -> Result<HttpResponse, Error> {
    let books: Vec<Book> = reviews::list_entities(pool.get_ref()).await.map_err(|e| {
        log::error!("failed to list books: {:?}", e);
        actix_web::error::ErrorInternalServerError("failed to load books")
    })?;

    let mut shaped = Vec::with_capacity(books.len());
    for book in &books {
        let value = reviews::populate_entity(pool.get_ref(), book)
            .await
            .map_err(|e| {
                log::error!("failed to shape book {}: {}", book.id, e);
                actix_web::error::ErrorInternalServerError("failed to load books")
            })?;
        shaped.push(value);
    }

    Ok(HttpResponse::Ok().json(shaped))
}

#[get("/api/book/{id}")]
pub async fn get_book(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();

    let book: Option<Book> = reviews::load_entity(pool.get_ref(), &id).await.map_err(|e| {
        log::error!("failed to load book {}: {:?}", id, e);
        actix_web::error::ErrorInternalServerError("Could not find book")
    })?;

    let book = match book {
        Some(b) => b,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({ "message": "book not found" })));
        }
    };

    let shaped = reviews::populate_entity(pool.get_ref(), &book)
        .await
        .map_err(|e| {
            log::error!("failed to shape book {}: {}", id, e);
            actix_web::error::ErrorInternalServerError("Could not find book")
        })?;

    Ok(HttpResponse::Ok().json(shaped))
}

/// Admin: add a book from Google Books / OpenLibrary lookups done by the client.
#[post("/api/book")]
pub async fn create_book(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    data: web::Json<BookForm>,
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
        "INSERT INTO books \
         (id, isbn, google_id, google_link, openlibrary_key, openlibrary_url, openlibrary_id, goodreads_id, amazon_id, \
          authors, title, subjects, description, text_snippet, page_count, published_date, google_image_url, \
          openlib_image_url, average_rating, ratings_count, rating, num_reviews, reviews) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?)",
    )
    .bind(&id)
    .bind(&data.isbn)
    .bind(&data.google_id)
    .bind(&data.google_link)
    .bind(&data.openlibrary_key)
    .bind(&data.openlibrary_url)
    .bind(&data.openlibrary_id)
    .bind(&data.goodreads_id)
    .bind(&data.amazon_id)
    .bind(Json(data.authors.clone().unwrap_or_default()) as Json<Vec<String>>)
    .bind(&data.title)
    .bind(Json(data.subjects.clone().unwrap_or_default()) as Json<Vec<String>>)
    .bind(&data.description)
    .bind(&data.text_snippet)
    .bind(data.page_count)
    .bind(&data.published_date)
    .bind(&data.google_image_url)
    .bind(&data.openlib_image_url)
    .bind(data.average_rating)
    .bind(data.ratings_count)
    .bind(Json(Vec::<Review>::new()))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        log::error!("failed to insert book: {:?}", e);
        actix_web::error::ErrorInternalServerError("failed to create book")
    })?;

    let book: Option<Book> = reviews::load_entity(pool.get_ref(), &id).await.map_err(|e| {
        log::error!("failed to reload book {}: {:?}", id, e);
        actix_web::error::ErrorInternalServerError("failed to create book")
    })?;

    match book {
        Some(b) => Ok(HttpResponse::Created().json(b)),
        None => Ok(HttpResponse::InternalServerError()
            .json(json!({ "message": "failed to create book" }))),
    }
}

/// Admin: remove a book. The embedded reviews go with the row.
#[delete("/api/book/{id}")]
pub async fn delete_book(
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
    match sqlx::query("DELETE FROM books WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) => {
            if result.rows_affected() > 0 {
                Ok(HttpResponse::Ok().json(json!({ "message": "Book deleted" })))
            } else {
                Ok(HttpResponse::NotFound().json(json!({ "message": "book not found" })))
            }
        }
        Err(e) => {
            log::error!("failed to delete book {}: {:?}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({ "message": "failed to delete book" })))
        }
    }
}
