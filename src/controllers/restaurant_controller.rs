// src/controllers/restaurant_controller.rs
use actix_web::{delete, get, post, web, Error, HttpRequest, HttpResponse};
use serde_json::json;
use sqlx::types::Json;
use sqlx::MySqlPool;
use uuid::Uuid;

use crate::auth;
use crate::models::restaurant::{Category, Restaurant, RestaurantForm};
use crate::models::review::Review;
use crate::reviews;

#[get("/api/restaurant")]
pub async fn get_restaurants(pool: web::Data<MySqlPool>) -> Result<HttpResponse, Error> {
    let restaurants: Vec<Restaurant> =
        reviews::list_entities(pool.get_ref()).await.map_err(|e| {
            log::error!("failed to list restaurants: {:?}", e);
            actix_web::error::ErrorInternalServerError("failed to load restaurants")
        })?;

    let mut shaped = Vec::with_capacity(restaurants.len());
    for restaurant in &restaurants {
        let value = reviews::populate_entity(pool.get_ref(), restaurant)
            .await
            .map_err(|e| {
                log::error!("failed to shape restaurant {}: {}", restaurant.id, e);
                actix_web::error::ErrorInternalServerError("failed to load restaurants")
            })?;
        shaped.push(value);
    }

    Ok(HttpResponse::Ok().json(shaped))
}

#[get("/api/restaurant/{id}")]
pub async fn get_restaurant(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = path.into_inner();

    let restaurant: Option<Restaurant> =
        reviews::load_entity(pool.get_ref(), &id).await.map_err(|e| {
            log::error!("failed to load restaurant {}: {:?}", id, e);
            actix_web::error::ErrorInternalServerError("Could not find restaurant")
        })?;

    let restaurant = match restaurant {
        Some(r) => r,
        None => {
            return Ok(
                HttpResponse::NotFound().json(json!({ "message": "restaurant not found" }))
            );
        }
    };

    let shaped = reviews::populate_entity(pool.get_ref(), &restaurant)
        .await
        .map_err(|e| {
            log::error!("failed to shape restaurant {}: {}", id, e);
            actix_web::error::ErrorInternalServerError("Could not find restaurant")
        })?;

    Ok(HttpResponse::Ok().json(shaped))
}

/// Admin: add a restaurant from a Yelp business lookup done by the client.
#[post("/api/restaurant")]
pub async fn create_restaurant(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    data: web::Json<RestaurantForm>,
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
        "INSERT INTO restaurants \
         (id, yelp_id, name, image_url, url, price, phone, address, categories, yelp_rating, review_count, rating, num_reviews, reviews) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 0, ?)",
    )
    .bind(&id)
    .bind(&data.yelp_id)
    .bind(&data.name)
    .bind(&data.image_url)
    .bind(&data.url)
    .bind(&data.price)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(Json(data.categories.clone().unwrap_or_default()) as Json<Vec<Category>>)
    .bind(data.yelp_rating)
    .bind(data.review_count)
    .bind(Json(Vec::<Review>::new()))
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        log::error!("failed to insert restaurant: {:?}", e);
        actix_web::error::ErrorInternalServerError("failed to create restaurant")
    })?;

    let restaurant: Option<Restaurant> =
        reviews::load_entity(pool.get_ref(), &id).await.map_err(|e| {
            log::error!("failed to reload restaurant {}: {:?}", id, e);
            actix_web::error::ErrorInternalServerError("failed to create restaurant")
        })?;

    match restaurant {
        Some(r) => Ok(HttpResponse::Created().json(r)),
        None => Ok(HttpResponse::InternalServerError()
            .json(json!({ "message": "failed to create restaurant" }))),
    }
}

/// Admin: remove a restaurant. The embedded reviews go with the row.
#[delete("/api/restaurant/{id}")]
pub async fn delete_restaurant(
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
    match sqlx::query("DELETE FROM restaurants WHERE id = ?")
        .bind(&id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) => {
            if result.rows_affected() > 0 {
                Ok(HttpResponse::Ok().json(json!({ "message": "Restaurant deleted" })))
            } else {
                Ok(HttpResponse::NotFound().json(json!({ "message": "restaurant not found" })))
            }
        }
        Err(e) => {
            log::error!("failed to delete restaurant {}: {:?}", id, e);
            Ok(HttpResponse::InternalServerError()
                .json(json!({ "message": "failed to delete restaurant" })))
        }
    }
}
