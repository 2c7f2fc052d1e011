// main.rs
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

mod auth;
mod controllers;
mod db;
mod models;
mod reviews;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");

    let pool = match db::establish_connection().await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("failed to initialize database pool: {:?}", e);
            std::process::exit(1);
        }
    };

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let cors_origin =
        std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());
    log::info!("listening on {}", bind_addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .service(controllers::health_controller::health)
            // reviews
            .service(controllers::review_controller::post_review)
            .service(controllers::review_controller::delete_review)
            // movies
            .service(controllers::movie_controller::get_movies)
            .service(controllers::movie_controller::get_movie)
            .service(controllers::movie_controller::create_movie)
            .service(controllers::movie_controller::delete_movie)
            // restaurants
            .service(controllers::restaurant_controller::get_restaurants)
            .service(controllers::restaurant_controller::get_restaurant)
            .service(controllers::restaurant_controller::create_restaurant)
            .service(controllers::restaurant_controller::delete_restaurant)
            // books
            .service(controllers::book_controller::get_books)
            .service(controllers::book_controller::get_book)
            .service(controllers::book_controller::create_book)
            .service(controllers::book_controller::delete_book)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
