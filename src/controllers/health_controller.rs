// src/controllers/health_controller.rs
use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

#[get("/api/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "OK" }))
}
