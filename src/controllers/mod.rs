pub mod book_controller;
pub mod health_controller;
pub mod movie_controller;
pub mod restaurant_controller;
pub mod review_controller;
