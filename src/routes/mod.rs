// Route exports
pub mod survey;

use actix_web::web;

pub use survey::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(survey::index))
        .route("/health", web::get().to(survey::health_check))
        .service(web::scope("/api/health").configure(survey::configure));
}
