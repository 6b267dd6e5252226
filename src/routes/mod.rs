// Route exports
pub mod map;

use actix_web::web;

pub use map::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(map::configure),
    );
}
