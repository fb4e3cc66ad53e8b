// webhooks/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, order_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Mounts the health check and both webhook receivers.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/health", web::get().to(health_check_handler)).service(
    web::scope("/webhooks")
      .route("/cart-update", web::post().to(cart_handlers::cart_update_webhook_handler))
      .route("/order-update", web::post().to(order_handlers::order_update_webhook_handler)),
  );
}
