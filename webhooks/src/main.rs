// webhooks/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use giftline_webhooks::config::AppConfig;
use giftline_webhooks::services::ShopifyGraphqlClient;
use giftline_webhooks::{build_app_state, web};
use std::io;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

#[actix_web::main]
async fn main() -> io::Result<()> {
  // RUST_LOG overrides the default level.
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting webhook server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(io::Error::new(io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  if app_config.skip_webhook_verification {
    tracing::warn!("SKIP_WEBHOOK_VERIFICATION is set: webhook signatures are NOT checked. Never run this in production.");
  }
  if app_config.cart.target_variant_id.is_none() {
    tracing::warn!("HIDDEN_VARIANT_ID is not set; the cart flow will acknowledge webhooks without acting.");
  }
  if app_config.order.target_variant_id.is_none() {
    tracing::warn!("BONUS_VARIANT_ID is not set; the order flow will acknowledge webhooks without acting.");
  }

  let commerce = match ShopifyGraphqlClient::from_config(&app_config) {
    Ok(client) => Arc::new(client),
    Err(e) => {
      tracing::error!(error = %e, "Failed to build the commerce API client.");
      return Err(io::Error::new(io::ErrorKind::Other, e.to_string()));
    }
  };

  let app_state = build_app_state(app_config.clone(), commerce);
  tracing::info!(
    cart_steps = ?app_state.registry.step_names::<giftline_webhooks::pipelines::contexts::CartWebhookCtxData>(),
    order_steps = ?app_state.registry.step_names::<giftline_webhooks::pipelines::contexts::OrderWebhookCtxData>(),
    "Pipelines registered."
  );

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Binding server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
