// webhooks/src/state.rs
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{ClaimStore, CommerceApi};
use giftline_core::FlowRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub registry: Arc<FlowRegistry<AppError>>,
  pub commerce: Arc<dyn CommerceApi>,
  pub claims: Arc<ClaimStore>,
}

impl AppState {
  /// State with an empty registry; pipelines are registered afterwards.
  pub fn new(config: Arc<AppConfig>, commerce: Arc<dyn CommerceApi>) -> Self {
    let claims = Arc::new(ClaimStore::new(config.idempotency_ttl));
    Self {
      config,
      registry: Arc::new(FlowRegistry::<AppError>::new()),
      commerce,
      claims,
    }
  }
}
