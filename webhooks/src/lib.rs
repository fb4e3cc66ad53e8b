// webhooks/src/lib.rs

//! Webhook receivers that add a bonus or hidden item to qualifying carts and
//! orders.

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::CommerceApi;
use crate::state::AppState;

/// Builds the shared state with every pipeline registered.
pub fn build_app_state(config: Arc<AppConfig>, commerce: Arc<dyn CommerceApi>) -> AppState {
  let app_state = AppState::new(config, commerce);
  pipelines::register_all_pipelines(&app_state.registry, &app_state);
  app_state
}
