// webhooks/src/pipelines/mod.rs

//! Defines and registers the webhook pipelines.

use crate::errors::AppError;
use crate::state::AppState;
use giftline_core::FlowRegistry;
use std::sync::Arc;

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod order_pipeline;

/// Registers every pipeline with `registry`. Called once at startup.
pub fn register_all_pipelines(registry: &Arc<FlowRegistry<AppError>>, app_state: &AppState) {
  tracing::info!("Registering pipelines...");

  cart_pipeline::register_cart_update_pipeline(registry, app_state);
  order_pipeline::register_order_update_pipeline(registry, app_state);

  tracing::info!("All webhook pipelines registered.");
}
