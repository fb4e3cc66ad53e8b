// webhooks/src/pipelines/common_steps.rs

//! Steps shared by the cart and order flows.
//!
//! Each is generic over the flow context through `WebhookDelivery` and is
//! registered directly as a step handler or abort hook.

use crate::errors::{AppError, Result as AppResult};
use crate::models::identifiers::to_global_id;
use crate::pipelines::contexts::{WebhookDelivery, WebhookOutcome};
use crate::services::{signature, triggers, ClaimStore};
use giftline_core::{ContextData, PipelineControl};
use tracing::{info, instrument, warn};

/// Configured target variant of the flow in global id form.
pub fn target_variant_gid<T: WebhookDelivery>(ctx: &T) -> Option<String> {
  ctx
    .flow_config()
    .target_variant_id
    .as_deref()
    .map(|id| to_global_id("ProductVariant", id))
}

#[instrument(name = "common_step::verify_webhook_signature", skip_all, fields(flow = T::FLOW), err(Display))]
pub async fn verify_webhook_signature_step<T: WebhookDelivery>(ctx_data: ContextData<T>) -> AppResult<PipelineControl> {
  let verified = {
    let guard = ctx_data.read();
    let config = &guard.app_state().config;
    signature::verify_webhook(
      guard.raw_body(),
      guard.signature(),
      config.webhook_secret.as_deref(),
      config.skip_webhook_verification,
    )
  };

  if !verified {
    warn!("Webhook signature verification failed.");
    return Err(AppError::Auth("Invalid webhook signature".to_string()));
  }
  Ok(PipelineControl::Continue)
}

/// Stops quietly when the flow has no target or nothing qualifies.
#[instrument(name = "common_step::detect_trigger", skip_all, fields(flow = T::FLOW))]
pub async fn detect_trigger_step<T: WebhookDelivery>(ctx_data: ContextData<T>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();

  if guard.flow_config().target_variant_id.is_none() {
    warn!("No target variant configured; acknowledging without action.");
    guard.set_outcome(WebhookOutcome::FlowDisabled);
    return Ok(PipelineControl::Stop);
  }

  let flow = guard.flow_config();
  let triggered = triggers::is_triggered(guard.line_items(), &flow.trigger_ids, flow.trigger_match);
  if !triggered {
    info!(line_items = guard.line_items().len(), "No trigger item found.");
    guard.set_outcome(WebhookOutcome::NotTriggered);
    return Ok(PipelineControl::Stop);
  }

  info!("Trigger item found.");
  Ok(PipelineControl::Continue)
}

#[instrument(name = "common_step::check_target_presence", skip_all, fields(flow = T::FLOW))]
pub async fn check_target_presence_step<T: WebhookDelivery>(ctx_data: ContextData<T>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let present = guard
    .flow_config()
    .target_variant_id
    .as_deref()
    .is_some_and(|target| triggers::contains_target(guard.line_items(), target));

  if present {
    info!("Target item already present.");
    guard.set_outcome(WebhookOutcome::AlreadyPresent);
    return Ok(PipelineControl::Stop);
  }
  Ok(PipelineControl::Continue)
}

#[instrument(name = "common_step::claim_delivery", skip_all, fields(flow = T::FLOW))]
pub async fn claim_delivery_step<T: WebhookDelivery>(ctx_data: ContextData<T>) -> AppResult<PipelineControl> {
  let mut guard = ctx_data.write();
  let (Some(entity_id), Some(target)) = (guard.entity_id(), guard.flow_config().target_variant_id.as_deref()) else {
    return Err(AppError::Internal("Delivery claimed before the payload was parsed".to_string()));
  };
  let key = ClaimStore::key(T::FLOW, entity_id, target);

  if !guard.app_state().claims.try_claim(&key) {
    info!(claim_key = %key, "Delivery already claimed; skipping.");
    guard.set_outcome(WebhookOutcome::AlreadyClaimed);
    return Ok(PipelineControl::Stop);
  }

  guard.set_claim_key(Some(key));
  Ok(PipelineControl::Continue)
}

/// Abort hook: drops this delivery's claim so a redelivery can retry.
pub async fn release_claim_on_abort<T: WebhookDelivery>(ctx_data: ContextData<T>, failed_step: String) {
  let mut guard = ctx_data.write();
  if let Some(key) = guard.claim_key().map(String::from) {
    guard.app_state().claims.release(&key);
    guard.set_claim_key(None);
    warn!(flow = T::FLOW, failed_step = %failed_step, claim_key = %key, "Delivery claim released after failure.");
  }
}
