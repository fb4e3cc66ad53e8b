// webhooks/src/pipelines/cart_pipeline.rs

use crate::errors::AppError;
use crate::models::Cart;
use crate::pipelines::common_steps::{self, target_variant_gid};
use crate::pipelines::contexts::{CartWebhookCtxData, WebhookOutcome};
use crate::state::AppState;
use giftline_core::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use std::sync::Arc;
use tracing::{error, info};

pub fn register_cart_update_pipeline(registry: &Arc<FlowRegistry<AppError>>, _app_state: &AppState) {
  let mut p = Pipeline::<CartWebhookCtxData, AppError>::new(&[
    ("verify_webhook_signature", false, None),
    ("parse_cart_payload", false, None),
    ("detect_trigger", false, None),
    ("check_target_presence", false, None),
    ("claim_delivery", false, None),
    ("add_cart_line", false, None),
  ]);

  p.on_root("verify_webhook_signature", common_steps::verify_webhook_signature_step::<CartWebhookCtxData>);

  p.on_root("parse_cart_payload", |ctx_data: ContextData<CartWebhookCtxData>| {
    Box::pin(async move {
      let cart = {
        let guard = ctx_data.read();
        Cart::from_slice(&guard.raw_body)?
      };
      info!(
        cart_id = %cart.id,
        line_items = cart.items.len(),
        "Cart Pipeline: Payload parsed."
      );
      ctx_data.write().cart = Some(cart);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("detect_trigger", common_steps::detect_trigger_step::<CartWebhookCtxData>);
  p.on_root("check_target_presence", common_steps::check_target_presence_step::<CartWebhookCtxData>);
  p.on_root("claim_delivery", common_steps::claim_delivery_step::<CartWebhookCtxData>);

  // The only side effect of the flow: one cartLinesAdd call.
  p.on_root("add_cart_line", |ctx_data: ContextData<CartWebhookCtxData>| {
    Box::pin(async move {
      let (cart_id, cart_gid, variant_gid, commerce) = {
        let guard = ctx_data.read();
        let cart = guard
          .cart
          .as_ref()
          .ok_or_else(|| AppError::Internal("Cart missing from context".to_string()))?;
        let variant_gid = target_variant_gid(&*guard)
          .ok_or_else(|| AppError::Internal("Cart target variant missing".to_string()))?;
        (cart.id.clone(), cart.global_id(), variant_gid, guard.app_state.commerce.clone())
      }; // guard dropped

      info!(cart_id = %cart_id, variant_id = %variant_gid, "Cart Pipeline: Adding target line.");
      match commerce.add_cart_line(&cart_gid, &variant_gid, 1).await {
        Ok(response) => {
          let mut guard = ctx_data.write();
          guard.mutation_response = Some(response);
          guard.outcome = WebhookOutcome::ItemAdded { entity_id: cart_id };
          Ok(PipelineControl::Continue)
        }
        Err(e) => {
          error!(cart_id = %cart_id, error = %e, "Cart Pipeline: cartLinesAdd failed.");
          Err(AppError::Commerce(e))
        }
      }
    })
  });

  p.on_abort(common_steps::release_claim_on_abort::<CartWebhookCtxData>);

  registry.register_pipeline(p);
  info!("Cart update pipeline registered.");
}
