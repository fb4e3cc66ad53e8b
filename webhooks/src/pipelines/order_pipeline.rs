// webhooks/src/pipelines/order_pipeline.rs

//! Order flow: adds the bonus variant through an order-edit session.
//!
//! The edit is only durable once `commit_order_edit` succeeds. Any earlier
//! failure runs the abort hooks: the staged bonus line is zeroed out and the
//! delivery claim is released so the platform's redelivery can retry.

use crate::config::FreeItemPolicy;
use crate::errors::AppError;
use crate::models::Order;
use crate::pipelines::common_steps::{self, target_variant_gid};
use crate::pipelines::contexts::{OrderWebhookCtxData, WebhookOutcome};
use crate::services::CommerceApi;
use crate::state::AppState;
use giftline_core::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use std::sync::Arc;
use tracing::{error, info, warn};

const BONUS_DISCOUNT_PERCENT: f64 = 100.0;
const BONUS_DISCOUNT_DESCRIPTION: &str = "Complimentary bonus item";

/// Open session id, staged line (if any) and the API handle, read under one lock.
fn edit_inputs(
  ctx_data: &ContextData<OrderWebhookCtxData>,
) -> Result<(String, Option<String>, Arc<dyn CommerceApi>), AppError> {
  let guard = ctx_data.read();
  let session_id = guard
    .edit
    .session_id()
    .map(String::from)
    .ok_or_else(|| AppError::Internal(format!("No open order edit session (state '{}')", guard.edit.label())))?;
  Ok((
    session_id,
    guard.edit.staged_line().map(String::from),
    guard.app_state.commerce.clone(),
  ))
}

fn commerce_failure(step: &str, e: crate::services::CommerceError) -> AppError {
  error!(step, error = %e, "Order Pipeline: remote call failed.");
  AppError::Commerce(e)
}

pub fn register_order_update_pipeline(registry: &Arc<FlowRegistry<AppError>>, _app_state: &AppState) {
  let skip_discount: SkipCondition<OrderWebhookCtxData> = Arc::new(|ctx_data: ContextData<OrderWebhookCtxData>| {
    ctx_data.read().app_state.config.free_item_policy == FreeItemPolicy::None
  });

  let mut p = Pipeline::<OrderWebhookCtxData, AppError>::new(&[
    ("verify_webhook_signature", false, None),
    ("parse_order_payload", false, None),
    ("detect_trigger", false, None),
    ("check_target_presence", false, None),
    ("claim_delivery", false, None),
    ("begin_order_edit", false, None),
    ("add_bonus_variant", false, None),
    ("discount_bonus_line", false, Some(skip_discount)),
    ("commit_order_edit", false, None),
  ]);

  p.on_root("verify_webhook_signature", common_steps::verify_webhook_signature_step::<OrderWebhookCtxData>);

  p.on_root("parse_order_payload", |ctx_data: ContextData<OrderWebhookCtxData>| {
    Box::pin(async move {
      let order = {
        let guard = ctx_data.read();
        Order::from_slice(&guard.raw_body)?
      };
      info!(
        order_id = %order.global_id,
        order_number = ?order.order_number,
        line_items = order.line_items.len(),
        "Order Pipeline: Payload parsed."
      );
      ctx_data.write().order = Some(order);
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("detect_trigger", common_steps::detect_trigger_step::<OrderWebhookCtxData>);
  p.on_root("check_target_presence", common_steps::check_target_presence_step::<OrderWebhookCtxData>);
  p.on_root("claim_delivery", common_steps::claim_delivery_step::<OrderWebhookCtxData>);

  p.on_root("begin_order_edit", |ctx_data: ContextData<OrderWebhookCtxData>| {
    Box::pin(async move {
      let (order_gid, commerce) = {
        let guard = ctx_data.read();
        let order = guard
          .order
          .as_ref()
          .ok_or_else(|| AppError::Internal("Order missing from context".to_string()))?;
        (order.global_id.clone(), guard.app_state.commerce.clone())
      };

      let session_id = commerce
        .begin_order_edit(&order_gid)
        .await
        .map_err(|e| commerce_failure("begin_order_edit", e))?;
      info!(order_id = %order_gid, session_id = %session_id, "Order Pipeline: Edit session opened.");
      ctx_data.write().edit.begin(session_id)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("add_bonus_variant", |ctx_data: ContextData<OrderWebhookCtxData>| {
    Box::pin(async move {
      let (session_id, _, commerce) = edit_inputs(&ctx_data)?;
      let variant_gid = target_variant_gid(&*ctx_data.read())
        .ok_or_else(|| AppError::Internal("Order target variant missing".to_string()))?;

      let line_item_id = commerce
        .add_variant_to_edit(&session_id, &variant_gid, 1)
        .await
        .map_err(|e| commerce_failure("add_bonus_variant", e))?;
      info!(variant_id = %variant_gid, line_item_id = %line_item_id, "Order Pipeline: Bonus variant staged.");
      ctx_data.write().edit.stage(line_item_id)?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("discount_bonus_line", |ctx_data: ContextData<OrderWebhookCtxData>| {
    Box::pin(async move {
      let (session_id, staged_line, commerce) = edit_inputs(&ctx_data)?;
      let line_item_id =
        staged_line.ok_or_else(|| AppError::Internal("No staged bonus line to discount".to_string()))?;

      commerce
        .discount_edit_line(&session_id, &line_item_id, BONUS_DISCOUNT_PERCENT, BONUS_DISCOUNT_DESCRIPTION)
        .await
        .map_err(|e| commerce_failure("discount_bonus_line", e))?;
      info!(line_item_id = %line_item_id, "Order Pipeline: Bonus line discounted.");
      ctx_data.write().edit.discount()?;
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  p.on_root("commit_order_edit", |ctx_data: ContextData<OrderWebhookCtxData>| {
    Box::pin(async move {
      let (session_id, _, commerce) = edit_inputs(&ctx_data)?;
      let staff_note = ctx_data.read().app_state.config.staff_note.clone();

      let order_id = commerce
        .commit_order_edit(&session_id, false, &staff_note)
        .await
        .map_err(|e| commerce_failure("commit_order_edit", e))?;
      info!(order_id = %order_id, "Order Pipeline: Edit committed.");

      let mut guard = ctx_data.write();
      guard.edit.commit(order_id)?;
      let entity_id = guard.order.as_ref().map(|o| o.global_id.clone()).unwrap_or_default();
      guard.outcome = WebhookOutcome::ItemAdded { entity_id };
      Ok::<_, AppError>(PipelineControl::Continue)
    })
  });

  // Zero out the staged line so the abandoned session carries no addition.
  p.on_abort(|ctx_data: ContextData<OrderWebhookCtxData>, failed_step: String| async move {
    let (session_id, staged_line, commerce) = {
      let guard = ctx_data.read();
      (
        guard.edit.session_id().map(String::from),
        guard.edit.staged_line().map(String::from),
        guard.app_state.commerce.clone(),
      )
    };

    match (session_id, staged_line) {
      (Some(session_id), Some(line_item_id)) => {
        match commerce.set_edit_line_quantity(&session_id, &line_item_id, 0).await {
          Ok(()) => info!(failed_step = %failed_step, line_item_id = %line_item_id, "Order Pipeline: Staged bonus line removed."),
          Err(e) => warn!(
            failed_step = %failed_step,
            line_item_id = %line_item_id,
            error = %e,
            "Order Pipeline: Best-effort cleanup of staged line failed."
          ),
        }
      }
      (Some(session_id), None) => {
        info!(failed_step = %failed_step, session_id = %session_id, "Order Pipeline: Edit session abandoned uncommitted.")
      }
      _ => {}
    }

    ctx_data.write().edit.abort(&failed_step);
  });

  p.on_abort(common_steps::release_claim_on_abort::<OrderWebhookCtxData>);

  registry.register_pipeline(p);
  info!("Order update pipeline registered.");
}
