// webhooks/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use giftline_core::{ContextData, PipelineResult};
use tracing::{error, info, instrument};

use super::{outcome_response, DeliveryHeaders};
use crate::errors::AppError;
use crate::pipelines::contexts::OrderWebhookCtxData;
use crate::state::AppState;

#[instrument(
    name = "handler::order_update_webhook",
    skip(app_state, req, body),
    fields(payload_bytes = body.len())
)]
pub async fn order_update_webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let headers = DeliveryHeaders::from_request(&req);
  info!(
    topic = ?headers.topic,
    webhook_id = ?headers.webhook_id,
    shop_domain = ?headers.shop_domain,
    signed = headers.signature.is_some(),
    "Order webhook received."
  );

  let ctx_data = ContextData::new(OrderWebhookCtxData::new(
    app_state.get_ref().clone(),
    body,
    headers.signature,
  ));

  let result = app_state.registry.run(ctx_data.clone()).await;
  let (outcome, edit_state) = {
    let guard = ctx_data.read();
    (guard.outcome.clone(), guard.edit.label())
  };

  match result {
    Ok(PipelineResult::Completed) | Ok(PipelineResult::Stopped) => {
      info!(outcome = ?outcome, edit_state, "Order webhook handled.");
      Ok(outcome_response(&outcome, "Bonus item added to order", "orderId"))
    }
    Err(app_err) => {
      error!(error = %app_err, edit_state, "Order webhook pipeline failed.");
      Err(app_err)
    }
  }
}
