// webhooks/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use giftline_core::{ContextData, PipelineResult};
use tracing::{error, info, instrument};

use super::{outcome_response, DeliveryHeaders};
use crate::errors::AppError;
use crate::pipelines::contexts::CartWebhookCtxData;
use crate::state::AppState;

#[instrument(
    name = "handler::cart_update_webhook",
    skip(app_state, req, body),
    fields(payload_bytes = body.len())
)]
pub async fn cart_update_webhook_handler(
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
    "Cart webhook received."
  );

  let ctx_data = ContextData::new(CartWebhookCtxData::new(
    app_state.get_ref().clone(),
    body,
    headers.signature,
  ));

  match app_state.registry.run(ctx_data.clone()).await {
    Ok(PipelineResult::Completed) | Ok(PipelineResult::Stopped) => {
      let outcome = ctx_data.read().outcome.clone();
      info!(outcome = ?outcome, "Cart webhook handled.");
      Ok(outcome_response(&outcome, "Hidden item added to cart", "cartId"))
    }
    Err(app_err) => {
      error!(error = %app_err, "Cart webhook pipeline failed.");
      Err(app_err)
    }
  }
}
