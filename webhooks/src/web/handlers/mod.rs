// webhooks/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod order_handlers;

use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

use crate::pipelines::contexts::WebhookOutcome;
use crate::services::signature::SIGNATURE_HEADER;

/// Platform headers that come with every delivery.
#[derive(Debug, Default)]
pub struct DeliveryHeaders {
  pub signature: Option<String>,
  pub topic: Option<String>,
  pub webhook_id: Option<String>,
  pub shop_domain: Option<String>,
}

impl DeliveryHeaders {
  pub fn from_request(req: &HttpRequest) -> Self {
    let header = |name: &str| {
      req
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(String::from)
    };
    Self {
      signature: header(SIGNATURE_HEADER),
      topic: header("X-Shopify-Topic"),
      webhook_id: header("X-Shopify-Webhook-Id"),
      shop_domain: header("X-Shopify-Shop-Domain"),
    }
  }
}

/// 200 response for a delivery that finished without error.
///
/// `entity_field` names the id field ("cartId" / "orderId") added when an
/// item was actually added.
pub fn outcome_response(outcome: &WebhookOutcome, added_message: &str, entity_field: &str) -> HttpResponse {
  match outcome {
    WebhookOutcome::ItemAdded { entity_id } => HttpResponse::Ok().json(json!({
      "success": true,
      "message": added_message,
      entity_field: entity_id,
    })),
    _ => HttpResponse::Ok().json(json!({ "success": true, "message": "Webhook received" })),
  }
}
