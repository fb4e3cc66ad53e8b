// webhooks/src/models/order.rs

use super::identifiers::to_global_id;
use super::line_item::{LineItem, RawIdentifier, RawLineItem};
use crate::errors::AppError;
use serde::Deserialize;

/// `orders/*` payload as received.
#[derive(Debug, Deserialize)]
pub struct RawOrderPayload {
  #[serde(default)]
  pub id: Option<RawIdentifier>,
  #[serde(default)]
  pub admin_graphql_api_id: Option<String>,
  #[serde(default)]
  pub order_number: Option<RawIdentifier>,
  #[serde(default)]
  pub line_items: Option<Vec<RawLineItem>>,
}

/// Validated order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
  /// Admin API global id.
  pub global_id: String,
  pub order_number: Option<String>,
  pub line_items: Vec<LineItem>,
}

impl Order {
  pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
    let raw: RawOrderPayload =
      serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Invalid JSON payload: {}", e)))?;
    Order::try_from(raw)
  }
}

impl TryFrom<RawOrderPayload> for Order {
  type Error = AppError;

  fn try_from(raw: RawOrderPayload) -> Result<Self, Self::Error> {
    let from_api_id = raw
      .admin_graphql_api_id
      .map(|gid| gid.trim().to_string())
      .filter(|gid| !gid.is_empty());
    let global_id = match from_api_id {
      Some(gid) => gid,
      None => raw
        .id
        .and_then(RawIdentifier::into_string)
        .map(|id| to_global_id("Order", &id))
        .ok_or_else(|| AppError::Validation("Missing order identifier".to_string()))?,
    };

    Ok(Order {
      global_id,
      order_number: raw.order_number.and_then(RawIdentifier::into_string),
      line_items: raw
        .line_items
        .unwrap_or_default()
        .into_iter()
        .map(LineItem::from)
        .collect(),
    })
  }
}
