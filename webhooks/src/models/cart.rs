// webhooks/src/models/cart.rs

use super::identifiers::to_global_id;
use super::line_item::{LineItem, RawIdentifier, RawLineItem};
use crate::errors::AppError;
use serde::Deserialize;

/// `carts/update` payload as received.
#[derive(Debug, Deserialize)]
pub struct RawCartPayload {
  #[serde(default)]
  pub id: Option<RawIdentifier>,
  #[serde(default)]
  pub token: Option<RawIdentifier>,
  #[serde(default, alias = "line_items")]
  pub items: Option<Vec<RawLineItem>>,
}

/// Validated cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
  /// Identifier from the payload (`id`, else `token`).
  pub id: String,
  pub items: Vec<LineItem>,
}

impl Cart {
  /// Parses and validates a raw webhook body.
  pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
    let raw: RawCartPayload =
      serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Invalid JSON payload: {}", e)))?;
    Cart::try_from(raw)
  }

  /// Storefront API cart id.
  pub fn global_id(&self) -> String {
    to_global_id("Cart", &self.id)
  }
}

impl TryFrom<RawCartPayload> for Cart {
  type Error = AppError;

  fn try_from(raw: RawCartPayload) -> Result<Self, Self::Error> {
    let id = raw
      .id
      .and_then(RawIdentifier::into_string)
      .or_else(|| raw.token.and_then(RawIdentifier::into_string))
      .ok_or_else(|| AppError::Validation("Missing cart identifier".to_string()))?;

    let items = raw.items.unwrap_or_default().into_iter().map(LineItem::from).collect();
    Ok(Cart { id, items })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_items_and_prefers_id_over_token() {
    let cart = Cart::from_slice(br#"{"id":"c1","token":"t1","items":[{"variant_id":"T1","quantity":1}]}"#).unwrap();
    assert_eq!(cart.id, "c1");
    assert_eq!(cart.items, vec![LineItem::variant("T1")]);
    assert_eq!(cart.global_id(), "gid://shopify/Cart/c1");
  }

  #[test]
  fn falls_back_to_token_and_line_items_alias() {
    let cart = Cart::from_slice(br#"{"token":"tok-9","line_items":[{"variant_id":5}]}"#).unwrap();
    assert_eq!(cart.id, "tok-9");
    assert_eq!(cart.items.len(), 1);
  }

  #[test]
  fn missing_items_yield_empty_cart() {
    let cart = Cart::from_slice(br#"{"id":"c2"}"#).unwrap();
    assert!(cart.items.is_empty());
  }

  #[test]
  fn missing_identifier_and_bad_json_are_validation_errors() {
    assert!(matches!(
      Cart::from_slice(br#"{"items":[]}"#),
      Err(AppError::Validation(ref m)) if m.contains("Missing cart identifier")
    ));
    assert!(matches!(Cart::from_slice(b"{not json"), Err(AppError::Validation(_))));
  }
}
