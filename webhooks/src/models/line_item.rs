// webhooks/src/models/line_item.rs

use serde::Deserialize;

/// An identifier as it arrives in a webhook: JSON string or number.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawIdentifier {
  Text(String),
  Number(serde_json::Number),
}

impl RawIdentifier {
  /// String form; blank strings count as absent.
  pub fn into_string(self) -> Option<String> {
    match self {
      RawIdentifier::Text(s) => {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
      }
      RawIdentifier::Number(n) => Some(n.to_string()),
    }
  }
}

/// Line item exactly as the payload carries it. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLineItem {
  #[serde(default)]
  pub variant_id: Option<RawIdentifier>,
  #[serde(default)]
  pub product_id: Option<RawIdentifier>,
  #[serde(default)]
  pub quantity: Option<serde_json::Number>,
}

/// Validated line item with string identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
  pub variant_id: Option<String>,
  pub product_id: Option<String>,
  pub quantity: u64,
}

impl From<RawLineItem> for LineItem {
  fn from(raw: RawLineItem) -> Self {
    LineItem {
      variant_id: raw.variant_id.and_then(RawIdentifier::into_string),
      product_id: raw.product_id.and_then(RawIdentifier::into_string),
      // Missing or non-integral quantities read as one unit.
      quantity: raw.quantity.and_then(|q| q.as_u64()).unwrap_or(1),
    }
  }
}

impl LineItem {
  pub fn variant(variant_id: &str) -> Self {
    LineItem {
      variant_id: Some(variant_id.to_string()),
      product_id: None,
      quantity: 1,
    }
  }

  pub fn with_product(mut self, product_id: &str) -> Self {
    self.product_id = Some(product_id.to_string());
    self
  }
}
