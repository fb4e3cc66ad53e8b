// webhooks/src/services/commerce.rs

//! The commerce platform operations the flows depend on.
//!
//! Pipelines only see `dyn CommerceApi`; the production implementation is
//! `ShopifyGraphqlClient`, tests substitute a recording fake.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommerceError {
  /// Access token for the named API is not configured.
  #[error("missing {0} access token")]
  MissingCredential(&'static str),

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("unexpected HTTP status {status}: {body}")]
  Status { status: u16, body: String },

  #[error("GraphQL errors: {}", .0.join("; "))]
  GraphQl(Vec<String>),

  #[error("{operation} returned user errors: {}", .messages.join("; "))]
  UserErrors {
    operation: &'static str,
    messages: Vec<String>,
  },

  #[error("{operation} returned a malformed response: {detail}")]
  MalformedResponse { operation: &'static str, detail: String },
}

/// Remote operations on carts and order-edit sessions. All ids are global ids.
#[async_trait]
pub trait CommerceApi: Send + Sync {
  /// `cartLinesAdd`. Returns the raw response document.
  async fn add_cart_line(&self, cart_id: &str, variant_id: &str, quantity: u32) -> Result<Value, CommerceError>;

  /// `orderEditBegin`. Returns the calculated order id (the session).
  async fn begin_order_edit(&self, order_id: &str) -> Result<String, CommerceError>;

  /// `orderEditAddVariant` without duplicates. Returns the calculated line item id.
  async fn add_variant_to_edit(&self, session_id: &str, variant_id: &str, quantity: u32)
    -> Result<String, CommerceError>;

  /// `orderEditAddLineItemDiscount` as a percentage of the line price.
  async fn discount_edit_line(
    &self,
    session_id: &str,
    line_item_id: &str,
    percent: f64,
    description: &str,
  ) -> Result<(), CommerceError>;

  /// `orderEditSetQuantity`.
  async fn set_edit_line_quantity(&self, session_id: &str, line_item_id: &str, quantity: u32)
    -> Result<(), CommerceError>;

  /// `orderEditCommit`. Returns the committed order id.
  async fn commit_order_edit(&self, session_id: &str, notify_customer: bool, staff_note: &str)
    -> Result<String, CommerceError>;
}
