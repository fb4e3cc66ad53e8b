// webhooks/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use giftline_webhooks::config::AppConfig;
use giftline_webhooks::services::signature::{sign, SIGNATURE_HEADER};
use giftline_webhooks::services::{CommerceApi, CommerceError};
use giftline_webhooks::state::AppState;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::Level;

pub const SECRET: &str = "test-webhook-secret";
pub const SESSION_ID: &str = "gid://shopify/CalculatedOrder/777";
pub const LINE_ITEM_ID: &str = "gid://shopify/CalculatedLineItem/888";
pub const COMMITTED_ORDER_ID: &str = "gid://shopify/Order/1001";

/// One call made against the fake commerce API.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
  AddCartLine {
    cart_id: String,
    variant_id: String,
    quantity: u32,
  },
  BeginOrderEdit {
    order_id: String,
  },
  AddVariant {
    session_id: String,
    variant_id: String,
    quantity: u32,
  },
  Discount {
    session_id: String,
    line_item_id: String,
    percent: f64,
  },
  SetQuantity {
    session_id: String,
    line_item_id: String,
    quantity: u32,
  },
  Commit {
    session_id: String,
    notify_customer: bool,
    staff_note: String,
  },
}

impl Call {
  pub fn operation(&self) -> &'static str {
    match self {
      Call::AddCartLine { .. } => "cartLinesAdd",
      Call::BeginOrderEdit { .. } => "orderEditBegin",
      Call::AddVariant { .. } => "orderEditAddVariant",
      Call::Discount { .. } => "orderEditAddLineItemDiscount",
      Call::SetQuantity { .. } => "orderEditSetQuantity",
      Call::Commit { .. } => "orderEditCommit",
    }
  }
}

/// In-memory `CommerceApi` that records calls and fails on request.
#[derive(Default)]
pub struct FakeCommerce {
  calls: Mutex<Vec<Call>>,
  failing: Mutex<HashSet<&'static str>>,
}

impl FakeCommerce {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// Makes `operation` answer with a user error until cleared.
  pub fn fail_on(&self, operation: &'static str) {
    self.failing.lock().insert(operation);
  }

  pub fn clear_failures(&self) {
    self.failing.lock().clear();
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().clone()
  }

  pub fn operations(&self) -> Vec<&'static str> {
    self.calls.lock().iter().map(Call::operation).collect()
  }

  fn record(&self, call: Call) -> Result<(), CommerceError> {
    let operation = call.operation();
    self.calls.lock().push(call);
    if self.failing.lock().contains(operation) {
      return Err(CommerceError::UserErrors {
        operation,
        messages: vec![format!("{} rejected by test", operation)],
      });
    }
    Ok(())
  }
}

#[async_trait]
impl CommerceApi for FakeCommerce {
  async fn add_cart_line(&self, cart_id: &str, variant_id: &str, quantity: u32) -> Result<Value, CommerceError> {
    self.record(Call::AddCartLine {
      cart_id: cart_id.to_string(),
      variant_id: variant_id.to_string(),
      quantity,
    })?;
    Ok(json!({ "data": { "cartLinesAdd": { "cart": { "id": cart_id }, "userErrors": [] } } }))
  }

  async fn begin_order_edit(&self, order_id: &str) -> Result<String, CommerceError> {
    self.record(Call::BeginOrderEdit {
      order_id: order_id.to_string(),
    })?;
    Ok(SESSION_ID.to_string())
  }

  async fn add_variant_to_edit(&self, session_id: &str, variant_id: &str, quantity: u32) -> Result<String, CommerceError> {
    self.record(Call::AddVariant {
      session_id: session_id.to_string(),
      variant_id: variant_id.to_string(),
      quantity,
    })?;
    Ok(LINE_ITEM_ID.to_string())
  }

  async fn discount_edit_line(
    &self,
    session_id: &str,
    line_item_id: &str,
    percent: f64,
    _description: &str,
  ) -> Result<(), CommerceError> {
    self.record(Call::Discount {
      session_id: session_id.to_string(),
      line_item_id: line_item_id.to_string(),
      percent,
    })
  }

  async fn set_edit_line_quantity(&self, session_id: &str, line_item_id: &str, quantity: u32) -> Result<(), CommerceError> {
    self.record(Call::SetQuantity {
      session_id: session_id.to_string(),
      line_item_id: line_item_id.to_string(),
      quantity,
    })
  }

  async fn commit_order_edit(&self, session_id: &str, notify_customer: bool, staff_note: &str) -> Result<String, CommerceError> {
    self.record(Call::Commit {
      session_id: session_id.to_string(),
      notify_customer,
      staff_note: staff_note.to_string(),
    })?;
    Ok(COMMITTED_ORDER_ID.to_string())
  }
}

/// Config used by the webhook tests; `overrides` win, an empty value unsets.
pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
  let mut env: HashMap<String, String> = [
    ("SHOPIFY_STORE_DOMAIN", "test-shop.myshopify.com"),
    ("SHOPIFY_WEBHOOK_SECRET", SECRET),
    ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", "storefront-token"),
    ("SHOPIFY_ADMIN_ACCESS_TOKEN", "admin-token"),
    ("HIDDEN_VARIANT_ID", "H1"),
    ("CART_TRIGGER_IDS", "T1"),
    ("BONUS_VARIANT_ID", "B1"),
    ("ORDER_TRIGGER_IDS", "P1"),
  ]
  .iter()
  .map(|(k, v)| (k.to_string(), v.to_string()))
  .collect();
  for (key, value) in overrides {
    env.insert(key.to_string(), value.to_string());
  }
  AppConfig::from_lookup(|key| env.get(key).cloned()).expect("test config is valid")
}

pub fn test_state(overrides: &[(&str, &str)], commerce: Arc<FakeCommerce>) -> AppState {
  giftline_webhooks::build_app_state(Arc::new(test_config(overrides)), commerce)
}

/// POST request carrying a valid signature for `body`.
pub fn signed_post(path: &str, body: &str) -> actix_web::test::TestRequest {
  actix_web::test::TestRequest::post()
    .uri(path)
    .insert_header(("Content-Type", "application/json"))
    .insert_header((SIGNATURE_HEADER, sign(body.as_bytes(), SECRET).expect("signable")))
    .insert_header(("X-Shopify-Topic", "test/topic"))
    .set_payload(body.to_string())
}

pub fn unsigned_post(path: &str, body: &str) -> actix_web::test::TestRequest {
  actix_web::test::TestRequest::post()
    .uri(path)
    .insert_header(("Content-Type", "application/json"))
    .set_payload(body.to_string())
}

/// Builds an actix test service over the app routes and `state`.
#[macro_export]
macro_rules! init_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .configure(giftline_webhooks::web::configure_app_routes),
    )
    .await
  };
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
