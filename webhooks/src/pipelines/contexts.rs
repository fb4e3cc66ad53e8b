// webhooks/src/pipelines/contexts.rs

//! Data structs the webhook pipelines run over.
//! Handlers receive these wrapped in `giftline_core::ContextData`.

use crate::config::FlowConfig;
use crate::models::{Cart, LineItem, Order, OrderEditState};
use crate::state::AppState;
use actix_web::web::Bytes;
use serde_json::Value;

/// How a delivery ended when nothing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
  Pending,
  /// No target variant configured for the flow.
  FlowDisabled,
  NotTriggered,
  AlreadyPresent,
  /// Another delivery holds the claim for this entity and target.
  AlreadyClaimed,
  ItemAdded { entity_id: String },
}

/// What the shared steps need from a flow's context.
pub trait WebhookDelivery: Send + Sync + 'static {
  /// Claim-key prefix and log label.
  const FLOW: &'static str;

  fn app_state(&self) -> &AppState;
  fn flow_config(&self) -> &FlowConfig;
  fn raw_body(&self) -> &Bytes;
  fn signature(&self) -> Option<&str>;
  /// Id of the parsed cart or order, once parsing has run.
  fn entity_id(&self) -> Option<&str>;
  fn line_items(&self) -> &[LineItem];
  fn claim_key(&self) -> Option<&str>;
  fn set_claim_key(&mut self, key: Option<String>);
  fn set_outcome(&mut self, outcome: WebhookOutcome);
}

#[derive(Clone)]
pub struct CartWebhookCtxData {
  pub app_state: AppState,
  pub raw_body: Bytes,
  pub signature: Option<String>,
  pub cart: Option<Cart>,
  pub claim_key: Option<String>,
  pub mutation_response: Option<Value>,
  pub outcome: WebhookOutcome,
}

impl CartWebhookCtxData {
  pub fn new(app_state: AppState, raw_body: Bytes, signature: Option<String>) -> Self {
    Self {
      app_state,
      raw_body,
      signature,
      cart: None,
      claim_key: None,
      mutation_response: None,
      outcome: WebhookOutcome::Pending,
    }
  }
}

#[derive(Clone)]
pub struct OrderWebhookCtxData {
  pub app_state: AppState,
  pub raw_body: Bytes,
  pub signature: Option<String>,
  pub order: Option<Order>,
  pub claim_key: Option<String>,
  pub edit: OrderEditState,
  pub outcome: WebhookOutcome,
}

impl OrderWebhookCtxData {
  pub fn new(app_state: AppState, raw_body: Bytes, signature: Option<String>) -> Self {
    Self {
      app_state,
      raw_body,
      signature,
      order: None,
      claim_key: None,
      edit: OrderEditState::NotStarted,
      outcome: WebhookOutcome::Pending,
    }
  }
}

macro_rules! impl_webhook_delivery {
  ($ctx:ty, $flow:literal, $config:ident, $entity:ident, $id:ident, $items:ident) => {
    impl WebhookDelivery for $ctx {
      const FLOW: &'static str = $flow;

      fn app_state(&self) -> &AppState {
        &self.app_state
      }

      fn flow_config(&self) -> &FlowConfig {
        &self.app_state.config.$config
      }

      fn raw_body(&self) -> &Bytes {
        &self.raw_body
      }

      fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
      }

      fn entity_id(&self) -> Option<&str> {
        self.$entity.as_ref().map(|entity| entity.$id.as_str())
      }

      fn line_items(&self) -> &[LineItem] {
        self.$entity.as_ref().map(|entity| entity.$items.as_slice()).unwrap_or_default()
      }

      fn claim_key(&self) -> Option<&str> {
        self.claim_key.as_deref()
      }

      fn set_claim_key(&mut self, key: Option<String>) {
        self.claim_key = key;
      }

      fn set_outcome(&mut self, outcome: WebhookOutcome) {
        self.outcome = outcome;
      }
    }
  };
}

impl_webhook_delivery!(CartWebhookCtxData, "cart", cart, cart, id, items);
impl_webhook_delivery!(OrderWebhookCtxData, "order", order, order, global_id, line_items);
