// webhooks/src/services/graphql_client.rs

//! reqwest-backed `CommerceApi` speaking the Storefront and Admin GraphQL APIs.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::config::AppConfig;
use crate::services::commerce::{CommerceApi, CommerceError};

const CART_LINES_ADD: &str = r#"
mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { id totalQuantity }
    userErrors { field message }
  }
}"#;

const ORDER_EDIT_BEGIN: &str = r#"
mutation orderEditBegin($id: ID!) {
  orderEditBegin(id: $id) {
    calculatedOrder { id }
    userErrors { field message }
  }
}"#;

const ORDER_EDIT_ADD_VARIANT: &str = r#"
mutation orderEditAddVariant($id: ID!, $variantId: ID!, $quantity: Int!, $allowDuplicates: Boolean) {
  orderEditAddVariant(id: $id, variantId: $variantId, quantity: $quantity, allowDuplicates: $allowDuplicates) {
    calculatedLineItem { id }
    calculatedOrder { id }
    userErrors { field message }
  }
}"#;

const ORDER_EDIT_ADD_LINE_ITEM_DISCOUNT: &str = r#"
mutation orderEditAddLineItemDiscount($id: ID!, $lineItemId: ID!, $discount: OrderEditAppliedDiscountInput!) {
  orderEditAddLineItemDiscount(id: $id, lineItemId: $lineItemId, discount: $discount) {
    addedDiscountStagedChange { id }
    calculatedLineItem { id }
    userErrors { field message }
  }
}"#;

const ORDER_EDIT_SET_QUANTITY: &str = r#"
mutation orderEditSetQuantity($id: ID!, $lineItemId: ID!, $quantity: Int!) {
  orderEditSetQuantity(id: $id, lineItemId: $lineItemId, quantity: $quantity) {
    calculatedLineItem { id quantity }
    userErrors { field message }
  }
}"#;

const ORDER_EDIT_COMMIT: &str = r#"
mutation orderEditCommit($id: ID!, $notifyCustomer: Boolean, $staffNote: String) {
  orderEditCommit(id: $id, notifyCustomer: $notifyCustomer, staffNote: $staffNote) {
    order { id }
    userErrors { field message }
  }
}"#;

#[derive(Debug, Clone, Copy)]
enum Api {
  Storefront,
  Admin,
}

impl Api {
  fn label(self) -> &'static str {
    match self {
      Api::Storefront => "storefront",
      Api::Admin => "admin",
    }
  }

  fn token_header(self) -> &'static str {
    match self {
      Api::Storefront => "X-Shopify-Storefront-Access-Token",
      Api::Admin => "X-Shopify-Access-Token",
    }
  }
}

pub struct ShopifyGraphqlClient {
  http: reqwest::Client,
  storefront_endpoint: String,
  admin_endpoint: String,
  storefront_token: Option<String>,
  admin_token: Option<String>,
}

impl ShopifyGraphqlClient {
  pub fn from_config(config: &AppConfig) -> Result<Self, CommerceError> {
    let http = reqwest::Client::builder().timeout(config.upstream_timeout).build()?;
    Ok(Self {
      http,
      storefront_endpoint: config.storefront_endpoint(),
      admin_endpoint: config.admin_endpoint(),
      storefront_token: config.storefront_access_token.clone(),
      admin_token: config.admin_access_token.clone(),
    })
  }

  fn target(&self, api: Api) -> Result<(&str, &str), CommerceError> {
    let (endpoint, token) = match api {
      Api::Storefront => (&self.storefront_endpoint, &self.storefront_token),
      Api::Admin => (&self.admin_endpoint, &self.admin_token),
    };
    let token = token.as_deref().ok_or(CommerceError::MissingCredential(api.label()))?;
    Ok((endpoint.as_str(), token))
  }

  /// Posts one GraphQL operation and returns `data.<operation>`.
  ///
  /// Non-2xx statuses, top-level `errors`, a missing payload and non-empty
  /// `userErrors` are all failures.
  async fn execute(
    &self,
    api: Api,
    operation: &'static str,
    query: &str,
    variables: Value,
  ) -> Result<(Value, Value), CommerceError> {
    let (endpoint, token) = self.target(api)?;
    debug!(endpoint, operation, "Sending GraphQL request.");

    let response = self
      .http
      .post(endpoint)
      .header(api.token_header(), token)
      .json(&json!({ "query": query, "variables": variables }))
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(operation, status = status.as_u16(), "GraphQL request rejected.");
      return Err(CommerceError::Status {
        status: status.as_u16(),
        body,
      });
    }

    let document: Value = response.json().await.map_err(|e| CommerceError::MalformedResponse {
      operation,
      detail: e.to_string(),
    })?;

    if let Some(errors) = document.get("errors").and_then(Value::as_array) {
      if !errors.is_empty() {
        return Err(CommerceError::GraphQl(messages_of(errors)));
      }
    }

    let payload = document
      .get("data")
      .and_then(|data| data.get(operation))
      .filter(|payload| !payload.is_null())
      .cloned()
      .ok_or_else(|| CommerceError::MalformedResponse {
        operation,
        detail: "missing payload".to_string(),
      })?;

    if let Some(user_errors) = payload.get("userErrors").and_then(Value::as_array) {
      if !user_errors.is_empty() {
        return Err(CommerceError::UserErrors {
          operation,
          messages: messages_of(user_errors),
        });
      }
    }

    Ok((document, payload))
  }
}

fn messages_of(errors: &[Value]) -> Vec<String> {
  errors
    .iter()
    .map(|e| {
      e.get("message")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| e.to_string())
    })
    .collect()
}

fn required_id(payload: &Value, pointer: &str, operation: &'static str) -> Result<String, CommerceError> {
  payload
    .pointer(pointer)
    .and_then(Value::as_str)
    .map(String::from)
    .ok_or_else(|| CommerceError::MalformedResponse {
      operation,
      detail: format!("missing {}", pointer),
    })
}

#[async_trait]
impl CommerceApi for ShopifyGraphqlClient {
  #[instrument(name = "shopify::cart_lines_add", skip(self), err(Display))]
  async fn add_cart_line(&self, cart_id: &str, variant_id: &str, quantity: u32) -> Result<Value, CommerceError> {
    let variables = json!({
      "cartId": cart_id,
      "lines": [{ "merchandiseId": variant_id, "quantity": quantity }],
    });
    let (document, _) = self.execute(Api::Storefront, "cartLinesAdd", CART_LINES_ADD, variables).await?;
    Ok(document)
  }

  #[instrument(name = "shopify::order_edit_begin", skip(self), err(Display))]
  async fn begin_order_edit(&self, order_id: &str) -> Result<String, CommerceError> {
    let (_, payload) = self
      .execute(Api::Admin, "orderEditBegin", ORDER_EDIT_BEGIN, json!({ "id": order_id }))
      .await?;
    required_id(&payload, "/calculatedOrder/id", "orderEditBegin")
  }

  #[instrument(name = "shopify::order_edit_add_variant", skip(self), err(Display))]
  async fn add_variant_to_edit(&self, session_id: &str, variant_id: &str, quantity: u32) -> Result<String, CommerceError> {
    let variables = json!({
      "id": session_id,
      "variantId": variant_id,
      "quantity": quantity,
      "allowDuplicates": false,
    });
    let (_, payload) = self
      .execute(Api::Admin, "orderEditAddVariant", ORDER_EDIT_ADD_VARIANT, variables)
      .await?;
    required_id(&payload, "/calculatedLineItem/id", "orderEditAddVariant")
  }

  #[instrument(name = "shopify::order_edit_add_line_item_discount", skip(self), err(Display))]
  async fn discount_edit_line(
    &self,
    session_id: &str,
    line_item_id: &str,
    percent: f64,
    description: &str,
  ) -> Result<(), CommerceError> {
    let variables = json!({
      "id": session_id,
      "lineItemId": line_item_id,
      "discount": { "percentValue": percent, "description": description },
    });
    self
      .execute(
        Api::Admin,
        "orderEditAddLineItemDiscount",
        ORDER_EDIT_ADD_LINE_ITEM_DISCOUNT,
        variables,
      )
      .await?;
    Ok(())
  }

  #[instrument(name = "shopify::order_edit_set_quantity", skip(self), err(Display))]
  async fn set_edit_line_quantity(&self, session_id: &str, line_item_id: &str, quantity: u32) -> Result<(), CommerceError> {
    let variables = json!({ "id": session_id, "lineItemId": line_item_id, "quantity": quantity });
    self
      .execute(Api::Admin, "orderEditSetQuantity", ORDER_EDIT_SET_QUANTITY, variables)
      .await?;
    Ok(())
  }

  #[instrument(name = "shopify::order_edit_commit", skip(self, staff_note), err(Display))]
  async fn commit_order_edit(&self, session_id: &str, notify_customer: bool, staff_note: &str) -> Result<String, CommerceError> {
    let variables = json!({ "id": session_id, "notifyCustomer": notify_customer, "staffNote": staff_note });
    let (_, payload) = self
      .execute(Api::Admin, "orderEditCommit", ORDER_EDIT_COMMIT, variables)
      .await?;
    required_id(&payload, "/order/id", "orderEditCommit")
  }
}
