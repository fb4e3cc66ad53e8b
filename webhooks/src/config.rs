// webhooks/src/config.rs

use crate::errors::{AppError, Result};
use crate::models::identifiers::{IdentifierSet, TriggerMatch};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// What the order flow does with the bonus line after adding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeItemPolicy {
  /// Apply a 100% line discount; a failed discount fails the whole edit.
  Discount,
  /// Add the variant at its catalogue price.
  None,
}

impl std::str::FromStr for FreeItemPolicy {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "discount" => Ok(FreeItemPolicy::Discount),
      "none" | "off" => Ok(FreeItemPolicy::None),
      other => Err(format!("expected 'discount' or 'none', got '{}'", other)),
    }
  }
}

/// Per-flow settings: what triggers the flow and what it adds.
#[derive(Debug, Clone)]
pub struct FlowConfig {
  pub trigger_ids: IdentifierSet,
  pub trigger_match: TriggerMatch,
  /// Unset disables the flow: webhooks are acknowledged and nothing is added.
  pub target_variant_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub webhook_secret: Option<String>,
  pub skip_webhook_verification: bool,

  pub store_domain: String,
  pub api_version: String,
  /// Replaces `https://{store_domain}` when set.
  pub api_base_url: Option<String>,
  pub storefront_access_token: Option<String>,
  pub admin_access_token: Option<String>,
  pub upstream_timeout: Duration,

  pub cart: FlowConfig,
  pub order: FlowConfig,
  pub free_item_policy: FreeItemPolicy,
  pub staff_note: String,

  pub idempotency_ttl: Duration,
}

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup. Empty values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let require = |key: &str| get(key).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", key)));

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = parse_or(get("SERVER_PORT"), "SERVER_PORT", 8080u16)?;

    let store_domain = require("SHOPIFY_STORE_DOMAIN")?;
    let api_version = get("SHOPIFY_API_VERSION").unwrap_or_else(|| "2024-10".to_string());
    let api_base_url = get("SHOPIFY_API_BASE_URL").map(|url| url.trim_end_matches('/').to_string());

    let shared_triggers = get("TRIGGER_IDS");
    let cart_triggers = get("CART_TRIGGER_IDS").or_else(|| shared_triggers.clone());
    let order_triggers = get("ORDER_TRIGGER_IDS").or(shared_triggers);

    let hidden_variant = get("HIDDEN_VARIANT_ID");
    let bonus_variant = get("BONUS_VARIANT_ID").or_else(|| hidden_variant.clone());

    let cart = FlowConfig {
      trigger_ids: IdentifierSet::from_csv(cart_triggers.as_deref().unwrap_or_default()),
      trigger_match: parse_or(get("CART_TRIGGER_MATCH"), "CART_TRIGGER_MATCH", TriggerMatch::Variant)?,
      target_variant_id: hidden_variant,
    };
    let order = FlowConfig {
      trigger_ids: IdentifierSet::from_csv(order_triggers.as_deref().unwrap_or_default()),
      trigger_match: parse_or(get("ORDER_TRIGGER_MATCH"), "ORDER_TRIGGER_MATCH", TriggerMatch::Product)?,
      target_variant_id: bonus_variant,
    };

    let config = Self {
      server_host,
      server_port,
      webhook_secret: get("SHOPIFY_WEBHOOK_SECRET"),
      skip_webhook_verification: parse_or(get("SKIP_WEBHOOK_VERIFICATION"), "SKIP_WEBHOOK_VERIFICATION", false)?,
      store_domain,
      api_version,
      api_base_url,
      storefront_access_token: get("SHOPIFY_STOREFRONT_ACCESS_TOKEN"),
      admin_access_token: get("SHOPIFY_ADMIN_ACCESS_TOKEN"),
      upstream_timeout: Duration::from_secs(parse_or(get("UPSTREAM_TIMEOUT_SECS"), "UPSTREAM_TIMEOUT_SECS", 15u64)?),
      cart,
      order,
      free_item_policy: parse_or(get("FREE_ITEM_POLICY"), "FREE_ITEM_POLICY", FreeItemPolicy::Discount)?,
      staff_note: get("ORDER_EDIT_STAFF_NOTE").unwrap_or_else(|| "Bonus item added automatically".to_string()),
      idempotency_ttl: Duration::from_secs(parse_or(get("IDEMPOTENCY_TTL_SECS"), "IDEMPOTENCY_TTL_SECS", 600u64)?),
    };

    // Secrets stay out of the log; only their presence is reported.
    tracing::info!(
      store_domain = %config.store_domain,
      api_version = %config.api_version,
      webhook_secret_set = config.webhook_secret.is_some(),
      storefront_token_set = config.storefront_access_token.is_some(),
      admin_token_set = config.admin_access_token.is_some(),
      cart_triggers = config.cart.trigger_ids.len(),
      order_triggers = config.order.trigger_ids.len(),
      free_item_policy = ?config.free_item_policy,
      "Application configuration loaded."
    );

    Ok(config)
  }

  /// `https://{store_domain}` unless overridden.
  pub fn api_base_url(&self) -> String {
    self
      .api_base_url
      .clone()
      .unwrap_or_else(|| format!("https://{}", self.store_domain))
  }

  pub fn storefront_endpoint(&self) -> String {
    format!("{}/api/{}/graphql.json", self.api_base_url(), self.api_version)
  }

  pub fn admin_endpoint(&self) -> String {
    format!("{}/admin/api/{}/graphql.json", self.api_base_url(), self.api_version)
  }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", key, value, e))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
  }

  #[test]
  fn defaults_apply_when_only_domain_is_set() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("SHOPIFY_STORE_DOMAIN", "shop.example.com")])).unwrap();
    assert_eq!(cfg.server_port, 8080);
    assert_eq!(cfg.free_item_policy, FreeItemPolicy::Discount);
    assert_eq!(cfg.cart.trigger_match, TriggerMatch::Variant);
    assert_eq!(cfg.order.trigger_match, TriggerMatch::Product);
    assert!(cfg.cart.trigger_ids.is_empty());
    assert!(!cfg.skip_webhook_verification);
    assert_eq!(
      cfg.admin_endpoint(),
      "https://shop.example.com/admin/api/2024-10/graphql.json"
    );
    assert_eq!(cfg.storefront_endpoint(), "https://shop.example.com/api/2024-10/graphql.json");
  }

  #[test]
  fn missing_domain_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("SHOPIFY_STORE_DOMAIN")));
  }

  #[test]
  fn per_flow_values_fall_back_to_shared_ones() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
      ("SHOPIFY_STORE_DOMAIN", "shop.example.com"),
      ("TRIGGER_IDS", "T1, T2"),
      ("ORDER_TRIGGER_IDS", "P9"),
      ("HIDDEN_VARIANT_ID", "H1"),
      ("SHOPIFY_API_BASE_URL", "http://127.0.0.1:9000/"),
    ]))
    .unwrap();
    assert!(cfg.cart.trigger_ids.contains("T2"));
    assert!(cfg.order.trigger_ids.contains("P9"));
    assert!(!cfg.order.trigger_ids.contains("T1"));
    assert_eq!(cfg.order.target_variant_id.as_deref(), Some("H1"));
    assert_eq!(cfg.storefront_endpoint(), "http://127.0.0.1:9000/api/2024-10/graphql.json");
  }

  #[test]
  fn invalid_values_are_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[
      ("SHOPIFY_STORE_DOMAIN", "shop.example.com"),
      ("FREE_ITEM_POLICY", "sometimes"),
    ]))
    .unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.contains("FREE_ITEM_POLICY")));

    let err = AppConfig::from_lookup(lookup_from(&[
      ("SHOPIFY_STORE_DOMAIN", "shop.example.com"),
      ("SKIP_WEBHOOK_VERIFICATION", "yes please"),
    ]))
    .unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
  }
}
