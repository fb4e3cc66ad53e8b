// webhooks/src/services/triggers.rs

//! Membership predicates over line items.

use crate::models::identifiers::normalize_id;
use crate::models::{IdentifierSet, LineItem, TriggerMatch};

/// True iff some line item's identifier, chosen by `match_on`, is in `triggers`.
pub fn is_triggered(items: &[LineItem], triggers: &IdentifierSet, match_on: TriggerMatch) -> bool {
  if triggers.is_empty() {
    return false;
  }
  items.iter().any(|item| {
    let variant_hit = || item.variant_id.as_deref().is_some_and(|id| triggers.contains(id));
    let product_hit = || item.product_id.as_deref().is_some_and(|id| triggers.contains(id));
    match match_on {
      TriggerMatch::Variant => variant_hit(),
      TriggerMatch::Product => product_hit(),
      TriggerMatch::Any => variant_hit() || product_hit(),
    }
  })
}

/// True iff `target` already appears as a variant or product id.
pub fn contains_target(items: &[LineItem], target: &str) -> bool {
  let target = normalize_id(target);
  if target.is_empty() {
    return false;
  }
  items.iter().any(|item| {
    [item.variant_id.as_deref(), item.product_id.as_deref()]
      .into_iter()
      .flatten()
      .any(|id| normalize_id(id) == target)
  })
}
