// webhooks/src/models/identifiers.rs

//! Identifier normalization and the trigger set.
//!
//! Webhook payloads carry bare numeric ids (`42` or `"42"`), while the
//! GraphQL APIs speak global ids (`gid://shopify/ProductVariant/42`).
//! Everything is compared by its normalized key: the trailing legacy id for
//! global ids, the trimmed string otherwise.

use std::collections::HashSet;
use std::fmt;

const GID_PREFIX: &str = "gid://shopify/";

/// Comparison key for an identifier.
pub fn normalize_id(raw: &str) -> String {
  let trimmed = raw.trim();
  match trimmed.strip_prefix(GID_PREFIX) {
    Some(rest) => {
      let without_query = rest.split('?').next().unwrap_or(rest);
      without_query.rsplit('/').next().unwrap_or(without_query).to_string()
    }
    None => trimmed.to_string(),
  }
}

/// Returns `raw` unchanged when it already is a global id, otherwise
/// `gid://shopify/{resource}/{raw}`.
pub fn to_global_id(resource: &str, raw: &str) -> String {
  let trimmed = raw.trim();
  if trimmed.starts_with(GID_PREFIX) {
    trimmed.to_string()
  } else {
    format!("{}{}/{}", GID_PREFIX, resource, trimmed)
  }
}

/// Which line-item identifier a flow compares against its trigger set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMatch {
  Variant,
  Product,
  /// Either identifier.
  Any,
}

impl std::str::FromStr for TriggerMatch {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "variant" => Ok(TriggerMatch::Variant),
      "product" => Ok(TriggerMatch::Product),
      "any" | "either" => Ok(TriggerMatch::Any),
      other => Err(format!("expected 'variant', 'product' or 'any', got '{}'", other)),
    }
  }
}

/// Externally configured identifiers, stored by normalized key.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IdentifierSet(HashSet<String>);

impl IdentifierSet {
  /// Parses a comma-separated list; blank entries are dropped.
  pub fn from_csv(csv: &str) -> Self {
    csv.split(',').collect()
  }

  pub fn contains(&self, raw: &str) -> bool {
    self.0.contains(&normalize_id(raw))
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }
}

impl<'a> FromIterator<&'a str> for IdentifierSet {
  fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
    IdentifierSet(
      iter
        .into_iter()
        .map(normalize_id)
        .filter(|id| !id.is_empty())
        .collect(),
    )
  }
}

impl fmt::Debug for IdentifierSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut ids: Vec<&String> = self.0.iter().collect();
    ids.sort();
    f.debug_set().entries(ids).finish()
  }
}
