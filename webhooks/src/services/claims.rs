// webhooks/src/services/claims.rs

// At-most-once delivery claims. A claim lives until it is released or its
// TTL runs out; claims are local to this process.
use moka::sync::Cache;
use std::time::Duration;

use crate::models::identifiers::normalize_id;

const CAPACITY: u64 = 10_000;

pub struct ClaimStore {
  cache: Cache<String, ()>,
}

impl ClaimStore {
  pub fn new(ttl: Duration) -> Self {
    let cache = Cache::builder().max_capacity(CAPACITY).time_to_live(ttl).build();
    ClaimStore { cache }
  }

  /// Key for one (flow, entity, target) combination.
  pub fn key(flow: &str, entity_id: &str, target_id: &str) -> String {
    format!("{}:{}:{}", flow, normalize_id(entity_id), normalize_id(target_id))
  }

  /// True only for the first caller while the claim is live.
  pub fn try_claim(&self, key: &str) -> bool {
    self.cache.entry(key.to_string()).or_insert(()).is_fresh()
  }

  pub fn release(&self, key: &str) {
    self.cache.invalidate(key);
  }

  pub fn is_claimed(&self, key: &str) -> bool {
    self.cache.contains_key(key)
  }
}
