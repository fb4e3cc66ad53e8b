// webhooks/src/models/order_edit.rs

//! Lifecycle of one order-edit session.
//!
//! ```text
//! NotStarted -> Open -> Staged -> Discounted -> Committed
//!                 \        \          \
//!                  +--------+----------+--> Aborted
//! ```
//!
//! `Staged -> Committed` is legal when the discount step is skipped.

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OrderEditState {
  #[default]
  NotStarted,
  /// Session opened; `session_id` is the calculated order id.
  Open { session_id: String },
  /// Bonus variant added to the session as `line_item_id`.
  Staged { session_id: String, line_item_id: String },
  /// Staged line discounted to zero.
  Discounted { session_id: String, line_item_id: String },
  Committed { order_id: String },
  /// A step failed; `staged_line` is what the cleanup had to undo.
  Aborted {
    failed_step: String,
    session_id: Option<String>,
    staged_line: Option<String>,
  },
}

impl OrderEditState {
  pub fn label(&self) -> &'static str {
    match self {
      OrderEditState::NotStarted => "not_started",
      OrderEditState::Open { .. } => "open",
      OrderEditState::Staged { .. } => "staged",
      OrderEditState::Discounted { .. } => "discounted",
      OrderEditState::Committed { .. } => "committed",
      OrderEditState::Aborted { .. } => "aborted",
    }
  }

  /// Calculated order id while a session is open.
  pub fn session_id(&self) -> Option<&str> {
    match self {
      OrderEditState::Open { session_id }
      | OrderEditState::Staged { session_id, .. }
      | OrderEditState::Discounted { session_id, .. } => Some(session_id),
      _ => None,
    }
  }

  /// Calculated line item id once the variant has been added.
  pub fn staged_line(&self) -> Option<&str> {
    match self {
      OrderEditState::Staged { line_item_id, .. } | OrderEditState::Discounted { line_item_id, .. } => {
        Some(line_item_id)
      }
      _ => None,
    }
  }

  pub fn begin(&mut self, session_id: String) -> Result<(), AppError> {
    match self {
      OrderEditState::NotStarted => {
        *self = OrderEditState::Open { session_id };
        Ok(())
      }
      other => Err(invalid_transition(other, "open")),
    }
  }

  pub fn stage(&mut self, line_item_id: String) -> Result<(), AppError> {
    match self {
      OrderEditState::Open { session_id } => {
        let session_id = std::mem::take(session_id);
        *self = OrderEditState::Staged { session_id, line_item_id };
        Ok(())
      }
      other => Err(invalid_transition(other, "staged")),
    }
  }

  pub fn discount(&mut self) -> Result<(), AppError> {
    match self {
      OrderEditState::Staged { session_id, line_item_id } => {
        *self = OrderEditState::Discounted {
          session_id: std::mem::take(session_id),
          line_item_id: std::mem::take(line_item_id),
        };
        Ok(())
      }
      other => Err(invalid_transition(other, "discounted")),
    }
  }

  pub fn commit(&mut self, order_id: String) -> Result<(), AppError> {
    match self {
      OrderEditState::Staged { .. } | OrderEditState::Discounted { .. } => {
        *self = OrderEditState::Committed { order_id };
        Ok(())
      }
      other => Err(invalid_transition(other, "committed")),
    }
  }

  /// Moves any state to `Aborted`, keeping what the cleanup needs.
  pub fn abort(&mut self, failed_step: &str) {
    let session_id = self.session_id().map(String::from);
    let staged_line = self.staged_line().map(String::from);
    *self = OrderEditState::Aborted {
      failed_step: failed_step.to_string(),
      session_id,
      staged_line,
    };
  }
}

fn invalid_transition(from: &OrderEditState, to: &str) -> AppError {
  AppError::Internal(format!("Invalid order edit transition from '{}' to '{}'", from.label(), to))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_lifecycle_with_discount() {
    let mut state = OrderEditState::default();
    state.begin("gid://shopify/CalculatedOrder/1".into()).unwrap();
    assert_eq!(state.session_id(), Some("gid://shopify/CalculatedOrder/1"));
    state.stage("gid://shopify/CalculatedLineItem/9".into()).unwrap();
    state.discount().unwrap();
    assert_eq!(state.staged_line(), Some("gid://shopify/CalculatedLineItem/9"));
    state.commit("gid://shopify/Order/5".into()).unwrap();
    assert_eq!(state.label(), "committed");
  }

  #[test]
  fn commit_straight_from_staged_is_allowed() {
    let mut state = OrderEditState::Staged {
      session_id: "s".into(),
      line_item_id: "l".into(),
    };
    state.commit("o".into()).unwrap();
    assert_eq!(state, OrderEditState::Committed { order_id: "o".into() });
  }

  #[test]
  fn out_of_order_transitions_are_rejected() {
    let mut state = OrderEditState::NotStarted;
    assert!(matches!(state.stage("l".into()), Err(AppError::Internal(_))));
    assert!(matches!(state.commit("o".into()), Err(AppError::Internal(_))));
    state.begin("s".into()).unwrap();
    assert!(state.begin("s2".into()).is_err());
  }

  #[test]
  fn abort_remembers_the_staged_line() {
    let mut state = OrderEditState::Staged {
      session_id: "s".into(),
      line_item_id: "l".into(),
    };
    state.abort("discount_bonus_line");
    assert_eq!(
      state,
      OrderEditState::Aborted {
        failed_step: "discount_bonus_line".into(),
        session_id: Some("s".into()),
        staged_line: Some("l".into()),
      }
    );
    assert_eq!(state.staged_line(), None);
  }
}
