// webhooks/src/models/mod.rs

//! Webhook payloads and the values derived from them.

pub mod cart;
pub mod identifiers;
pub mod line_item;
pub mod order;
pub mod order_edit;

pub use cart::Cart;
pub use identifiers::{IdentifierSet, TriggerMatch};
pub use line_item::LineItem;
pub use order::Order;
pub use order_edit::OrderEditState;
