// webhooks/src/services/mod.rs

pub mod claims;
pub mod commerce;
pub mod graphql_client;
pub mod signature;
pub mod triggers;

pub use claims::ClaimStore;
pub use commerce::{CommerceApi, CommerceError};
pub use graphql_client::ShopifyGraphqlClient;
