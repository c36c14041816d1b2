pub mod api;
pub mod helpers;
pub mod marketplace_client;

pub use api::SavedPropertyApi;
pub use marketplace_client::MarketplaceClient;
