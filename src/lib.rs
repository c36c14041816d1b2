pub mod clients;
pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod services;

pub use clients::{MarketplaceClient, SavedPropertyApi};
pub use errors::{StoreError, StoreResult};
pub use models::{PropertyView, SavedPropertyRecord};
pub use services::{is_saved, matches, Profile, SavedPropertyStore};
