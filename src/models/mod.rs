pub mod helpers;
pub mod property;
pub mod rating;
pub mod user;

pub use property::{PropertyIdentity, PropertyView, SavePropertyPayload, SavedPropertyRecord};
pub use rating::{rating_score, Ratings};
pub use user::CurrentUser;
