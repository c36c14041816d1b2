use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreResult;
use crate::models::{CurrentUser, SavePropertyPayload, SavedPropertyRecord};

/// The remote marketplace as seen by the saved-property views.
#[async_trait]
pub trait SavedPropertyApi: Send + Sync {
    /// `GET /me`. `Ok(None)` when the session is not authenticated.
    async fn current_user(&self) -> StoreResult<Option<CurrentUser>>;

    /// `GET /saved-properties`. A body that is not an array yields no records.
    async fn saved_properties(&self) -> StoreResult<Vec<SavedPropertyRecord>>;

    /// `POST /save-property`. Returns the response body as received; a body
    /// that is not JSON comes back as `Value::Null`.
    async fn save_property(&self, payload: &SavePropertyPayload) -> StoreResult<Value>;

    /// `DELETE /remove-property/{id}`.
    async fn remove_property(&self, id: &str) -> StoreResult<()>;
}
