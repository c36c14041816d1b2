pub mod profile;
pub mod saved_properties;

use std::future::Future;

use crate::errors::{StoreError, StoreResult};

pub use profile::{Profile, ProfileSummary};
pub use saved_properties::{is_saved, matches, same_record, SavedPropertyStore};

// Requests run on their own task so an issued call completes even when the
// view that started it is dropped.
pub(crate) async fn detached<T, F>(request: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(request)
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}
