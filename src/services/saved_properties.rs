use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::Value;

use super::detached;
use crate::clients::SavedPropertyApi;
use crate::errors::{StoreError, StoreResult};
use crate::models::helpers::generate_temporary_id;
use crate::models::{
    CurrentUser, PropertyIdentity, PropertyView, SavePropertyPayload, SavedPropertyRecord,
};

/// Identity rule between two property descriptions.
///
/// Equal identifiers match outright. Otherwise city, location and type must
/// agree case-insensitively and price numerically, but only where both sides
/// carry the field. Records saved before ids were returned reliably depend on
/// that leniency.
pub fn matches<A, B>(property: &A, record: &B) -> bool
where
    A: PropertyIdentity + ?Sized,
    B: PropertyIdentity + ?Sized,
{
    if let (Some(a), Some(b)) = (property.identity_id(), record.identity_id()) {
        if a == b {
            return true;
        }
    }

    same_text(property.identity_city(), record.identity_city())
        && same_text(property.identity_location(), record.identity_location())
        && same_text(property.identity_type(), record.identity_type())
        && same_price(property.identity_price(), record.identity_price())
}

fn same_text(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
        _ => true,
    }
}

fn same_price(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

pub fn is_saved<P>(property: &P, records: &[SavedPropertyRecord]) -> bool
where
    P: PropertyIdentity + ?Sized,
{
    records.iter().any(|record| matches(property, record))
}

/// Whether two saved records describe the same bookmark. Records that both
/// carry an id are compared by id alone; otherwise the `matches` rule applies.
pub fn same_record(a: &SavedPropertyRecord, b: &SavedPropertyRecord) -> bool {
    match (a.id.as_deref(), b.id.as_deref()) {
        (Some(a_id), Some(b_id)) => a_id == b_id,
        _ => matches(a, b),
    }
}

/// Local mirror of one user's saved properties, built for a single view.
///
/// Mutators take `&mut self`, so a save and a remove can never overlap on the
/// same store. The mirror only changes after the server confirms.
pub struct SavedPropertyStore<C: SavedPropertyApi + 'static> {
    client: Arc<C>,
    user: Option<CurrentUser>,
    records: Vec<SavedPropertyRecord>,
    placeholder_image: String,
}

impl<C: SavedPropertyApi + 'static> SavedPropertyStore<C> {
    /// Loads the current user and, when authenticated, their saved list.
    /// Failures are logged and leave an empty, unauthenticated store.
    pub async fn mount(client: Arc<C>, placeholder_image: impl Into<String>) -> Self {
        let mut store = SavedPropertyStore {
            client,
            user: None,
            records: Vec::new(),
            placeholder_image: placeholder_image.into(),
        };

        let user = match store.client.current_user().await {
            Ok(user) => user,
            Err(e) => {
                error!("Error while fetching current user: {}", e);
                return store;
            }
        };

        if user.is_some() {
            store.records = match store.client.saved_properties().await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Could not load saved properties: {}", e);
                    Vec::new()
                }
            };
        }
        store.user = user;

        debug!("Mounted store with {} saved properties", store.records.len());
        store
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn records(&self) -> &[SavedPropertyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_saved(&self, property: &PropertyView) -> bool {
        is_saved(property, &self.records)
    }

    pub fn find(&self, property: &PropertyView) -> Option<&SavedPropertyRecord> {
        self.records.iter().find(|record| matches(property, *record))
    }

    pub async fn save(&mut self, property: &PropertyView) -> StoreResult<SavedPropertyRecord> {
        if self.user.is_none() {
            return Err(StoreError::AuthenticationRequired);
        }

        if let Some(existing) = self.find(property) {
            debug!("{} is already saved", property.describe());
            return Ok(existing.clone());
        }

        let payload = SavePropertyPayload::from_view(property, &self.placeholder_image);
        let client = Arc::clone(&self.client);
        let request = payload.clone();
        let body = detached(async move { client.save_property(&request).await }).await?;

        let record = match body {
            Value::Object(_) => SavedPropertyRecord::from_value(&body),
            other => {
                warn!("Save response was not a record ({}), keeping a local copy", other);
                SavedPropertyRecord::from_payload(&payload, generate_temporary_id())
            }
        };

        if self.records.iter().any(|existing| same_record(existing, &record)) {
            debug!("Saved record already mirrored, skipping insert");
        } else {
            self.records.push(record.clone());
        }

        info!("Saved {}", property.describe());
        Ok(record)
    }

    pub async fn remove(&mut self, property: &PropertyView) -> StoreResult<()> {
        let record = self
            .find(property)
            .ok_or_else(|| StoreError::NotFound(property.describe()))?;
        let id = record.id.clone().ok_or_else(|| {
            StoreError::NotFound(format!("{} has no identifier", property.describe()))
        })?;

        let client = Arc::clone(&self.client);
        let target = id.clone();
        detached(async move { client.remove_property(&target).await }).await?;

        self.records.retain(|r| r.id.as_deref() != Some(id.as_str()));
        info!("Removed saved property {}", id);
        Ok(())
    }

    /// Returns the saved state after the call.
    pub async fn toggle(&mut self, property: &PropertyView) -> StoreResult<bool> {
        if self.is_saved(property) {
            self.remove(property).await?;
            Ok(false)
        } else {
            self.save(property).await?;
            Ok(true)
        }
    }
}
