use std::sync::Arc;

use log::warn;
use serde::Serialize;

use super::detached;
use crate::clients::SavedPropertyApi;
use crate::errors::{StoreError, StoreResult};
use crate::models::{CurrentUser, SavedPropertyRecord};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageRatings {
    pub connectivity: f64,
    pub neighbourhood: f64,
    pub safety: f64,
    pub livability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub username: String,
    pub saved_count: usize,
    pub average_ratings: Option<AverageRatings>,
}

/// Account page: the signed in user and everything they saved.
pub struct Profile<C: SavedPropertyApi + 'static> {
    client: Arc<C>,
    pub user: CurrentUser,
    pub saved: Vec<SavedPropertyRecord>,
}

impl<C: SavedPropertyApi + 'static> Profile<C> {
    pub async fn load(client: Arc<C>) -> StoreResult<Profile<C>> {
        let user = client
            .current_user()
            .await?
            .ok_or(StoreError::AuthenticationRequired)?;

        let saved = match client.saved_properties().await {
            Ok(saved) => saved,
            Err(StoreError::Remote { status, message }) => {
                warn!("Saved properties unavailable ({}): {}", status, message);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Profile {
            client,
            user,
            saved,
        })
    }

    pub async fn remove(&mut self, id: &str) -> StoreResult<()> {
        if !self.saved.iter().any(|r| r.id.as_deref() == Some(id)) {
            return Err(StoreError::NotFound(format!("no saved property with id {id}")));
        }

        let client = Arc::clone(&self.client);
        let target = id.to_string();
        detached(async move { client.remove_property(&target).await }).await?;
        self.saved.retain(|r| r.id.as_deref() != Some(id));
        Ok(())
    }

    pub fn summary(&self) -> ProfileSummary {
        let count = self.saved.len();
        let average_ratings = (count > 0).then(|| {
            let mean = |axis: fn(&SavedPropertyRecord) -> u8| {
                self.saved.iter().map(|r| axis(r) as f64).sum::<f64>() / count as f64
            };
            AverageRatings {
                connectivity: mean(|r| r.ratings.connectivity),
                neighbourhood: mean(|r| r.ratings.neighbourhood),
                safety: mean(|r| r.ratings.safety),
                livability: mean(|r| r.ratings.livability),
            }
        });

        ProfileSummary {
            username: self.user.username.clone(),
            saved_count: count,
            average_ratings,
        }
    }
}
