use serde::Serialize;
use serde_json::Value;

use super::helpers::{first_present, identifier, number_field, text_field};
use super::rating::Ratings;
use crate::errors::{StoreError, StoreResult};

const DEFAULT_SELLER_NAME: &str = "Property Agent";
const DEFAULT_SELLER_PHONE: &str = "6465484442";

/// Fields used to decide whether two descriptions point at the same property.
pub trait PropertyIdentity {
    fn identity_id(&self) -> Option<&str>;
    fn identity_city(&self) -> Option<&str>;
    fn identity_location(&self) -> Option<&str>;
    fn identity_type(&self) -> Option<&str>;
    fn identity_price(&self) -> Option<f64>;
}

/// The listing currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyView {
    pub id: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<f64>,
    pub area_sqft: Option<f64>,
    pub seller_name: String,
    pub seller_phone: String,
    pub image: Option<String>,
    pub ratings: Ratings,
}

impl PropertyView {
    /// Normalizes a listing as produced by the search, random and estimate
    /// endpoints, which disagree on field names and casing.
    pub fn from_value(value: &Value) -> StoreResult<PropertyView> {
        if !value.is_object() {
            return Err(StoreError::InvalidInput(
                "property must be a JSON object".to_string(),
            ));
        }

        Ok(PropertyView {
            id: first_present(value, &["id"]).and_then(identifier),
            city: text_field(value, &["city"]),
            location: text_field(value, &["location"]),
            property_type: text_field(value, &["property_type"]),
            // An unpriced listing compares as 0, not as "any price".
            price: Some(number_field(value, &["price"]).unwrap_or(0.0)),
            bedrooms: number_field(value, &["bedrooms"]),
            area_sqft: number_field(value, &["area_sqft", "area"]),
            seller_name: text_field(value, &["seller_name"])
                .unwrap_or_else(|| DEFAULT_SELLER_NAME.to_string()),
            seller_phone: text_field(value, &["phone_number", "seller_phone"])
                .unwrap_or_else(|| DEFAULT_SELLER_PHONE.to_string()),
            image: text_field(value, &["image", "property_image"]),
            ratings: Ratings::from_labels(value),
        })
    }

    pub fn describe(&self) -> String {
        format!(
            "{} in {}, {}",
            self.property_type.as_deref().unwrap_or("property"),
            self.location.as_deref().unwrap_or("?"),
            self.city.as_deref().unwrap_or("?"),
        )
    }
}

impl PropertyIdentity for PropertyView {
    fn identity_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn identity_city(&self) -> Option<&str> {
        self.city.as_deref()
    }
    fn identity_location(&self) -> Option<&str> {
        self.location.as_deref()
    }
    fn identity_type(&self) -> Option<&str> {
        self.property_type.as_deref()
    }
    fn identity_price(&self) -> Option<f64> {
        self.price
    }
}

/// A bookmark held by the remote store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SavedPropertyRecord {
    pub id: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub bedrooms: Option<f64>,
    pub area_sqft: Option<f64>,
    pub seller_name: Option<String>,
    pub seller_phone: Option<String>,
    pub property_image: Option<String>,
    pub ratings: Ratings,
    pub created_at: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl SavedPropertyRecord {
    /// Older records nest the listing under `property` or use legacy names.
    pub fn from_value(value: &Value) -> SavedPropertyRecord {
        SavedPropertyRecord {
            id: first_present(value, &["id", "property_id", "saved_id"]).and_then(identifier),
            city: text_field(value, &["city", "city_name", "property.city"]),
            location: text_field(value, &["location", "location_name", "property.location"]),
            property_type: text_field(value, &["property_type", "property.property_type"]),
            price: number_field(value, &["price", "property.price", "amount"]),
            bedrooms: number_field(value, &["bedrooms", "property.bedrooms"]),
            area_sqft: number_field(value, &["area_sqft", "property.area_sqft"]),
            seller_name: text_field(value, &["seller_name"]),
            seller_phone: text_field(value, &["seller_phone", "phone_number"]),
            property_image: text_field(value, &["property_image", "image"]),
            ratings: Ratings::from_scores(value),
            created_at: text_field(value, &["created_at"]),
            user_name: text_field(value, &["user_name"]),
            user_email: text_field(value, &["user_email"]),
            raw: value.clone(),
        }
    }

    /// Record kept locally when a save succeeded but the response body was not
    /// a record.
    pub fn from_payload(payload: &SavePropertyPayload, id: String) -> SavedPropertyRecord {
        SavedPropertyRecord {
            id: Some(id),
            city: payload.city.clone(),
            location: payload.location.clone(),
            property_type: payload.property_type.clone(),
            price: Some(payload.price),
            bedrooms: payload.bedrooms.map(|b| b as f64),
            area_sqft: payload.area_sqft.map(|a| a as f64),
            seller_name: Some(payload.seller_name.clone()),
            seller_phone: Some(payload.seller_phone.clone()),
            property_image: Some(payload.property_image.clone()),
            ratings: Ratings {
                connectivity: payload.connectivity,
                neighbourhood: payload.neighbourhood,
                safety: payload.safety,
                livability: payload.livability,
            },
            created_at: None,
            user_name: None,
            user_email: None,
            raw: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }
}

impl PropertyIdentity for SavedPropertyRecord {
    fn identity_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
    fn identity_city(&self) -> Option<&str> {
        self.city.as_deref()
    }
    fn identity_location(&self) -> Option<&str> {
        self.location.as_deref()
    }
    fn identity_type(&self) -> Option<&str> {
        self.property_type.as_deref()
    }
    fn identity_price(&self) -> Option<f64> {
        self.price
    }
}

/// Body of `POST /save-property`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavePropertyPayload {
    pub city: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub bedrooms: Option<i64>,
    pub area_sqft: Option<i64>,
    pub seller_name: String,
    pub seller_phone: String,
    pub property_image: String,
    pub price: f64,
    #[serde(rename = "Connectivity")]
    pub connectivity: u8,
    #[serde(rename = "Neighbourhood")]
    pub neighbourhood: u8,
    #[serde(rename = "Safety")]
    pub safety: u8,
    #[serde(rename = "Livability")]
    pub livability: u8,
}

impl SavePropertyPayload {
    pub fn from_view(property: &PropertyView, placeholder_image: &str) -> SavePropertyPayload {
        SavePropertyPayload {
            city: property.city.clone(),
            location: property.location.clone(),
            property_type: property.property_type.clone(),
            bedrooms: whole_number(property.bedrooms),
            area_sqft: whole_number(property.area_sqft),
            seller_name: property.seller_name.clone(),
            seller_phone: property.seller_phone.clone(),
            property_image: property
                .image
                .clone()
                .unwrap_or_else(|| placeholder_image.to_string()),
            price: property.price.unwrap_or(0.0),
            connectivity: property.ratings.connectivity,
            neighbourhood: property.ratings.neighbourhood,
            safety: property.ratings.safety,
            livability: property.ratings.livability,
        }
    }
}

// Zero counts as unknown, same as a missing value.
fn whole_number(value: Option<f64>) -> Option<i64> {
    value
        .filter(|v| *v != 0.0)
        .map(|v| v.trunc() as i64)
}
