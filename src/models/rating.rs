use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::Value;

use super::helpers::{first_present, number_field};

lazy_static! {
    // One flat table shared by every axis. "Good" scores the same for
    // connectivity and livability even if the axes were meant to differ.
    static ref RATING_LABELS: HashMap<&'static str, u8> = HashMap::from([
        ("Excellent", 5),
        ("Premium", 5),
        ("High", 5),
        ("Good", 4),
        ("Family-friendly", 4),
        ("Moderate", 3),
        ("Average", 3),
        ("Medium", 3),
        ("Developing", 2),
        ("Poor", 1),
        ("Low", 1),
        ("", 0),
    ]);
}

pub const MAX_RATING: u8 = 5;

/// Exact, case-sensitive lookup. Unknown labels score 0.
pub fn rating_score(label: &str) -> u8 {
    RATING_LABELS.get(label).copied().unwrap_or(0)
}

/// Only string labels are scored; numbers and other values score 0.
pub fn label_score(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::String(label)) => rating_score(label),
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Ratings {
    pub connectivity: u8,
    pub neighbourhood: u8,
    pub safety: u8,
    pub livability: u8,
}

impl Ratings {
    /// Ratings of a displayed listing, given as qualitative labels.
    pub fn from_labels(value: &Value) -> Ratings {
        let score = |aliases: &[&str]| label_score(first_present(value, aliases));
        Ratings {
            connectivity: score(&["connectivity", "Connectivity"]),
            neighbourhood: score(&["neighbourhood", "Neighbourhood"]),
            safety: score(&["safety", "Safety"]),
            livability: score(&["livability", "Livability"]),
        }
    }

    /// Ratings of a stored record, already numeric (often decimal strings).
    pub fn from_scores(value: &Value) -> Ratings {
        let score = |aliases: &[&str]| {
            number_field(value, aliases)
                .map(|n| n.round().clamp(0.0, MAX_RATING as f64) as u8)
                .unwrap_or(0)
        };
        Ratings {
            connectivity: score(&["Connectivity", "connectivity"]),
            neighbourhood: score(&["Neighbourhood", "neighbourhood"]),
            safety: score(&["Safety", "safety"]),
            livability: score(&["Livability", "livability"]),
        }
    }
}
