//! Place identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{LEAVE_REVIEW_URL_TEMPLATE, PLACE_ID_PARAM};
use crate::error::{Result, ReviewsError};

/// Opaque identifier issued by the mapping provider for a physical location.
///
/// Always non-empty and trimmed of surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Parses an optional raw identifier, as it arrives from a query string.
    ///
    /// Absent, empty, and whitespace-only values fail with
    /// [`ReviewsError::MissingParameter`].
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(ReviewsError::MissingParameter(PLACE_ID_PARAM)),
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the "leave a review" link for this place.
    pub fn leave_review_url(&self) -> String {
        LEAVE_REVIEW_URL_TEMPLATE.replace("{place_id}", &self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = ReviewsError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(Some(&value))
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}
