//! Reviews and cached snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::REFRESH_CONFIRMATION_MESSAGE;
use crate::types::PlaceId;

/// A single review, forwarded exactly as upstream sent it.
///
/// The proxy never validates or reshapes reviews. The accessors below are
/// read-only conveniences for logging and display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Review(pub Value);

impl Review {
    /// Reviewer display name.
    pub fn author_name(&self) -> Option<&str> {
        self.0.get("author_name").and_then(Value::as_str)
    }

    /// Star rating given by the reviewer.
    pub fn rating(&self) -> Option<f64> {
        self.0.get("rating").and_then(Value::as_f64)
    }

    /// Review body.
    pub fn text(&self) -> Option<&str> {
        self.0.get("text").and_then(Value::as_str)
    }

    /// Unix timestamp of the review, in seconds.
    pub fn time(&self) -> Option<i64> {
        self.0.get("time").and_then(Value::as_i64)
    }
}

impl From<Value> for Review {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Reviews for one place plus aggregate rating info.
///
/// This is both the normalized upstream result and the JSON body served by
/// `GET /reviews`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    /// Reviews in upstream order
    pub reviews: Vec<Review>,
    /// Total rating count (0 when upstream omits it)
    #[serde(rename = "totalReviews")]
    pub total_reviews: u64,
    /// Average rating (0 when upstream omits it)
    #[serde(rename = "averageRating")]
    pub average_rating: f64,
    /// Link where visitors can leave a review
    #[serde(rename = "leaveAReviewURL")]
    pub leave_review_url: String,
}

impl ReviewSnapshot {
    /// Creates a snapshot for `place`, deriving the review link from its id.
    pub fn new(
        place: &PlaceId,
        reviews: Vec<Review>,
        total_reviews: Option<u64>,
        average_rating: Option<f64>,
    ) -> Self {
        Self {
            reviews,
            total_reviews: total_reviews.unwrap_or(0),
            average_rating: average_rating.unwrap_or(0.0),
            leave_review_url: place.leave_review_url(),
        }
    }

    /// Number of reviews carried in this snapshot.
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    /// Returns true if the snapshot carries no reviews.
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// Response of a forced refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfirmation {
    /// Always [`REFRESH_CONFIRMATION_MESSAGE`]
    pub message: String,
    /// The snapshot now held in the cache
    pub reviews: ReviewSnapshot,
}

impl RefreshConfirmation {
    /// Wraps a freshly committed snapshot.
    pub fn new(reviews: ReviewSnapshot) -> Self {
        Self {
            message: REFRESH_CONFIRMATION_MESSAGE.to_string(),
            reviews,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn place() -> PlaceId {
        PlaceId::parse(Some("place123")).unwrap()
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let r1 = json!({"author_name": "Ada", "rating": 5, "text": "Great", "time": 1700000000});
        let snapshot = ReviewSnapshot::new(&place(), vec![Review(r1.clone())], Some(10), Some(4.5));

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "reviews": [r1],
                "totalReviews": 10,
                "averageRating": 4.5,
                "leaveAReviewURL": "https://search.google.com/local/writereview?placeid=place123"
            })
        );
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshot = ReviewSnapshot::new(&place(), vec![], None, None);
        assert_eq!(snapshot.total_reviews, 0);
        assert_eq!(snapshot.average_rating, 0.0);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_review_is_opaque() {
        let raw = json!({"unexpected": [1, 2, 3], "rating": "not a number"});
        let review: Review = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(review.rating(), None);
        assert_eq!(serde_json::to_value(&review).unwrap(), raw);
    }

    #[test]
    fn test_review_accessors() {
        let review = Review::from(json!({"author_name": "Ada", "rating": 4, "text": "ok", "time": 12}));
        assert_eq!(review.author_name(), Some("Ada"));
        assert_eq!(review.rating(), Some(4.0));
        assert_eq!(review.text(), Some("ok"));
        assert_eq!(review.time(), Some(12));
    }

    #[test]
    fn test_refresh_confirmation_shape() {
        let snapshot = ReviewSnapshot::new(&place(), vec![], Some(1), Some(5.0));
        let value = serde_json::to_value(RefreshConfirmation::new(snapshot)).unwrap();
        assert_eq!(value["message"], "Cache updated successfully");
        assert_eq!(value["reviews"]["totalReviews"], 1);
    }
}
