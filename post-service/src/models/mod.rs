/// Data models for post-service
///
/// This module defines:
/// - `Post`: a document in the posts collection
/// - `SortOrder`: the orderings accepted by the listing endpoint
use mongodb::bson::serde_helpers::{
    bson_datetime_as_rfc3339_string, serialize_object_id_as_hex_string,
};
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Deserializer, Serialize};

/// A post document.
///
/// `_id`, `createdAt`, and the `likes` default are store-assigned; everything
/// else is caller-supplied content stored verbatim, so the remaining fields
/// live in an open `Document` flattened into the JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,

    /// Like counter. Non-negative, only ever incremented.
    #[serde(default)]
    pub likes: i64,

    #[serde(
        rename = "createdAt",
        serialize_with = "bson_datetime_as_rfc3339_string::serialize"
    )]
    pub created_at: DateTime,

    /// Arbitrary application-defined content.
    #[serde(flatten)]
    pub content: Document,
}

/// Ordering applied by the listing endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first by creation time. The default ordering.
    #[default]
    Recent,
    /// Oldest first by creation time.
    Oldest,
    /// Most-liked first.
    Popular,
    /// One uniformly random page in the collection's natural order.
    Random,
}

impl SortOrder {
    /// Parse a query-parameter value. Unrecognized values fall back to
    /// [`SortOrder::Recent`].
    pub fn from_param(value: &str) -> Self {
        match value {
            "recent" => SortOrder::Recent,
            "oldest" => SortOrder::Oldest,
            "popular" => SortOrder::Popular,
            "random" => SortOrder::Random,
            _ => SortOrder::Recent,
        }
    }

    /// Sort criteria for the ranked orderings. `Random` has none; sampled
    /// pages are read in the collection's natural order.
    pub fn sort_doc(self) -> Option<Document> {
        match self {
            SortOrder::Recent => Some(doc! { "createdAt": -1 }),
            SortOrder::Oldest => Some(doc! { "createdAt": 1 }),
            SortOrder::Popular => Some(doc! { "likes": -1 }),
            SortOrder::Random => None,
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(SortOrder::from_param(&value))
    }
}
