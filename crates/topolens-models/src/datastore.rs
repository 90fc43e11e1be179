//! Registered data-store items.
//!
//! The server component exposes its registered storage backends through the
//! `data/findItems` admin endpoint, one query per store kind. Each returned
//! item is tagged with the [`StoreType`] of the query that found it so
//! downstream consumers can distinguish provenance.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ModelError;

/// Kind of storage backend registered with the server component.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StoreType {
    /// A plain file share (queried as `folder` items under `/fileShares`).
    FileShare,
    /// A big-data file share.
    BigDataFileShare,
    /// A cloud store (S3, Azure blob, ...).
    CloudStore,
    /// A NoSQL database.
    #[serde(rename = "noSQLDatabase")]
    #[strum(serialize = "noSQLDatabase")]
    NoSqlDatabase,
    /// A raster store.
    RasterStore,
    /// An object store.
    ObjectStore,
}

impl FromStr for StoreType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fileShare" => Ok(Self::FileShare),
            "bigDataFileShare" => Ok(Self::BigDataFileShare),
            "cloudStore" => Ok(Self::CloudStore),
            "noSQLDatabase" => Ok(Self::NoSqlDatabase),
            "rasterStore" => Ok(Self::RasterStore),
            "objectStore" => Ok(Self::ObjectStore),
            other => Err(ModelError::UnknownStoreType {
                value: other.to_string(),
            }),
        }
    }
}

/// One registered data-store item, as returned by `data/findItems`.
///
/// `id` and `path` are lifted out of the provider payload; everything else
/// the provider reported is preserved verbatim in `extra` and flattened back
/// on serialisation, so the wire shape is the raw item plus a `storeType`
/// tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStoreItem {
    /// Stable item identifier.
    #[serde(default)]
    pub id: String,
    /// Registration path (e.g. `/rasterStores/my_store`).
    #[serde(default)]
    pub path: String,
    /// Which of the six store queries found this item.
    pub store_type: StoreType,
    /// Raw provider payload (minus the lifted fields).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DataStoreItem {
    /// Tag a raw `findItems` item with the store type that found it.
    ///
    /// Returns `None` when the payload is not a JSON object.
    pub fn from_raw(raw: serde_json::Value, store_type: StoreType) -> Option<Self> {
        let mut extra = match raw {
            serde_json::Value::Object(map) => map,
            _ => return None,
        };
        let id = take_string(&mut extra, "id").unwrap_or_default();
        let path = take_string(&mut extra, "path").unwrap_or_default();
        Some(Self {
            id,
            path,
            store_type,
            extra,
        })
    }
}

fn take_string(map: &mut serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => {
            // Put non-string values back untouched.
            map.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}
