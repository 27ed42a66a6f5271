//! Database types shared by the reader, merger and publisher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Screen orientation in degrees (0/90/180/270)
pub type Degrees = u16;

/// Set name -> rotation, as fetched from the remote rotation list
pub type RotationTable = BTreeMap<String, Degrees>;

/// Set name -> record. `BTreeMap` keeps keys sorted for serialization.
pub type Database = BTreeMap<String, SetRecord>;

/// Metadata for one arcade set.
///
/// Fields are declared in lexicographic order so the serialized object has
/// sorted keys. Absent attributes are omitted from the JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootleg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homebrew: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Degrees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl SetRecord {
    /// Record holding only a rotation, as created by the rotation backfill
    pub fn with_rotation(rotation: Degrees) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
