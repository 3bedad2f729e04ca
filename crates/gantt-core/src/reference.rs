use crate::record::RawRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used when a referenced record or its display field is missing.
pub const UNKNOWN: &str = "Unknown";

/// `record id -> display name` for one linked table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceMap(BTreeMap<String, String>);

impl ReferenceMap {
    /// Map every record's id to its `name_field` text, or `"Unknown"` when the
    /// field is absent or not text.
    pub fn build(records: &[RawRecord], name_field: &str) -> Self {
        let map = records
            .iter()
            .map(|r| {
                let name = r.text(name_field).unwrap_or(UNKNOWN);
                (r.id.clone(), name.to_string())
            })
            .collect();
        Self(map)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Display name for `id`, `"Unknown"` when the id is not in the map.
    pub fn label(&self, id: &str) -> &str {
        self.get(id).unwrap_or(UNKNOWN)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for ReferenceMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
