//! Raw entity records as they appear in replay log lines
//!
//! A baseline record (cycle 0) carries the full field set; a delta record for
//! a later cycle carries only the fields that changed. Everything except the
//! id is therefore optional, and merged records are produced by explicit
//! field overlay in [`crate::entity::Entity::merged`] rather than by reading
//! partial records directly.

use serde::{Deserialize, Serialize};

/// One entity as encoded in a log record's `Entities` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    pub id: u64,

    /// Entity type tag, e.g. `"Building"`, `"Road"`, `"Civilian"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Flat polygon outline `[x0, y0, x1, y1, ...]` in simulation space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apexes: Option<Vec<f32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,

    /// Remaining health of a human (0 = dead, 10000 = unhurt)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<u32>,

    /// Burial depth of a human trapped in rubble
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buriedness: Option<u32>,

    /// Clearing cost of a blockade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_cost: Option<u32>,

    /// Fire intensity of a building (0 = untouched)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieryness: Option<u32>,
}

impl RawRecord {
    /// Minimal record with just an id and a type tag
    pub fn tagged(id: u64, kind: &str) -> Self {
        Self {
            id,
            kind: Some(kind.to_string()),
            apexes: None,
            x: None,
            y: None,
            hp: None,
            buriedness: None,
            repair_cost: None,
            fieryness: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_deserialize() {
        let json = r#"{
            "Id": 42,
            "Kind": "Building",
            "Apexes": [0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0],
            "Fieryness": 2
        }"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.kind.as_deref(), Some("Building"));
        assert_eq!(record.apexes.as_ref().map(Vec::len), Some(8));
        assert_eq!(record.fieryness, Some(2));
        assert_eq!(record.hp, None);
    }

    #[test]
    fn test_delta_record_with_sparse_fields() {
        let json = r#"{"Id": 7, "X": 3.5, "Y": -2.0}"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.kind, None);
        assert_eq!(record.x, Some(3.5));
        assert_eq!(record.y, Some(-2.0));
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let record = RawRecord::tagged(1, "Road");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Kind\""));
        assert!(!json.contains("Apexes"));
        assert!(!json.contains("Hp"));
    }
}
