//! Newline-delimited JSON replay log decoding
//!
//! A log is one JSON object per line; blank lines are ignored. The first
//! record carries the run metadata and the complete world state, every later
//! record carries only the entities that changed that cycle.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{ReplayError, Result};
use crate::entity::record::RawRecord;

/// Run metadata carried by the first log record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_name: Option<String>,

    /// Index of the last cycle; filled in during the baseline scan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_cycle: Option<usize>,

    /// Remaining metadata, passed through untouched for host-side display
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One decoded log line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<RawRecord>>,
}

/// A fully decoded replay log
#[derive(Debug, Clone)]
pub struct ReplayLog {
    records: Vec<LogRecord>,
}

impl ReplayLog {
    /// Decode log text. Fails on the first malformed line, or when the first
    /// record carries no entity list.
    pub fn parse(text: &str) -> Result<Self> {
        let mut records = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: LogRecord =
                serde_json::from_str(line).map_err(|source| ReplayError::MalformedRecord {
                    line: index + 1,
                    source,
                })?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(ReplayError::UnsupportedInput(
                "log contains no records".into(),
            ));
        }
        if records[0].entities.is_none() {
            return Err(ReplayError::UnsupportedInput(
                "first record carries no entity list".into(),
            ));
        }
        Ok(Self { records })
    }

    /// Total number of cycles, baseline included
    pub fn cycles(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Entity records for one cycle; empty when the record carried none
    pub fn entities(&self, cycle: usize) -> &[RawRecord] {
        self.records
            .get(cycle)
            .and_then(|record| record.entities.as_deref())
            .unwrap_or(&[])
    }

    /// Metadata from the first record, when present
    pub fn info(&self) -> Option<&Info> {
        self.records.first().and_then(|record| record.info.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"Info":{"TeamName":"Rescue","MapName":"Kobe"},"Entities":[{"Id":1,"Kind":"Road"}]}

{"Entities":[{"Id":1,"Kind":"Road"}]}
"#;

    #[test]
    fn test_parse_skips_blank_lines() {
        let log = ReplayLog::parse(MINIMAL).unwrap();
        assert_eq!(log.cycles(), 2);
        assert_eq!(log.entities(0).len(), 1);
        assert_eq!(log.entities(1).len(), 1);
    }

    #[test]
    fn test_info_fields_decode() {
        let log = ReplayLog::parse(MINIMAL).unwrap();
        let info = log.info().unwrap();
        assert_eq!(info.team_name.as_deref(), Some("Rescue"));
        assert_eq!(info.map_name.as_deref(), Some("Kobe"));
        assert_eq!(info.last_cycle, None);
    }

    #[test]
    fn test_unknown_info_fields_are_preserved() {
        let text = r#"{"Info":{"TeamName":"A","ScoreKind":"standard"},"Entities":[]}"#;
        let log = ReplayLog::parse(text).unwrap();
        let info = log.info().unwrap();
        assert_eq!(info.extra.get("ScoreKind").unwrap(), "standard");
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let text = "{\"Entities\":[]}\nnot json\n";
        match ReplayLog::parse(text) {
            Err(ReplayError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_log_rejected() {
        assert!(matches!(
            ReplayLog::parse("\n\n"),
            Err(ReplayError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_first_record_without_entities_rejected() {
        let text = r#"{"Info":{"TeamName":"A"}}"#;
        assert!(matches!(
            ReplayLog::parse(text),
            Err(ReplayError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn test_delta_without_entities_is_tolerated() {
        let text = "{\"Entities\":[]}\n{}\n";
        let log = ReplayLog::parse(text).unwrap();
        assert_eq!(log.cycles(), 2);
        assert!(log.entities(1).is_empty());
    }
}
