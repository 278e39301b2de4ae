use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value as Json;
use std::path::Path;

use super::{SquadMember, StatsSource};

/// Player records saved from earlier API responses, served without the network
#[derive(Debug, Clone, Default)]
pub struct SavedRecords {
    records: Vec<(String, Json)>,
}

impl SavedRecords {
    pub fn new(records: Vec<(String, Json)>) -> Self {
        Self { records }
    }

    /// Load a JSON file holding one player record or an array of them. Each record is
    /// keyed by its `uid` field, falling back to its position in the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read player records: {:?}", path))?;
        let json: Json = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse player records: {:?}", path))?;

        let items = match json {
            Json::Array(items) => items,
            Json::Object(_) => vec![json],
            other => bail!("Expected a player record or an array of records, found {}", other),
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                let uid = record
                    .get("uid")
                    .and_then(Json::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("record-{}", i));
                (uid, record)
            })
            .collect();

        Ok(Self { records })
    }

    pub fn uids(&self) -> Vec<String> {
        self.records.iter().map(|(uid, _)| uid.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StatsSource for SavedRecords {
    fn fetch_squad_list(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn fetch_squad_members(&self, _squad: &str) -> Result<Vec<SquadMember>> {
        Ok(Vec::new())
    }

    fn fetch_player(&self, uid: &str) -> Result<Json> {
        self.records
            .iter()
            .find(|(id, _)| id == uid)
            .map(|(_, record)| record.clone())
            .ok_or_else(|| anyhow!("No saved record for player {}", uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_file_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"uid": "u1", "nick": "a"}}, {{"nick": "b"}}]"#).unwrap();

        let records = SavedRecords::from_file(file.path()).unwrap();
        assert_eq!(records.uids(), vec!["u1".to_string(), "record-1".to_string()]);
        assert_eq!(records.fetch_player("record-1").unwrap()["nick"], "b");
    }

    #[test]
    fn test_from_file_single_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"uid": "solo"}}"#).unwrap();
        assert_eq!(SavedRecords::from_file(file.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_player_is_an_error() {
        assert!(SavedRecords::default().fetch_player("nobody").is_err());
    }
}
