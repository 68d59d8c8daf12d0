//! Loading search hits from JSON documents
//!
//! Accepts either a bare array of hits or a search response object with a
//! `hits` array. Hits without an identifier are skipped and counted, never
//! fatal.

use crate::{DisasterAlert, ReliefError, ReliefResource, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

fn hits_of(document: serde_json::Value) -> Result<Vec<serde_json::Value>> {
    match document {
        serde_json::Value::Array(hits) => Ok(hits),
        serde_json::Value::Object(mut map) => match map.remove("hits") {
            Some(serde_json::Value::Array(hits)) => Ok(hits),
            _ => Err(ReliefError::UnsupportedLayout),
        },
        _ => Err(ReliefError::UnsupportedLayout),
    }
}

fn collect<T>(hits: Vec<serde_json::Value>, parse: impl Fn(serde_json::Value) -> Option<T>) -> Loaded<T> {
    let total = hits.len();
    let records: Vec<T> = hits.into_iter().filter_map(parse).collect();
    Loaded {
        skipped: total - records.len(),
        records,
    }
}

pub fn resources_from_hits(hits: Vec<serde_json::Value>) -> Loaded<ReliefResource> {
    collect(hits, ReliefResource::from_hit)
}

pub fn alerts_from_hits(hits: Vec<serde_json::Value>) -> Loaded<DisasterAlert> {
    collect(hits, DisasterAlert::from_hit)
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// Load relief resources from a JSON file
pub fn load_resources(path: impl AsRef<Path>) -> Result<Loaded<ReliefResource>> {
    let path = path.as_ref();
    info!("Loading relief resources from {:?}", path);

    let loaded = resources_from_hits(hits_of(read_document(path)?)?);

    info!(
        "Loaded {} relief resources ({} skipped as malformed)",
        loaded.records.len(),
        loaded.skipped
    );

    Ok(loaded)
}

/// Load disaster alerts from a JSON file
pub fn load_alerts(path: impl AsRef<Path>) -> Result<Loaded<DisasterAlert>> {
    let path = path.as_ref();
    info!("Loading disaster alerts from {:?}", path);

    let loaded = alerts_from_hits(hits_of(read_document(path)?)?);

    info!(
        "Loaded {} disaster alerts ({} skipped as malformed)",
        loaded.records.len(),
        loaded.skipped
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_resources_array() {
        let json = r#"[
            {"objectID": "1", "name": "Food Bank", "latitude": 40.0, "longitude": -74.0, "has_food": true},
            {"name": "No Id"},
            {"objectID": 3, "name": "Clinic", "has_medical": true}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = load_resources(file.path()).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.skipped, 1);
        assert_eq!(loaded.records[0].id, "1");
        assert_eq!(loaded.records[1].id, "3");
        assert!(loaded.records[1].location.is_none());
    }

    #[test]
    fn test_load_alerts_hits_object() {
        let json = r#"{
            "hits": [
                {"objectID": 1, "title": "Flood", "latitude": "25.8", "longitude": "68.5"}
            ],
            "nbHits": 1
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = load_alerts(file.path()).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert!(loaded.records[0].location.is_some());
    }

    #[test]
    fn test_unsupported_layout() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"results": []}"#).unwrap();

        assert!(matches!(
            load_resources(file.path()),
            Err(ReliefError::UnsupportedLayout)
        ));
    }
}
