//! Local JSON persistence of working sets, id mappings and the debug-mode
//! import envelope.

use crate::error::Result;
use crate::model::Entity;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write a value as pretty-printed JSON, creating parent directories as
/// needed.
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a JSON file into a value.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// File written in debug mode instead of uploading: the entity sequence in
/// the shape the import endpoint would respond with.
#[derive(Debug, Serialize)]
pub struct ImportEnvelope {
    pub request: ImportRequest,
    pub response: ImportResponse,
}

#[derive(Debug, Serialize)]
pub struct ImportRequest {
    #[serde(rename = "returnRequest")]
    pub return_request: bool,
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "taskId")]
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub status: String,
    #[serde(rename = "totalRecords")]
    pub total_records: usize,
    pub entities: Vec<Entity>,
}

impl ImportEnvelope {
    /// Envelope for a debug run: success status, `debug` request/task ids.
    pub fn debug(entities: Vec<Entity>) -> Self {
        Self {
            request: ImportRequest {
                return_request: false,
                request_id: "debug".to_string(),
                task_id: "debug".to_string(),
            },
            response: ImportResponse {
                status: "success".to_string(),
                total_records: entities.len(),
                entities,
            },
        }
    }
}
