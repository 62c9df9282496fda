use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A cloned package repository as recorded in `repos.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    #[serde(rename = "remoteURL")]
    pub remote_url: String,
    #[serde(rename = "localPath")]
    pub local_path: PathBuf,
}

impl Repository {
    pub fn list_from_json_str(input: &str) -> serde_json::Result<Vec<Self>> {
        serde_json::from_str(input)
    }
}
