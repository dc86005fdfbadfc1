use serde::{Deserialize, Serialize};

/// Response of `POST /images/upload`.
///
/// `status` is passed through untouched; the backend has used both numbers
/// and strings for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: serde_json::Value,
    #[serde(default)]
    pub data: Vec<String>,
}
