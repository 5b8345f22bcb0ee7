use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// Fields of a resume document, as parsed from an upload or submitted as JSON.
///
/// Anything outside the four labeled fields and the file reference is kept
/// verbatim in `extra`, so JSON submissions round-trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<Uuid>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumeFields {
    /// Drops client-supplied identity keys; the store assigns the id.
    pub fn without_identity(mut self) -> Self {
        self.extra.remove("_id");
        self.extra.remove("id");
        self
    }

    /// Case-insensitive substring match against the name or any skill.
    /// An empty term matches every record.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        let name_hit = self
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle));
        name_hit || self.skills.iter().any(|s| s.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: ResumeFields,
}

/// Metadata for one uploaded file. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub original_name: String,
    pub mime_type: String,
    pub path: String,
    pub size: i64,
    pub upload_date: DateTime<Utc>,
}
