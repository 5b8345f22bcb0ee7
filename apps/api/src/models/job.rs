use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting. Apart from `title` and `requiredSkills` the document is free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub doc: Map<String, Value>,
}

impl JobPosting {
    pub fn title(&self) -> Option<&str> {
        self.doc.get("title").and_then(|v| v.as_str())
    }

    pub fn required_skills(&self) -> Vec<&str> {
        self.doc
            .get("requiredSkills")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Result of a merge update, mirroring the matched/modified counts clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Overlays the top-level keys of `patch` onto `doc`. Keys absent from the patch
/// are left untouched. Returns whether any value changed.
pub fn apply_set(doc: &mut Map<String, Value>, patch: Map<String, Value>) -> bool {
    let mut changed = false;
    for (key, value) in patch {
        if key == "_id" || key == "id" {
            continue;
        }
        if doc.get(&key) != Some(&value) {
            doc.insert(key, value);
            changed = true;
        }
    }
    changed
}

/// One application of a user to a job. Never mutated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: String,
    pub job_id: Uuid,
    pub applied_at: DateTime<Utc>,
}
