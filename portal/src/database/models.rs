//! Database models
//!
//! Rust structs representing the persisted records.
//! Field names serialize in camelCase so stored arrays keep their layout.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Engineering discipline a student belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "Computer Science Engineering")]
    Cse,
    #[serde(rename = "Mechanical Engineering")]
    Me,
    #[serde(rename = "Civil Engineering")]
    Ce,
    #[serde(rename = "Internet of Things Engineering")]
    Iot,
    #[serde(rename = "Electronics and Communication Engineering")]
    Ece,
    #[serde(rename = "Artificial Intelligence and Data Science Engineering")]
    Aids,
    #[serde(rename = "Artificial Intelligence and Machine Learning Engineering")]
    Aiml,
}

impl Branch {
    /// Every branch in form order; the first entry is the form default
    pub const ALL: [Branch; 7] = [
        Branch::Cse,
        Branch::Me,
        Branch::Ce,
        Branch::Iot,
        Branch::Ece,
        Branch::Aids,
        Branch::Aiml,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Branch::Cse => "Computer Science Engineering",
            Branch::Me => "Mechanical Engineering",
            Branch::Ce => "Civil Engineering",
            Branch::Iot => "Internet of Things Engineering",
            Branch::Ece => "Electronics and Communication Engineering",
            Branch::Aids => "Artificial Intelligence and Data Science Engineering",
            Branch::Aiml => "Artificial Intelligence and Machine Learning Engineering",
        }
    }
}

impl Default for Branch {
    fn default() -> Self {
        Branch::ALL[0]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Complaint lifecycle. Only ever moves from `Pending` to `Solved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    Solved,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplaintStatus::Pending => f.write_str("pending"),
            ComplaintStatus::Solved => f.write_str("solved"),
        }
    }
}

/// A student-submitted complaint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub student_name: String,
    pub branch: Branch,
    pub semester: u8,
    pub description: String,
    /// Self-contained `data:` URL of the attached photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_data_url: Option<String>,
    pub status: ComplaintStatus,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl Complaint {
    /// Build a fresh pending complaint with a new id stamped now
    pub fn submitted(req: NewComplaint) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_name: req.student_name,
            branch: req.branch,
            semester: req.semester,
            description: req.description,
            photo_data_url: req.photo_data_url,
            status: ComplaintStatus::Pending,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Fields a student supplies for a new complaint
#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub student_name: String,
    pub branch: Branch,
    pub semester: u8,
    pub description: String,
    pub photo_data_url: Option<String>,
}

/// Registered faculty account, identified by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub email: String,
    /// Argon2id PHC string, never the plain password
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complaint_serializes_with_stored_field_names() {
        let complaint = Complaint {
            id: "c-1".to_string(),
            student_name: "Asha".to_string(),
            branch: Branch::Cse,
            semester: 3,
            description: "Broken AC".to_string(),
            photo_data_url: None,
            status: ComplaintStatus::Pending,
            timestamp: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&complaint).unwrap();

        assert_eq!(value["studentName"], "Asha");
        assert_eq!(value["branch"], "Computer Science Engineering");
        assert_eq!(value["status"], "pending");
        assert!(value.get("photoDataUrl").is_none());
    }

    #[test]
    fn test_submitted_complaint_is_pending_with_unique_id() {
        let req = NewComplaint {
            student_name: "Asha".to_string(),
            branch: Branch::Cse,
            semester: 3,
            description: "Broken AC".to_string(),
            photo_data_url: None,
        };

        let first = Complaint::submitted(req.clone());
        let second = Complaint::submitted(req);

        assert_eq!(first.status, ComplaintStatus::Pending);
        assert_ne!(first.id, second.id);
        assert!(first.timestamp > 0);
    }

    #[test]
    fn test_branch_default_is_first_in_form_order() {
        assert_eq!(Branch::default(), Branch::Cse);
        assert_eq!(Branch::ALL.len(), 7);
    }

    #[test]
    fn test_branch_labels_match_serialized_names() {
        for branch in Branch::ALL {
            let encoded = serde_json::to_string(&branch).unwrap();
            assert_eq!(encoded, format!("\"{}\"", branch.label()));
        }
    }
}
