//! DMCA complaint DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /api/dmca/submit`.
///
/// Every field is optional at the serde level so that validation can report
/// all missing fields at once instead of failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmcaSubmission {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub copyright_owner: Option<String>,
    pub copyright_work_description: Option<String>,
    pub infringing_content: Option<String>,
    pub infringing_url: Option<String>,
    pub good_faith_statement: Option<bool>,
    pub accuracy_statement: Option<bool>,
    pub authorized_statement: Option<bool>,
    pub digital_signature: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    UnderReview,
    Resolved,
    Rejected,
}

/// A validated complaint as held by the intake store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DmcaComplaint {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub copyright_owner: String,
    pub copyright_work_description: String,
    pub infringing_content: String,
    pub infringing_url: String,
    pub good_faith_statement: bool,
    pub accuracy_statement: bool,
    pub authorized_statement: bool,
    pub digital_signature: String,
    pub status: ComplaintStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// What the submitter gets back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DmcaReceipt {
    pub complaint_id: Uuid,
    pub status: ComplaintStatus,
    pub submitted_at: DateTime<Utc>,
}

impl From<&DmcaComplaint> for DmcaReceipt {
    fn from(complaint: &DmcaComplaint) -> Self {
        Self {
            complaint_id: complaint.id,
            status: complaint.status,
            submitted_at: complaint.submitted_at,
        }
    }
}
