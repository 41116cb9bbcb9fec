//! DMCA complaint intake
//!
//! Validates submissions and keeps accepted complaints in memory.

use std::sync::{Arc, LazyLock};

use chrono::Utc;
use regex::Regex;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ComplaintStatus, DmcaComplaint, DmcaSubmission};

pub const MIN_DESCRIPTION_LEN: usize = 20;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern is valid")
});

/// Collects validation failures in field order.
#[derive(Default)]
struct Problems(Vec<String>);

impl Problems {
    fn required(&mut self, value: &Option<String>, message: &str) -> String {
        match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => v.to_string(),
            None => {
                self.0.push(message.to_string());
                String::new()
            }
        }
    }

    fn confirmed(&mut self, value: Option<bool>, message: &str) -> bool {
        let confirmed = value == Some(true);
        if !confirmed {
            self.0.push(message.to_string());
        }
        confirmed
    }
}

/// Checks a submission and builds the complaint it describes.
///
/// Every problem is reported, joined with `", "`.
pub fn validate(submission: &DmcaSubmission) -> AppResult<DmcaComplaint> {
    let mut problems = Problems::default();

    let full_name = problems.required(&submission.full_name, "Full name is required");

    let email = problems
        .required(&submission.email, "Email is required")
        .to_lowercase();
    if !email.is_empty() && !EMAIL_RE.is_match(&email) {
        problems.0.push("Please provide a valid email".to_string());
    }

    let phone = problems.required(&submission.phone, "Phone number is required");
    let address = problems.required(&submission.address, "Address is required");
    let copyright_owner = problems.required(
        &submission.copyright_owner,
        "Copyright owner name is required",
    );

    let copyright_work_description = problems.required(
        &submission.copyright_work_description,
        "Description of copyrighted work is required",
    );
    if !copyright_work_description.is_empty()
        && copyright_work_description.chars().count() < MIN_DESCRIPTION_LEN
    {
        problems
            .0
            .push("Description must be at least 20 characters".to_string());
    }

    let infringing_content = problems.required(
        &submission.infringing_content,
        "Description of infringing content is required",
    );
    let infringing_url = problems.required(
        &submission.infringing_url,
        "URL of infringing content is required",
    );
    let good_faith_statement = problems.confirmed(
        submission.good_faith_statement,
        "You must confirm the good faith statement",
    );
    let accuracy_statement = problems.confirmed(
        submission.accuracy_statement,
        "You must confirm the accuracy statement",
    );
    let authorized_statement = problems.confirmed(
        submission.authorized_statement,
        "You must confirm you are authorized to act",
    );
    let digital_signature = problems.required(
        &submission.digital_signature,
        "Digital signature is required",
    );

    if !problems.0.is_empty() {
        return Err(AppError::Validation(problems.0.join(", ")));
    }

    Ok(DmcaComplaint {
        id: Uuid::new_v4(),
        full_name,
        email,
        phone,
        address,
        copyright_owner,
        copyright_work_description,
        infringing_content,
        infringing_url,
        good_faith_statement,
        accuracy_statement,
        authorized_statement,
        digital_signature,
        status: ComplaintStatus::Pending,
        admin_notes: None,
        submitted_at: Utc::now(),
    })
}

/// In-memory complaint store. Contents are lost on restart.
#[derive(Debug, Clone, Default)]
pub struct DmcaStore {
    complaints: Arc<RwLock<Vec<DmcaComplaint>>>,
}

impl DmcaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn submit(&self, submission: &DmcaSubmission) -> AppResult<DmcaComplaint> {
        let complaint = validate(submission)?;
        info!(complaint_id = %complaint.id, "DMCA complaint received");
        self.complaints.write().await.push(complaint.clone());
        Ok(complaint)
    }

    /// All complaints, newest first.
    pub async fn list(&self) -> Vec<DmcaComplaint> {
        let complaints = self.complaints.read().await;
        complaints.iter().rev().cloned().collect()
    }
}
