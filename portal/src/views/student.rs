//! Student intake view
//!
//! Editing -> Submitting -> Submitted. The draft lives only as long as the
//! view; returning home drops it.

use crate::app::AppState;
use crate::config::{MAX_SEMESTER, MIN_SEMESTER, SUBMIT_DELAY};
use crate::database::{Branch, Complaint, NewComplaint};
use crate::error::{AppError, Result};
use crate::services::photos;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

pub const PHOTO_TOO_LARGE_ALERT: &str =
    "File is too large. Please upload an image smaller than 2MB.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakePhase {
    Editing,
    Submitting,
    Submitted,
}

/// Field values of the complaint being written
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeDraft {
    pub name: String,
    pub branch: Branch,
    pub semester: u8,
    pub description: String,
    pub photo: Option<String>,
}

impl Default for IntakeDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            branch: Branch::default(),
            semester: MIN_SEMESTER,
            description: String::new(),
            photo: None,
        }
    }
}

pub struct StudentIntake {
    state: AppState,
    draft: IntakeDraft,
    phase: IntakePhase,
    /// One-shot message about a rejected photo
    alert: Option<String>,
    /// Inline validation or save error
    error: Option<String>,
    submit_delay: Duration,
}

impl StudentIntake {
    pub fn new(state: AppState) -> Self {
        Self::with_submit_delay(state, SUBMIT_DELAY)
    }

    pub fn with_submit_delay(state: AppState, submit_delay: Duration) -> Self {
        Self {
            state,
            draft: IntakeDraft::default(),
            phase: IntakePhase::Editing,
            alert: None,
            error: None,
            submit_delay,
        }
    }

    pub fn phase(&self) -> IntakePhase {
        self.phase
    }

    pub fn draft(&self) -> &IntakeDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_branch(&mut self, branch: Branch) {
        self.draft.branch = branch;
    }

    pub fn set_semester(&mut self, semester: u8) -> Result<()> {
        if !(MIN_SEMESTER..=MAX_SEMESTER).contains(&semester) {
            return Err(AppError::Validation(format!(
                "Semester must be between {} and {}",
                MIN_SEMESTER, MAX_SEMESTER
            )));
        }
        self.draft.semester = semester;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Apply the outcome of a photo encoding.
    ///
    /// A rejected photo raises the alert and leaves the draft photo as it was.
    pub fn attach_photo(&mut self, encoded: Result<String>) {
        match encoded {
            Ok(data_url) => {
                self.draft.photo = Some(data_url);
                self.alert = None;
            }
            Err(AppError::PhotoTooLarge { .. }) => {
                self.alert = Some(PHOTO_TOO_LARGE_ALERT.to_string());
            }
            Err(e) => {
                tracing::warn!("Could not attach photo: {}", e);
                self.alert = Some(format!("Could not read the photo: {}", e));
            }
        }
    }

    /// Encode a photo file and attach it to the draft
    pub async fn capture_photo(&mut self, path: &Path) {
        let encoded = photos::encode_photo_file(path).await;
        self.attach_photo(encoded);
    }

    pub fn clear_photo(&mut self) {
        self.draft.photo = None;
    }

    /// Validate the draft and move to Submitting.
    ///
    /// Returns the complaint to be saved; the draft stays untouched on a
    /// validation error.
    pub fn begin_submit(&mut self) -> Result<Complaint> {
        if self.phase != IntakePhase::Editing {
            return Err(AppError::Validation("Complaint already submitted".to_string()));
        }

        let missing = if self.draft.name.trim().is_empty() {
            Some("Please enter your name.")
        } else if self.draft.description.trim().is_empty() {
            Some("Please describe your complaint.")
        } else {
            None
        };
        if let Some(message) = missing {
            self.error = Some(message.to_string());
            return Err(AppError::Validation(message.to_string()));
        }

        self.error = None;
        self.phase = IntakePhase::Submitting;

        Ok(Complaint::submitted(NewComplaint {
            student_name: self.draft.name.clone(),
            branch: self.draft.branch,
            semester: self.draft.semester,
            description: self.draft.description.clone(),
            photo_data_url: self.draft.photo.clone(),
        }))
    }

    /// Delayed save of a complaint, detached from the view so it can run
    /// on the runtime while the window keeps drawing
    pub fn persist(&self, complaint: Complaint) -> impl Future<Output = Result<()>> + Send + 'static {
        let complaints = self.state.complaints.clone();
        let delay = self.submit_delay;
        async move {
            tokio::time::sleep(delay).await;
            complaints.save_complaint(complaint).await
        }
    }

    /// Settle a submission started by [`begin_submit`](Self::begin_submit)
    pub fn finish_submit(&mut self, saved: Result<()>) {
        if self.phase != IntakePhase::Submitting {
            return;
        }
        match saved {
            Ok(()) => self.phase = IntakePhase::Submitted,
            Err(e) => {
                tracing::error!("Saving complaint failed: {}", e);
                self.error = Some(format!("Could not save your complaint: {}", e));
                self.phase = IntakePhase::Editing;
            }
        }
    }

    /// Full submission in one call: validate, wait, save
    pub async fn submit(&mut self) -> Result<()> {
        let complaint = self.begin_submit()?;
        let saved = self.persist(complaint).await;
        let outcome = match &saved {
            Ok(()) => Ok(()),
            Err(e) => Err(AppError::Generic(e.to_string())),
        };
        self.finish_submit(saved);
        outcome
    }
}
