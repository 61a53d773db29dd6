//! Application configuration
//!
//! Central location for storage keys, resource limits and timing constants,
//! plus the small amount of configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

// ===== Storage Keys =====

/// Key of the JSON array holding every complaint
pub const COMPLAINTS_KEY: &str = "seacollege_complaints";
/// Key of the JSON array holding every registered teacher
pub const TEACHERS_KEY: &str = "seacollege_teachers";

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "portal.db";

/// Directory name created under the platform data directory
pub const APP_DIR_NAME: &str = "seacollege-voice";

// ===== Intake Limits =====

/// Largest accepted photo, in raw bytes before encoding
pub const MAX_PHOTO_BYTES: u64 = 2_000_000;

/// Valid semesters run from 1 to 8 inclusive
pub const MIN_SEMESTER: u8 = 1;
pub const MAX_SEMESTER: u8 = 8;

/// Cosmetic delay before a submitted complaint is saved
pub const SUBMIT_DELAY: Duration = Duration::from_millis(800);

// ===== Faculty =====

/// Registration requires this marker somewhere in the email (case-insensitive)
pub const FACULTY_EMAIL_MARKER: &str = "seacollege";

/// How long the "complaint resolved" toast stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

// ===== AI Advisory Service =====

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Upper bound on a single analysis request
pub const ADVISOR_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime configuration assembled from the environment.
///
/// Nothing here is mandatory: a missing API key only disables AI analysis,
/// and a missing data directory falls back to the platform default.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = non_empty_var("API_KEY").or_else(|| non_empty_var("GEMINI_API_KEY"));
        if api_key.is_none() {
            tracing::warn!("API_KEY not found in environment variables; AI analysis disabled");
        }

        let model = non_empty_var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let data_dir = non_empty_var("SEACOLLEGE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Self {
            api_key,
            model,
            data_dir,
        }
    }

    /// Path of the SQLite database backing the persistence store
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
