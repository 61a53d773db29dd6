//! AI advisory client
//!
//! Asks a generative text service for a one-line summary, a priority and
//! handling advice for a complaint. This is best-effort enrichment: every
//! failure is logged and reported to the caller as `None`.

use crate::config::{Config, ADVISOR_TIMEOUT, GEMINI_API_BASE};
use crate::database::Complaint;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Structured reply for one complaint. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    /// Expected to be Low, Medium or High, but not enforced
    pub priority: String,
    pub advice: String,
}

#[derive(Clone)]
pub struct AdvisorClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl AdvisorClient {
    pub fn new(config: &Config) -> Self {
        let endpoint = format!("{}/{}:generateContent", GEMINI_API_BASE, config.model);
        Self::with_endpoint(config.api_key.clone(), endpoint)
    }

    pub fn with_endpoint(api_key: Option<String>, endpoint: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(ADVISOR_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            api_key,
            endpoint,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Analyze a complaint. `None` means "no analysis available".
    pub async fn analyze(&self, complaint: &Complaint) -> Option<AnalysisResult> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("API key not configured; skipping analysis of {}", complaint.id);
            return None;
        };

        match self.generate(api_key, &build_prompt(complaint)).await {
            Ok(Some(text)) => {
                let parsed = parse_analysis(&text);
                if parsed.is_none() {
                    tracing::warn!("Unparseable analysis reply for {}", complaint.id);
                }
                parsed
            }
            Ok(None) => {
                tracing::warn!("Empty analysis reply for {}", complaint.id);
                None
            }
            Err(e) => {
                tracing::error!("Error analyzing complaint {}: {}", complaint.id, e);
                None
            }
        }
    }

    async fn generate(&self, api_key: &str, prompt: &str) -> Result<Option<String>> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING" },
                        "priority": { "type": "STRING" },
                        "advice": { "type": "STRING" }
                    },
                    "required": ["summary", "priority", "advice"]
                }
            }
        });

        let envelope: GenerateContentResponse = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.text())
    }
}

/// Prompt embedding the complaint's branch, semester and description
pub fn build_prompt(complaint: &Complaint) -> String {
    format!(
        "Analyze the following student complaint from a college environment.\n\
         Student Branch: {}\n\
         Semester: {}\n\
         Description: \"{}\"\n\n\
         Provide a JSON response with:\n\
         1. summary: A concise 1-sentence summary.\n\
         2. priority: Recommended priority (Low, Medium, or High).\n\
         3. advice: A brief suggestion for the teacher on how to handle this.",
        complaint.branch, complaint.semester, complaint.description
    )
}

/// Parse the model's JSON text. Blank or malformed text yields `None`.
pub fn parse_analysis(text: &str) -> Option<AnalysisResult> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
