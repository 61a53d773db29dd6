//! Faculty dashboard
//!
//! Lists pending complaints for a logged-in teacher, runs AI analysis on
//! demand and marks complaints solved. Everything here is dropped on logout.

use crate::app::AppState;
use crate::config::NOTIFICATION_TTL;
use crate::database::{Complaint, ComplaintStatus, Teacher};
use crate::error::Result;
use crate::services::{AdvisorClient, AnalysisResult};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Transient on-screen message
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    raised_at: Instant,
}

pub struct Dashboard {
    state: AppState,
    /// Distinguishes this login from any later one, so late results from a
    /// previous session can be told apart
    session: Uuid,
    teacher: Teacher,
    pending: Vec<Complaint>,
    analyses: HashMap<String, AnalysisResult>,
    in_flight: HashSet<String>,
    notification: Option<Notification>,
    /// Last failed action, shown above the list
    error: Option<String>,
}

impl Dashboard {
    /// Enter the dashboard for `teacher` and load the pending list
    pub async fn open(state: AppState, teacher: Teacher) -> Result<Self> {
        let mut dashboard = Self {
            state,
            session: Uuid::new_v4(),
            teacher,
            pending: Vec::new(),
            analyses: HashMap::new(),
            in_flight: HashSet::new(),
            notification: None,
            error: None,
        };
        dashboard.reload().await?;
        Ok(dashboard)
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn teacher(&self) -> &Teacher {
        &self.teacher
    }

    pub fn pending(&self) -> &[Complaint] {
        &self.pending
    }

    pub fn analysis(&self, id: &str) -> Option<&AnalysisResult> {
        self.analyses.get(id)
    }

    pub fn is_analyzing(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Client for running an analysis off the UI thread
    pub fn advisor(&self) -> AdvisorClient {
        self.state.advisor.clone()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Re-read the store and keep only pending complaints
    pub async fn reload(&mut self) -> Result<()> {
        self.pending = self.state.complaints.list_pending().await?;
        tracing::debug!("Dashboard shows {} pending complaints", self.pending.len());
        Ok(())
    }

    /// Claim an analysis slot for `id`.
    ///
    /// Returns the complaint to analyze, or `None` when a result is already
    /// cached, a request for it is in flight, or it is not pending.
    pub fn begin_analysis(&mut self, id: &str) -> Option<Complaint> {
        if self.analyses.contains_key(id) || self.in_flight.contains(id) {
            return None;
        }
        let complaint = self.pending.iter().find(|c| c.id == id)?.clone();
        self.in_flight.insert(id.to_string());
        Some(complaint)
    }

    /// Record the outcome of an analysis. `None` leaves the action available
    /// for another try.
    pub fn finish_analysis(&mut self, id: &str, result: Option<AnalysisResult>) {
        self.in_flight.remove(id);
        match result {
            Some(result) => {
                self.analyses.insert(id.to_string(), result);
            }
            None => tracing::info!("No analysis available for {}", id),
        }
    }

    /// Run the whole analysis round trip for one complaint
    pub async fn analyze(&mut self, id: &str) {
        let Some(complaint) = self.begin_analysis(id) else {
            return;
        };
        let result = self.state.advisor.analyze(&complaint).await;
        self.finish_analysis(id, result);
    }

    /// Mark a complaint solved, refresh the list and raise a notification.
    ///
    /// A storage failure is also kept in [`error`](Self::error) and the card
    /// stays on the list.
    pub async fn mark_solved(&mut self, id: &str) -> Result<()> {
        let student = self
            .pending
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.student_name.clone());

        if let Err(e) = self.resolve(id).await {
            tracing::error!("Marking {} solved failed: {}", id, e);
            self.error = Some(format!("Could not mark the complaint as solved: {}", e));
            return Err(e);
        }
        self.error = None;
        self.analyses.remove(id);

        if let Some(student) = student {
            self.notification = Some(Notification {
                message: format!("Notification sent: Complaint by {} resolved.", student),
                raised_at: Instant::now(),
            });
        }
        Ok(())
    }

    async fn resolve(&mut self, id: &str) -> Result<()> {
        self.state
            .complaints
            .set_complaint_status(id, ComplaintStatus::Solved)
            .await?;
        self.reload().await
    }

    /// Drop the notification once it has been shown long enough
    pub fn dismiss_expired(&mut self, now: Instant) {
        if self.notification_remaining(now) == Some(Duration::ZERO) {
            self.notification = None;
        }
    }

    /// Time left before the current notification is dismissed
    pub fn notification_remaining(&self, now: Instant) -> Option<Duration> {
        let notification = self.notification.as_ref()?;
        let shown = now.saturating_duration_since(notification.raised_at);
        Some(NOTIFICATION_TTL.saturating_sub(shown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, Branch, NewComplaint, Repository};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        AppState::new(
            Repository::new(pool),
            AdvisorClient::with_endpoint(None, String::new()),
        )
    }

    fn teacher() -> Teacher {
        Teacher {
            name: "Anita".to_string(),
            email: "a@seacollege.edu".to_string(),
            password: String::new(),
        }
    }

    async fn seed(state: &AppState, name: &str) -> Complaint {
        let complaint = Complaint::submitted(NewComplaint {
            student_name: name.to_string(),
            branch: Branch::Me,
            semester: 2,
            description: format!("{}'s issue", name),
            photo_data_url: None,
        });
        state.complaints.save_complaint(complaint.clone()).await.unwrap();
        complaint
    }

    fn result(priority: &str) -> AnalysisResult {
        AnalysisResult {
            summary: "Summary".to_string(),
            priority: priority.to_string(),
            advice: "Advice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_shows_only_pending() {
        let state = create_test_state().await;
        let asha = seed(&state, "Asha").await;
        let ravi = seed(&state, "Ravi").await;
        state
            .complaints
            .set_complaint_status(&asha.id, ComplaintStatus::Solved)
            .await
            .unwrap();

        let dashboard = Dashboard::open(state, teacher()).await.unwrap();

        assert_eq!(dashboard.pending(), &[ravi][..]);
    }

    #[tokio::test]
    async fn test_concurrent_analyses_are_tracked_per_complaint() {
        let state = create_test_state().await;
        let asha = seed(&state, "Asha").await;
        let ravi = seed(&state, "Ravi").await;
        let mut dashboard = Dashboard::open(state, teacher()).await.unwrap();

        assert!(dashboard.begin_analysis(&asha.id).is_some());
        assert!(dashboard.begin_analysis(&ravi.id).is_some());
        assert!(dashboard.is_analyzing(&asha.id));
        assert!(dashboard.is_analyzing(&ravi.id));

        // Same complaint cannot be requested twice while in flight
        assert!(dashboard.begin_analysis(&asha.id).is_none());

        dashboard.finish_analysis(&ravi.id, Some(result("High")));
        assert!(dashboard.is_analyzing(&asha.id));
        assert!(!dashboard.is_analyzing(&ravi.id));
        assert_eq!(dashboard.analysis(&ravi.id).unwrap().priority, "High");
    }

    #[tokio::test]
    async fn test_cached_result_is_not_requested_again() {
        let state = create_test_state().await;
        let asha = seed(&state, "Asha").await;
        let mut dashboard = Dashboard::open(state, teacher()).await.unwrap();

        dashboard.begin_analysis(&asha.id).unwrap();
        dashboard.finish_analysis(&asha.id, Some(result("Low")));

        assert!(dashboard.begin_analysis(&asha.id).is_none());
    }

    #[tokio::test]
    async fn test_failed_analysis_can_be_retried() {
        let state = create_test_state().await;
        let asha = seed(&state, "Asha").await;
        let mut dashboard = Dashboard::open(state, teacher()).await.unwrap();

        dashboard.analyze(&asha.id).await;

        assert!(dashboard.analysis(&asha.id).is_none());
        assert!(!dashboard.is_analyzing(&asha.id));
        assert!(dashboard.begin_analysis(&asha.id).is_some());
    }

    #[tokio::test]
    async fn test_unknown_complaint_is_not_analyzed() {
        let state = create_test_state().await;
        let mut dashboard = Dashboard::open(state, teacher()).await.unwrap();

        assert!(dashboard.begin_analysis("missing").is_none());
    }

    #[tokio::test]
    async fn test_mark_solved_removes_card_and_notifies() {
        let state = create_test_state().await;
        let asha = seed(&state, "Asha").await;
        let mut dashboard = Dashboard::open(state.clone(), teacher()).await.unwrap();

        dashboard.mark_solved(&asha.id).await.unwrap();

        assert!(dashboard.pending().is_empty());
        let message = &dashboard.notification().unwrap().message;
        assert_eq!(message, "Notification sent: Complaint by Asha resolved.");

        let stored = state.complaints.list_complaints().await.unwrap();
        assert_eq!(stored[0].status, ComplaintStatus::Solved);
    }

    #[tokio::test]
    async fn test_failed_resolve_is_shown_and_card_kept() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_database(&pool).await.unwrap();
        let state = AppState::new(
            Repository::new(pool.clone()),
            AdvisorClient::with_endpoint(None, String::new()),
        );
        let asha = seed(&state, "Asha").await;
        let mut dashboard = Dashboard::open(state, teacher()).await.unwrap();

        pool.close().await;
        let outcome = dashboard.mark_solved(&asha.id).await;

        assert!(outcome.is_err());
        assert!(dashboard
            .error()
            .unwrap()
            .starts_with("Could not mark the complaint as solved"));
        assert_eq!(dashboard.pending().len(), 1);
        assert!(dashboard.notification().is_none());
    }

    #[tokio::test]
    async fn test_notification_expires_after_ttl() {
        let state = create_test_state().await;
        let asha = seed(&state, "Asha").await;
        let mut dashboard = Dashboard::open(state, teacher()).await.unwrap();
        dashboard.mark_solved(&asha.id).await.unwrap();

        dashboard.dismiss_expired(Instant::now());
        assert!(dashboard.notification().is_some());

        dashboard.dismiss_expired(Instant::now() + NOTIFICATION_TTL + Duration::from_millis(1));
        assert!(dashboard.notification().is_none());
    }
}
