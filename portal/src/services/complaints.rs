//! Complaints service
//!
//! Owns the stored complaint collection. Complaints are appended on intake
//! and only ever change by moving from pending to solved.

use crate::config::COMPLAINTS_KEY;
use crate::database::{Complaint, ComplaintStatus, Repository};
use crate::error::Result;
use crate::storage::{Collection, Record};

impl Record for Complaint {
    fn record_key(&self) -> &str {
        &self.id
    }
}

/// Service for managing complaints
#[derive(Clone)]
pub struct ComplaintsService {
    complaints: Collection<Complaint>,
}

impl ComplaintsService {
    pub fn new(repo: Repository) -> Self {
        Self {
            complaints: Collection::new(repo, COMPLAINTS_KEY),
        }
    }

    /// Every complaint in submission order
    pub async fn list_complaints(&self) -> Result<Vec<Complaint>> {
        self.complaints.all().await
    }

    /// Complaints still waiting for a teacher, in submission order
    pub async fn list_pending(&self) -> Result<Vec<Complaint>> {
        let all = self.complaints.all().await?;
        Ok(all
            .into_iter()
            .filter(|c| c.status == ComplaintStatus::Pending)
            .collect())
    }

    /// Append a complaint. No dedup and no field validation happen here.
    pub async fn save_complaint(&self, complaint: Complaint) -> Result<()> {
        tracing::info!(
            "Saving complaint {} from {}",
            complaint.id,
            complaint.student_name
        );

        self.complaints.append(complaint).await
    }

    /// Set the status of the complaint with `id`.
    ///
    /// Unknown ids are ignored silently, and a solved complaint never goes
    /// back to pending.
    pub async fn set_complaint_status(&self, id: &str, status: ComplaintStatus) -> Result<()> {
        let changed = self
            .complaints
            .modify(id, |complaint| {
                if complaint.status == status {
                    return false;
                }
                if complaint.status == ComplaintStatus::Solved {
                    tracing::warn!("Ignoring attempt to reopen solved complaint {}", complaint.id);
                    return false;
                }
                complaint.status = status;
                true
            })
            .await?;

        if changed {
            tracing::info!("Complaint {} marked {}", id, status);
        } else {
            tracing::debug!("Status update for {} left collection unchanged", id);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{initialize_database, Branch, NewComplaint};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_service() -> (ComplaintsService, Repository) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        let repo = Repository::new(pool);
        (ComplaintsService::new(repo.clone()), repo)
    }

    fn complaint(name: &str) -> Complaint {
        Complaint::submitted(NewComplaint {
            student_name: name.to_string(),
            branch: Branch::Cse,
            semester: 3,
            description: "Broken AC".to_string(),
            photo_data_url: None,
        })
    }

    #[tokio::test]
    async fn test_save_and_list_complaint() {
        let (service, _repo) = create_test_service().await;
        let asha = complaint("Asha");

        service.save_complaint(asha.clone()).await.unwrap();

        let all = service.list_complaints().await.unwrap();
        assert_eq!(all, vec![asha]);
    }

    #[tokio::test]
    async fn test_stored_under_complaints_key() {
        let (service, repo) = create_test_service().await;

        service.save_complaint(complaint("Asha")).await.unwrap();

        let raw = repo.get_value(COMPLAINTS_KEY).await.unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed[0]["studentName"], "Asha");
        assert_eq!(parsed[0]["status"], "pending");
    }

    #[tokio::test]
    async fn test_set_status_is_idempotent() {
        let (service, _repo) = create_test_service().await;
        let asha = complaint("Asha");
        service.save_complaint(asha.clone()).await.unwrap();

        service
            .set_complaint_status(&asha.id, ComplaintStatus::Solved)
            .await
            .unwrap();
        let once = service.list_complaints().await.unwrap();

        service
            .set_complaint_status(&asha.id, ComplaintStatus::Solved)
            .await
            .unwrap();
        let twice = service.list_complaints().await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice[0].status, ComplaintStatus::Solved);
    }

    #[tokio::test]
    async fn test_set_status_unknown_id_leaves_collection_unchanged() {
        let (service, _repo) = create_test_service().await;
        service.save_complaint(complaint("Asha")).await.unwrap();
        let before = service.list_complaints().await.unwrap();

        service
            .set_complaint_status("no-such-id", ComplaintStatus::Solved)
            .await
            .unwrap();

        assert_eq!(service.list_complaints().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_solved_complaint_is_never_reopened() {
        let (service, _repo) = create_test_service().await;
        let asha = complaint("Asha");
        service.save_complaint(asha.clone()).await.unwrap();

        service
            .set_complaint_status(&asha.id, ComplaintStatus::Solved)
            .await
            .unwrap();
        service
            .set_complaint_status(&asha.id, ComplaintStatus::Pending)
            .await
            .unwrap();

        let all = service.list_complaints().await.unwrap();
        assert_eq!(all[0].status, ComplaintStatus::Solved);
    }

    #[tokio::test]
    async fn test_list_pending_filters_solved() {
        let (service, _repo) = create_test_service().await;
        let first = complaint("Asha");
        let second = complaint("Ravi");
        let third = complaint("Meena");
        for c in [&first, &second, &third] {
            service.save_complaint(c.clone()).await.unwrap();
        }

        service
            .set_complaint_status(&second.id, ComplaintStatus::Solved)
            .await
            .unwrap();

        let pending: Vec<String> = service
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.student_name)
            .collect();
        assert_eq!(pending, vec!["Asha", "Meena"]);
    }
}
