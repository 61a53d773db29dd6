//! Teachers service
//!
//! Faculty registration and login against the stored teacher collection.
//! Email is the identity key and is compared case-sensitively.

use crate::config::TEACHERS_KEY;
use crate::crypto;
use crate::database::{Repository, Teacher};
use crate::error::Result;
use crate::storage::{Collection, Record};

impl Record for Teacher {
    fn record_key(&self) -> &str {
        &self.email
    }
}

/// Service for faculty accounts
#[derive(Clone)]
pub struct TeachersService {
    teachers: Collection<Teacher>,
}

impl TeachersService {
    pub fn new(repo: Repository) -> Self {
        Self {
            teachers: Collection::new(repo, TEACHERS_KEY),
        }
    }

    /// Every registered teacher in registration order
    pub async fn list_teachers(&self) -> Result<Vec<Teacher>> {
        self.teachers.all().await
    }

    /// Register a new teacher.
    ///
    /// Returns `None` when the email is already taken; nothing is written then.
    pub async fn register_teacher(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Teacher>> {
        if self.teachers.get(email).await?.is_some() {
            tracing::info!("Registration refused, email already registered: {}", email);
            return Ok(None);
        }

        let teacher = Teacher {
            name: name.to_string(),
            email: email.to_string(),
            password: crypto::hash_password(password)?,
        };

        if !self.teachers.append_unique(teacher.clone()).await? {
            return Ok(None);
        }

        tracing::info!("Registered teacher: {}", email);
        Ok(Some(teacher))
    }

    /// First teacher whose email and password both match exactly
    pub async fn verify_teacher(&self, email: &str, password: &str) -> Result<Option<Teacher>> {
        let teachers = self.teachers.all().await?;

        let found = teachers
            .into_iter()
            .filter(|t| t.email == email)
            .find(|t| crypto::verify_password(password, &t.password));

        match &found {
            Some(_) => tracing::info!("Teacher logged in: {}", email),
            None => tracing::info!("Login failed for: {}", email),
        }

        Ok(found)
    }
}
