//! Teacher session view
//!
//! Login and registration forms in front of the [`Dashboard`]. The form
//! mode and the session are independent: toggling the form never touches
//! an open session, and logging out always lands on the login form.

use super::dashboard::Dashboard;
use crate::app::AppState;
use crate::config::FACULTY_EMAIL_MARKER;
use crate::error::Result;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials. Please try again.";
pub const EMAIL_DOMAIN_RULE: &str = "Email must contain \"seacollege\" to register as faculty.";
pub const ALREADY_REGISTERED: &str = "User already exists. Please login.";
pub const NAME_REQUIRED: &str = "Please enter your full name.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct TeacherPortal {
    state: AppState,
    mode: AuthMode,
    pub form: AuthForm,
    auth_error: Option<String>,
    session: Option<Dashboard>,
}

impl TeacherPortal {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            mode: AuthMode::Login,
            form: AuthForm::default(),
            auth_error: None,
            session: None,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn set_auth_error(&mut self, message: impl Into<String>) {
        self.auth_error = Some(message.into());
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.session.as_ref()
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut Dashboard> {
        self.session.as_mut()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Switch between login and registration, clearing any error
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.auth_error = None;
    }

    /// Submit the current form.
    ///
    /// Rejections end up in [`auth_error`](Self::auth_error); only storage
    /// failures are returned as errors.
    pub async fn submit_auth(&mut self) -> Result<()> {
        self.auth_error = None;

        let teacher = match self.mode {
            AuthMode::Login => {
                let found = self
                    .state
                    .teachers
                    .verify_teacher(&self.form.email, &self.form.password)
                    .await?;
                if found.is_none() {
                    self.auth_error = Some(INVALID_CREDENTIALS.to_string());
                }
                found
            }
            AuthMode::Register => {
                if let Some(rule) = self.registration_problem() {
                    self.auth_error = Some(rule.to_string());
                    return Ok(());
                }
                let created = self
                    .state
                    .teachers
                    .register_teacher(&self.form.name, &self.form.email, &self.form.password)
                    .await?;
                if created.is_none() {
                    self.auth_error = Some(ALREADY_REGISTERED.to_string());
                }
                created
            }
        };

        if let Some(teacher) = teacher {
            self.session = Some(Dashboard::open(self.state.clone(), teacher).await?);
            self.form.password.clear();
        }
        Ok(())
    }

    fn registration_problem(&self) -> Option<&'static str> {
        if self.form.name.trim().is_empty() {
            return Some(NAME_REQUIRED);
        }
        if !self
            .form
            .email
            .to_lowercase()
            .contains(FACULTY_EMAIL_MARKER)
        {
            return Some(EMAIL_DOMAIN_RULE);
        }
        None
    }

    /// End the session; dashboard data, analyses and notification go with it
    pub fn logout(&mut self) {
        if let Some(dashboard) = self.session.take() {
            tracing::info!("Teacher logged out: {}", dashboard.teacher().email);
        }
        self.mode = AuthMode::Login;
        self.form = AuthForm::default();
        self.auth_error = None;
    }
}
