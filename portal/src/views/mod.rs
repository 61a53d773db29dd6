//! Screen state machines
//!
//! Each screen owns its state for as long as it is shown and receives the
//! shared [`AppState`] when it is created. Rendering lives in `gui`.

pub mod dashboard;
pub mod student;
pub mod teacher;

pub use dashboard::{Dashboard, Notification};
pub use student::{IntakeDraft, IntakePhase, StudentIntake};
pub use teacher::{AuthForm, AuthMode, TeacherPortal};

use crate::app::AppState;

/// The screen currently mounted
pub enum Screen {
    Start,
    Student(StudentIntake),
    Teacher(TeacherPortal),
}

/// Root view switcher
pub struct RootView {
    state: AppState,
    screen: Screen,
}

impl RootView {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            screen: Screen::Start,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub fn is_start(&self) -> bool {
        matches!(self.screen, Screen::Start)
    }

    /// Open a fresh intake form. Only reachable from the start screen.
    pub fn open_student(&mut self) {
        if self.is_start() {
            tracing::debug!("Navigating to student intake");
            self.screen = Screen::Student(StudentIntake::new(self.state.clone()));
        }
    }

    /// Open a fresh teacher session. Only reachable from the start screen.
    pub fn open_teacher(&mut self) {
        if self.is_start() {
            tracing::debug!("Navigating to teacher portal");
            self.screen = Screen::Teacher(TeacherPortal::new(self.state.clone()));
        }
    }

    /// Return to the start screen, dropping the current screen's state
    pub fn back(&mut self) {
        if !self.is_start() {
            tracing::debug!("Navigating back to start");
        }
        self.screen = Screen::Start;
    }
}
