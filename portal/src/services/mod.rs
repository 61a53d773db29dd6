//! Services module
//!
//! Business logic services that coordinate between views and storage.

pub mod advisor;
pub mod complaints;
pub mod photos;
pub mod teachers;

pub use advisor::{AdvisorClient, AnalysisResult};
pub use complaints::ComplaintsService;
pub use teachers::TeachersService;
