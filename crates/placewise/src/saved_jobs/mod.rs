//! Saved-job registry: a bookmark relation between a student and a posting.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{SavedJob, SavedJobId, SavedJobView};
pub use repository::SavedJobRepository;
pub use router::{saved_job_router, SavedJobRouterState};
pub use service::{SavedJobError, SavedJobService};
