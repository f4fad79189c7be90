//! Job catalog: postings owned by an approved company, moderated by admins,
//! searchable once approved and active.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    ExperienceLevel, Job, JobId, JobSearchQuery, JobStatus, JobType, SalaryPeriod, SalaryRange,
};
pub use repository::{JobFilter, JobRepository};
pub use router::{job_router, JobRouterState};
pub use service::{JobCatalogService, JobDraft, JobError, JobUpdate};
