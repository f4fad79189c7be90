use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use thiserror::Error;

use crate::identity::domain::AccountId;
use crate::jobs::domain::JobId;
use crate::jobs::repository::JobRepository;
use crate::store::RepositoryError;

use super::domain::{SavedJob, SavedJobId, SavedJobView};
use super::repository::SavedJobRepository;

static SAVED_JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_saved_job_id() -> SavedJobId {
    let id = SAVED_JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SavedJobId(format!("save-{id:06}"))
}

#[derive(Debug, Error)]
pub enum SavedJobError {
    #[error("Job not found")]
    JobNotFound,
    #[error("Job already saved")]
    AlreadySaved,
    #[error("Saved job not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SavedJobError {
    pub fn status(&self) -> StatusCode {
        match self {
            SavedJobError::JobNotFound | SavedJobError::NotFound => StatusCode::NOT_FOUND,
            SavedJobError::AlreadySaved => StatusCode::CONFLICT,
            SavedJobError::Repository(err) => err.status(),
        }
    }
}

pub struct SavedJobService {
    saved_jobs: Arc<dyn SavedJobRepository>,
    jobs: Arc<dyn JobRepository>,
}

impl SavedJobService {
    pub fn new(saved_jobs: Arc<dyn SavedJobRepository>, jobs: Arc<dyn JobRepository>) -> Self {
        Self { saved_jobs, jobs }
    }

    pub fn save(&self, account: &AccountId, job: &JobId) -> Result<SavedJob, SavedJobError> {
        if self.jobs.fetch(job)?.is_none() {
            return Err(SavedJobError::JobNotFound);
        }

        let bookmark = SavedJob {
            id: next_saved_job_id(),
            account: account.clone(),
            job: job.clone(),
            created_at: Utc::now(),
        };
        self.saved_jobs.insert(bookmark).map_err(|err| match err {
            RepositoryError::Conflict => SavedJobError::AlreadySaved,
            other => other.into(),
        })
    }

    pub fn unsave(&self, account: &AccountId, job: &JobId) -> Result<(), SavedJobError> {
        self.saved_jobs.remove(account, job).map_err(|err| match err {
            RepositoryError::NotFound => SavedJobError::NotFound,
            other => other.into(),
        })
    }

    /// Bookmarks with their postings resolved; entries pointing at a deleted
    /// job are dropped rather than surfaced as dangling references.
    pub fn list(&self, account: &AccountId) -> Result<Vec<SavedJobView>, SavedJobError> {
        let mut views = Vec::new();
        for saved in self.saved_jobs.list_for_account(account)? {
            if let Some(job) = self.jobs.fetch(&saved.job)? {
                views.push(SavedJobView {
                    id: saved.id,
                    job,
                    created_at: saved.created_at,
                });
            }
        }
        Ok(views)
    }

    /// Pure query; never errors, even for unknown jobs.
    pub fn is_saved(&self, account: &AccountId, job: &JobId) -> Result<bool, SavedJobError> {
        Ok(self.saved_jobs.exists(account, job)?)
    }
}
