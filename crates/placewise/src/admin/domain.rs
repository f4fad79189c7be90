use serde::Serialize;

use crate::applications::domain::{Application, ApplicationStatus};
use crate::identity::domain::Account;
use crate::jobs::domain::{Job, JobType};

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub total_users: u64,
    pub total_students: u64,
    pub total_recruiters: u64,
    pub total_jobs: u64,
    pub active_jobs: u64,
    pub pending_jobs: u64,
    pub total_companies: u64,
    pub approved_companies: u64,
    pub pending_companies: u64,
    pub total_applications: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusBreakdown {
    pub status: ApplicationStatus,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeBreakdown {
    pub job_type: JobType,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: DashboardOverview,
    pub recent_users: Vec<Account>,
    pub recent_jobs: Vec<Job>,
    pub recent_applications: Vec<Application>,
    pub applications_by_status: Vec<StatusBreakdown>,
    pub jobs_by_type: Vec<TypeBreakdown>,
}
