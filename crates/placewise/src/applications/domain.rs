use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::companies::domain::CompanyId;
use crate::identity::domain::{AccountId, ResumeRef};
use crate::jobs::domain::JobId;

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Where an application stands. Every status is reachable from every other:
/// the model deliberately imposes no transition table, so a recruiter can
/// reopen a rejection or un-hire without fighting the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Shortlisted,
    Interview,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Hired => "hired",
        }
    }

    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == value.trim().to_ascii_lowercase())
            .ok_or(())
    }
}

/// One entry of the append-only audit trail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub date: DateTime<Utc>,
    pub note: String,
}

/// A student's submission against a job. The company reference and resume
/// are snapshots taken at submission time, never re-derived afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job: JobId,
    pub applicant: AccountId,
    pub company: CompanyId,
    pub resume: ResumeRef,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub status_history: Vec<StatusChange>,
    pub applied_at: DateTime<Utc>,
}

impl Application {
    /// A freshly submitted application: status `pending` with the initial
    /// audit entry already in place.
    #[allow(clippy::too_many_arguments)]
    pub fn submitted(
        id: ApplicationId,
        job: JobId,
        applicant: AccountId,
        company: CompanyId,
        resume: ResumeRef,
        cover_letter: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            job,
            applicant,
            company,
            resume,
            cover_letter,
            status: ApplicationStatus::Pending,
            status_history: vec![StatusChange {
                status: ApplicationStatus::Pending,
                date: now,
                note: "Application submitted".to_string(),
            }],
            applied_at: now,
        }
    }

    /// Move to `status` and append the matching audit entry, keeping the
    /// invariant that the last history entry always equals the current
    /// status.
    pub fn record_status(
        &mut self,
        status: ApplicationStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) {
        let note = note
            .filter(|note| !note.trim().is_empty())
            .unwrap_or_else(|| format!("Status changed to {status}"));
        self.status = status;
        self.status_history.push(StatusChange {
            status,
            date: now,
            note,
        });
    }
}
