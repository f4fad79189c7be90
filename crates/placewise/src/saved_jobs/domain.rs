use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::domain::AccountId;
use crate::jobs::domain::{Job, JobId};

/// Identifier wrapper for bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SavedJobId(pub String);

/// A bookmark: at most one per (account, job) pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJob {
    pub id: SavedJobId,
    pub account: AccountId,
    pub job: JobId,
    pub created_at: DateTime<Utc>,
}

/// Listing entry with the bookmarked posting resolved. Bookmarks whose job
/// has since been deleted are skipped at read time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobView {
    pub id: SavedJobId,
    pub job: Job,
    pub created_at: DateTime<Utc>,
}
