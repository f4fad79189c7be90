use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::domain::AccountId;

/// Identifier wrapper for companies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Headcount bracket, serialized in the range notation the clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    UpTo10,
    #[serde(rename = "11-50")]
    UpTo50,
    #[serde(rename = "51-200")]
    UpTo200,
    #[serde(rename = "201-500")]
    UpTo500,
    #[serde(rename = "501-1000")]
    UpTo1000,
    #[serde(rename = "1000+")]
    Over1000,
}

impl Default for CompanySize {
    fn default() -> Self {
        CompanySize::UpTo10
    }
}

/// An employer organization. Each recruiter owns at most one; the name is
/// globally unique; only admins flip the approval flag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: String,
    pub website: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub industry: String,
    pub company_size: CompanySize,
    pub recruiter: AccountId,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}
