use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::companies::domain::CompanyId;

/// Identifier wrapper for registered accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Recruiter,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Recruiter => "recruiter",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "recruiter" => Ok(Role::Recruiter),
            "admin" => Ok(Role::Admin),
            _ => Err(()),
        }
    }
}

/// A registered person. The hash never leaves the process: it is excluded
/// from every serialized representation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    /// Stored lowercase; uniqueness is case-insensitive.
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub profile: RoleProfile,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn role(&self) -> Role {
        match self.profile {
            RoleProfile::Student(_) => Role::Student,
            RoleProfile::Recruiter(_) => Role::Recruiter,
            RoleProfile::Admin => Role::Admin,
        }
    }

    pub fn student_profile(&self) -> Option<&StudentProfile> {
        match &self.profile {
            RoleProfile::Student(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn student_profile_mut(&mut self) -> Option<&mut StudentProfile> {
        match &mut self.profile {
            RoleProfile::Student(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn recruiter_profile_mut(&mut self) -> Option<&mut RecruiterProfile> {
        match &mut self.profile {
            RoleProfile::Recruiter(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Role-specific profile data, modeled as a sum type rather than one struct
/// of mostly-irrelevant optionals.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Student(StudentProfile),
    Recruiter(RecruiterProfile),
    Admin,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub bio: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<ResumeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
}

/// A stored resume: stable URL plus the file name the student uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRef {
    pub url: String,
    pub original_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

/// The back-reference to the recruiter's company is denormalized here and
/// maintained by the company directory on create/delete.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyId>,
}

/// The authenticated caller attached to a request after token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: AccountId,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, owner: &AccountId) -> bool {
        self.id == *owner
    }

    /// Ownership check with the universal admin bypass.
    pub fn can_manage(&self, owner: &AccountId) -> bool {
        self.is_admin() || self.owns(owner)
    }
}
