use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::companies::domain::CompanyId;
use crate::identity::domain::AccountId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Internship,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Internship => "Internship",
        }
    }

    pub const ALL: [JobType; 4] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
    ];
}

impl std::str::FromStr for JobType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|kind| kind.label() == value.trim())
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Fresher,
    #[serde(rename = "Entry Level")]
    EntryLevel,
    #[serde(rename = "Mid Level")]
    MidLevel,
    #[serde(rename = "Senior Level")]
    SeniorLevel,
}

impl ExperienceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Fresher => "Fresher",
            ExperienceLevel::EntryLevel => "Entry Level",
            ExperienceLevel::MidLevel => "Mid Level",
            ExperienceLevel::SeniorLevel => "Senior Level",
        }
    }

    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Fresher,
        ExperienceLevel::EntryLevel,
        ExperienceLevel::MidLevel,
        ExperienceLevel::SeniorLevel,
    ];
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::EntryLevel
    }
}

impl std::str::FromStr for ExperienceLevel {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ExperienceLevel::ALL
            .into_iter()
            .find(|level| level.label() == value.trim())
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryPeriod {
    Monthly,
    Yearly,
}

impl Default for SalaryPeriod {
    fn default() -> Self {
        SalaryPeriod::Yearly
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    #[serde(default)]
    pub min: u64,
    #[serde(default)]
    pub max: u64,
}

/// Posting lifecycle. `pending` until an admin approves; approval flips the
/// status to `active` in the same transition, rejection reverts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Active,
    Closed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(JobStatus::Pending),
            "active" => Ok(JobStatus::Active),
            "closed" => Ok(JobStatus::Closed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub salary: SalaryRange,
    pub salary_type: SalaryPeriod,
    pub location: String,
    pub job_type: JobType,
    pub experience_level: ExperienceLevel,
    pub skills: Vec<String>,
    pub positions: u32,
    pub company: CompanyId,
    pub recruiter: AccountId,
    pub application_deadline: DateTime<Utc>,
    pub is_approved: bool,
    pub status: JobStatus,
    pub views: u64,
    pub applications_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Approved and active: the gate for public search results.
    pub fn is_publicly_listed(&self) -> bool {
        self.is_approved && self.status == JobStatus::Active
    }

    /// Publicly listed and still inside the deadline.
    pub fn accepts_applications_at(&self, now: DateTime<Utc>) -> bool {
        self.is_publicly_listed() && now <= self.application_deadline
    }

    /// Case-insensitive any-match between the posting's tags and the given
    /// skill list.
    pub fn matches_any_skill(&self, skills: &[String]) -> bool {
        self.skills.iter().any(|tag| {
            skills
                .iter()
                .any(|skill| skill.trim().eq_ignore_ascii_case(tag.trim()))
        })
    }
}

/// Public search filters. The approved+active constraint is implicit and not
/// expressible from the outside.
#[derive(Debug, Clone, Default)]
pub struct JobSearchQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience_level: Option<ExperienceLevel>,
    pub min_salary: Option<u64>,
    pub max_salary: Option<u64>,
    pub skills: Vec<String>,
}

impl JobSearchQuery {
    pub fn matches(&self, job: &Job) -> bool {
        if !job.is_publicly_listed() {
            return false;
        }

        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let hit = job.title.to_lowercase().contains(&needle)
                || job.description.to_lowercase().contains(&needle)
                || job.location.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !job
                .location
                .to_lowercase()
                .contains(&location.to_lowercase())
            {
                return false;
            }
        }

        if let Some(kind) = self.job_type {
            if job.job_type != kind {
                return false;
            }
        }

        if let Some(level) = self.experience_level {
            if job.experience_level != level {
                return false;
            }
        }

        if let Some(min) = self.min_salary {
            if job.salary.min < min {
                return false;
            }
        }

        if let Some(max) = self.max_salary {
            if job.salary.max > max {
                return false;
            }
        }

        if !self.skills.is_empty() && !job.matches_any_skill(&self.skills) {
            return false;
        }

        true
    }

    /// Parse the `skills=rust,sql` query-string form.
    pub fn skills_from_csv(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|skill| !skill.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job() -> Job {
        Job {
            id: JobId("job-000001".to_string()),
            title: "Backend Engineer".to_string(),
            description: "Own the ingestion pipeline".to_string(),
            requirements: vec!["3y experience".to_string()],
            responsibilities: vec![],
            salary: SalaryRange {
                min: 60_000,
                max: 90_000,
            },
            salary_type: SalaryPeriod::Yearly,
            location: "Berlin, Germany".to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::MidLevel,
            skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
            positions: 2,
            company: CompanyId("comp-000001".to_string()),
            recruiter: AccountId("acct-000001".to_string()),
            application_deadline: Utc::now() + Duration::days(30),
            is_approved: true,
            status: JobStatus::Active,
            views: 0,
            applications_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn unlisted_jobs_never_match() {
        let mut unapproved = job();
        unapproved.is_approved = false;
        assert!(!JobSearchQuery::default().matches(&unapproved));

        let mut closed = job();
        closed.status = JobStatus::Closed;
        assert!(!JobSearchQuery::default().matches(&closed));

        assert!(JobSearchQuery::default().matches(&job()));
    }

    #[test]
    fn free_text_matches_title_description_location() {
        let query = JobSearchQuery {
            search: Some("berlin".to_string()),
            ..JobSearchQuery::default()
        };
        assert!(query.matches(&job()));

        let query = JobSearchQuery {
            search: Some("ingestion".to_string()),
            ..JobSearchQuery::default()
        };
        assert!(query.matches(&job()));

        let query = JobSearchQuery {
            search: Some("haskell".to_string()),
            ..JobSearchQuery::default()
        };
        assert!(!query.matches(&job()));
    }

    #[test]
    fn job_type_is_exact_and_salary_bounds_apply() {
        let query = JobSearchQuery {
            job_type: Some(JobType::Internship),
            ..JobSearchQuery::default()
        };
        assert!(!query.matches(&job()));

        let query = JobSearchQuery {
            min_salary: Some(50_000),
            ..JobSearchQuery::default()
        };
        assert!(query.matches(&job()));

        let query = JobSearchQuery {
            min_salary: Some(70_000),
            ..JobSearchQuery::default()
        };
        assert!(!query.matches(&job()), "salary.min below the requested floor");

        let query = JobSearchQuery {
            max_salary: Some(80_000),
            ..JobSearchQuery::default()
        };
        assert!(!query.matches(&job()), "salary.max above the requested cap");
    }

    #[test]
    fn skills_intersect_case_insensitively() {
        let query = JobSearchQuery {
            skills: JobSearchQuery::skills_from_csv("go, rust"),
            ..JobSearchQuery::default()
        };
        assert!(query.matches(&job()));

        let query = JobSearchQuery {
            skills: JobSearchQuery::skills_from_csv("go, python"),
            ..JobSearchQuery::default()
        };
        assert!(!query.matches(&job()));

        assert!(JobSearchQuery::skills_from_csv(" , ").is_empty());
    }

    #[test]
    fn deadline_gates_applications_not_visibility() {
        let mut expired = job();
        expired.application_deadline = Utc::now() - Duration::days(1);
        assert!(JobSearchQuery::default().matches(&expired));
        assert!(!expired.accepts_applications_at(Utc::now()));
    }

    #[test]
    fn enum_labels_round_trip() {
        assert_eq!("Full-time".parse::<JobType>(), Ok(JobType::FullTime));
        assert_eq!(
            "Entry Level".parse::<ExperienceLevel>(),
            Ok(ExperienceLevel::EntryLevel)
        );
        assert!("full time".parse::<JobType>().is_err());
        assert_eq!(
            serde_json::to_value(JobType::PartTime).expect("serializes"),
            serde_json::json!("Part-time")
        );
    }
}
