use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Candidate, CandidateId, FilterId, JobId,
    JobPosting, StatusTransition,
};
use super::filters::{TriageFilter, TriageResult};

/// Read/write access to candidates, postings and applications.
pub trait RecruitingRepository: Send + Sync {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError>;
    fn job_posting(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError>;
    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn update_application_status(
        &self,
        id: &ApplicationId,
        transition: &StatusTransition,
    ) -> Result<(), RepositoryError>;
}

/// Configured triage filters.
pub trait FilterRepository: Send + Sync {
    /// Filters scoped to `job_id` plus global ones; every filter when `job_id` is `None`.
    fn list_filters(&self, job_id: Option<&JobId>) -> Result<Vec<TriageFilter>, RepositoryError>;
    fn insert_filter(&self, filter: TriageFilter) -> Result<TriageFilter, RepositoryError>;
    /// Reserve a filter id, unique across every caller sharing the store.
    fn next_filter_id(&self) -> Result<FilterId, RepositoryError>;
}

/// Append-only audit trail of triage decisions.
pub trait TriageLog: Send + Sync {
    fn append(&self, result: TriageResult) -> Result<(), RepositoryError>;
    fn results_for_job(&self, job_id: &JobId) -> Result<Vec<TriageResult>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when triage advances a candidate (e-mail, ATS webhook, ...).
pub trait ApprovalNotifier: Send + Sync {
    fn notify_approval(&self, notice: ApprovalNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalNotice {
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub score: u32,
    pub new_status: ApplicationStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Time source for audit timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
