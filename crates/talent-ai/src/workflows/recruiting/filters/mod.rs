mod config;
mod policy;

pub use config::{
    FilterActions, FilterCriteria, FilterScope, NewTriageFilter, TriageFilter, ValidationError,
};
pub use policy::evaluate;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicationId, ApplicationStatus, CandidateId, JobId};
use super::ranking::Classification;

/// Audit record for one filter applied to one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub application_id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub score: u32,
    pub classification: Classification,
    pub previous_status: ApplicationStatus,
    pub new_status: ApplicationStatus,
    pub reason: String,
    #[serde(alias = "filtrosAplicados")]
    pub applied_filters: Vec<String>,
    /// The candidate was advanced. Never set on a withheld transition.
    pub auto_approved: bool,
    /// False when the transition was withheld because the application was already terminal.
    #[serde(default = "persisted_default")]
    pub persisted: bool,
    pub evaluated_at: DateTime<Utc>,
}

fn persisted_default() -> bool {
    true
}
