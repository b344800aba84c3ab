use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::domain::{ApplicationStatus, BehavioralProfile, FilterId, JobId};

const GLOBAL_SCOPE: &str = "global";

/// Which postings a filter applies to. Serialized as the job id or the `"global"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterScope {
    Job(JobId),
    Global,
}

impl FilterScope {
    pub fn applies_to(&self, job_id: &JobId) -> bool {
        match self {
            FilterScope::Job(scoped) => scoped == job_id,
            FilterScope::Global => true,
        }
    }
}

impl std::fmt::Display for FilterScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterScope::Job(job_id) => write!(f, "{job_id}"),
            FilterScope::Global => f.write_str(GLOBAL_SCOPE),
        }
    }
}

impl From<String> for FilterScope {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "*" || trimmed.eq_ignore_ascii_case(GLOBAL_SCOPE) {
            FilterScope::Global
        } else {
            FilterScope::Job(JobId(trimmed.to_string()))
        }
    }
}

impl From<FilterScope> for String {
    fn from(scope: FilterScope) -> Self {
        match scope {
            FilterScope::Job(job_id) => job_id.0,
            FilterScope::Global => GLOBAL_SCOPE.to_string(),
        }
    }
}

/// Hard pass/fail criteria. Absent (or empty) optional criteria are not checked.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub minimum_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavioral_profiles: Option<Vec<BehavioralProfile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_experience_years: Option<u32>,
    /// Upper bound on the candidate's parsed salary expectation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_salary: Option<f64>,
}

/// Status applied per score tier once every hard criterion passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterActions {
    pub score_high: ApplicationStatus,
    pub score_medium: ApplicationStatus,
    pub score_low: ApplicationStatus,
}

impl Default for FilterActions {
    fn default() -> Self {
        Self {
            score_high: ApplicationStatus::Interview,
            score_medium: ApplicationStatus::Screening,
            score_low: ApplicationStatus::Rejected,
        }
    }
}

/// Filter definition as submitted through the configuration API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTriageFilter {
    pub scope: FilterScope,
    pub name: String,
    #[serde(default)]
    pub criteria: FilterCriteria,
    #[serde(default)]
    pub actions: FilterActions,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Stored, validated filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageFilter {
    pub id: FilterId,
    pub scope: FilterScope,
    pub name: String,
    pub criteria: FilterCriteria,
    pub actions: FilterActions,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl TriageFilter {
    pub fn from_new(id: FilterId, definition: NewTriageFilter, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            scope: definition.scope,
            name: definition.name.trim().to_string(),
            criteria: definition.criteria,
            actions: definition.actions,
            active: definition.active,
            created_at,
        }
    }
}

/// Malformed filter or scoring configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("filter name must not be empty")]
    EmptyName,
    #[error("minimum score must be within 0..=100 (found {0})")]
    MinimumScoreOutOfRange(u32),
    #[error("maximum salary must be a non-negative amount (found {0})")]
    InvalidSalary(f64),
    #[error("required skills must not contain blank entries")]
    BlankSkill,
    #[error("weight for {factor} must be a non-negative number (found {value})")]
    InvalidWeight { factor: String, value: f64 },
}

impl NewTriageFilter {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }

        if self.criteria.minimum_score > 100 {
            return Err(ValidationError::MinimumScoreOutOfRange(
                self.criteria.minimum_score,
            ));
        }

        if let Some(maximum) = self.criteria.maximum_salary {
            if !maximum.is_finite() || maximum < 0.0 {
                return Err(ValidationError::InvalidSalary(maximum));
            }
        }

        if let Some(skills) = &self.criteria.required_skills {
            if skills.iter().any(|skill| skill.trim().is_empty()) {
                return Err(ValidationError::BlankSkill);
            }
        }

        Ok(())
    }
}
