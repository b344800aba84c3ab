use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

/// Identifier wrapper for published job postings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

/// Identifier wrapper for candidate applications.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

/// Identifier wrapper for configured triage filters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(pub String);

macro_rules! display_id {
    ($($ty:ty),+) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        })+
    };
}

display_id!(CandidateId, JobId, ApplicationId, FilterId);

/// DISC-style behavioral profile assigned after the candidate completes the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehavioralProfile {
    #[serde(alias = "D", alias = "dominante")]
    Dominant,
    #[serde(alias = "I", alias = "influente")]
    Influence,
    #[serde(alias = "S", alias = "estavel")]
    Steady,
    #[serde(alias = "C", alias = "conforme")]
    Conscientious,
}

impl BehavioralProfile {
    pub const fn label(self) -> &'static str {
        match self {
            BehavioralProfile::Dominant => "dominant",
            BehavioralProfile::Influence => "influence",
            BehavioralProfile::Steady => "steady",
            BehavioralProfile::Conscientious => "conscientious",
        }
    }

    /// Profiles that work well alongside this one without being an exact match.
    pub const fn adjacent(self) -> &'static [BehavioralProfile] {
        match self {
            BehavioralProfile::Dominant => &[BehavioralProfile::Influence],
            BehavioralProfile::Influence => {
                &[BehavioralProfile::Dominant, BehavioralProfile::Steady]
            }
            BehavioralProfile::Steady => {
                &[BehavioralProfile::Influence, BehavioralProfile::Conscientious]
            }
            BehavioralProfile::Conscientious => {
                &[BehavioralProfile::Steady, BehavioralProfile::Dominant]
            }
        }
    }

    /// Adjacency is symmetric: either side listing the other is enough.
    pub fn is_adjacent_to(self, other: BehavioralProfile) -> bool {
        self.adjacent().contains(&other) || other.adjacent().contains(&self)
    }
}

/// Registered candidate snapshot used for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub behavioral_profile: Option<BehavioralProfile>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Free-text narrative, e.g. "7 years building web platforms".
    #[serde(default)]
    pub experience: String,
    /// Currency formatted expectation such as "R$ 8.500,00".
    #[serde(default)]
    pub salary_expectation: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
}

/// Seniority tier requested by a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceTier {
    Junior,
    #[serde(alias = "pleno")]
    Mid,
    Senior,
}

impl ExperienceTier {
    pub const fn label(self) -> &'static str {
        match self {
            ExperienceTier::Junior => "junior",
            ExperienceTier::Mid => "mid",
            ExperienceTier::Senior => "senior",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkModality {
    #[serde(alias = "presencial")]
    OnSite,
    #[serde(alias = "remoto")]
    Remote,
    #[serde(alias = "hibrido")]
    Hybrid,
}

/// Published job posting. Immutable for scoring purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    /// Job category, e.g. "Tecnologia" or "Recursos Humanos".
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub experience_tier: Option<ExperienceTier>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    pub modality: WorkModality,
    #[serde(default)]
    pub salary_range: String,
}

/// Lifecycle of an application. `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[serde(alias = "candidatado")]
    Applied,
    #[serde(alias = "triagem")]
    Screening,
    #[serde(alias = "entrevista")]
    Interview,
    #[serde(alias = "aprovado")]
    Approved,
    #[serde(alias = "reprovado")]
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Screening => "screening",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Rejected)
    }

    /// Outcomes that advance the candidate and trigger the approval notice.
    pub const fn is_advancing(self) -> bool {
        matches!(self, ApplicationStatus::Approved | ApplicationStatus::Interview)
    }
}

/// Review priority recorded alongside an automated transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Candidate x job pair. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub stage: String,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub triaged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interview_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub behavioral_compatibility: Option<u32>,
    #[serde(default)]
    pub skills_compatibility: Option<u32>,
    #[serde(default)]
    pub location_compatible: Option<bool>,
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl Application {
    pub fn new(
        id: ApplicationId,
        candidate_id: CandidateId,
        job_id: JobId,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            candidate_id,
            job_id,
            status: ApplicationStatus::Applied,
            stage: ApplicationStatus::Applied.label().to_string(),
            applied_at,
            score: None,
            triaged_at: None,
            interview_at: None,
            rejection_reason: None,
            behavioral_compatibility: None,
            skills_compatibility: None,
            location_compatible: None,
            priority: None,
        }
    }
}

/// Status write issued by the triage orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub status: ApplicationStatus,
    pub reason: String,
    pub score: u32,
    pub behavioral_compatibility: u32,
    pub skills_compatibility: u32,
    pub location_compatible: bool,
    pub priority: Priority,
    pub triaged_at: DateTime<Utc>,
}

impl StatusTransition {
    /// Apply the transition to an application record in place.
    pub fn apply_to(&self, application: &mut Application) {
        application.status = self.status;
        application.stage = self.status.label().to_string();
        application.score = Some(self.score);
        application.behavioral_compatibility = Some(self.behavioral_compatibility);
        application.skills_compatibility = Some(self.skills_compatibility);
        application.location_compatible = Some(self.location_compatible);
        application.priority = Some(self.priority);
        application.triaged_at = Some(self.triaged_at);
        application.rejection_reason = if self.status == ApplicationStatus::Rejected {
            Some(self.reason.clone())
        } else {
            None
        };
    }
}
