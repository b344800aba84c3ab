//! Candidate/job matching and automated triage.
//!
//! Ranking scores every application for a job on a bounded worker pool; the triage service then
//! applies the job's filters (plus global ones) to each ranked candidate, persists the resulting
//! status transitions and appends an audit record per filter evaluation.

pub mod domain;
pub mod filters;
pub mod locks;
pub mod memory;
mod notifications;
pub mod parsing;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, BehavioralProfile, Candidate, CandidateId,
    ExperienceTier, FilterId, JobId, JobPosting, Priority, StatusTransition, WorkModality,
};
pub use filters::{
    evaluate, FilterActions, FilterCriteria, FilterScope, NewTriageFilter, TriageFilter,
    TriageResult, ValidationError,
};
pub use memory::{
    InMemoryFilterRepository, InMemoryRecruitingRepository, InMemoryTriageLog, RecordingNotifier,
};
pub use ranking::{classify, Classification, RankingService, ScoreTier, ScoredApplication};
pub use repository::{
    ApprovalNotice, ApprovalNotifier, Clock, FilterRepository, FixedClock, NotificationError,
    RecruitingRepository, RepositoryError, SystemClock, TriageLog,
};
pub use router::triage_router;
pub use scoring::{score, ScoreBreakdown, ScoreResult, ScoringEngine, ScoringWeights, SubScore};
pub use service::{
    TriageDependencies, TriageError, TriageRun, TriageService, TriageSettings, TriageStatistics,
};
