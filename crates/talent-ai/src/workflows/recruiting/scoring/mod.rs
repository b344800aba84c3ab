mod config;
mod rules;

pub use config::ScoringWeights;
pub use rules::{desired_profile, minimum_years};

use serde::{Deserialize, Serialize};

use super::domain::{Application, ApplicationId, Candidate, CandidateId, JobPosting};
use super::ranking::{classify, Classification};

/// One weighted factor of the compatibility score. `value` never exceeds `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScore {
    pub value: u32,
    pub max: u32,
    pub rationale: String,
}

impl SubScore {
    pub(crate) fn new(value: u32, max: u32, rationale: impl Into<String>) -> Self {
        Self {
            value: value.min(max),
            max,
            rationale: rationale.into(),
        }
    }

    /// Share of the factor's weight earned, as a whole percentage.
    pub fn percentage(&self) -> u32 {
        if self.max == 0 {
            0
        } else {
            ((self.value as f64 / self.max as f64) * 100.0).round() as u32
        }
    }

    pub fn is_full(&self) -> bool {
        self.max > 0 && self.value == self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub behavioral: SubScore,
    pub skills: SubScore,
    pub experience: SubScore,
    pub location: SubScore,
    pub salary: SubScore,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.behavioral.value
            + self.skills.value
            + self.experience.value
            + self.location.value
            + self.salary.value
    }

    pub fn max_total(&self) -> u32 {
        self.behavioral.max
            + self.skills.max
            + self.experience.max
            + self.location.max
            + self.salary.max
    }
}

/// Compatibility of one candidate with one job, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub application_id: ApplicationId,
    pub total_score: u32,
    pub max_score: u32,
    pub classification: Classification,
    pub breakdown: ScoreBreakdown,
}

/// Stateless scorer applying a weight configuration to candidate/job pairs.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(
        &self,
        candidate: &Candidate,
        job: &JobPosting,
        application: &Application,
    ) -> ScoreResult {
        score(candidate, job, application, &self.weights)
    }
}

/// Score a candidate against a job. Pure: no I/O and no failure modes.
pub fn score(
    candidate: &Candidate,
    job: &JobPosting,
    application: &Application,
    weights: &ScoringWeights,
) -> ScoreResult {
    let breakdown = ScoreBreakdown {
        behavioral: rules::behavioral(candidate, job, weights.behavioral),
        skills: rules::skills(candidate, job, weights.skills),
        experience: rules::experience(candidate, job, weights.experience),
        location: rules::location(candidate, job, weights.location),
        salary: rules::salary(candidate, job, weights.salary),
    };
    let total_score = breakdown.total();

    ScoreResult {
        candidate_id: candidate.id.clone(),
        candidate_name: candidate.name.clone(),
        application_id: application.id.clone(),
        total_score,
        max_score: breakdown.max_total(),
        classification: classify(total_score),
        breakdown,
    }
}
