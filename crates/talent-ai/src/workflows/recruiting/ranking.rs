use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::{Application, Candidate, JobId, JobPosting};
use super::repository::RecruitingRepository;
use super::scoring::{ScoreResult, ScoringEngine};
use super::service::TriageError;

/// Fixed score bands used in rankings and audit records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    #[serde(rename = "Below Average")]
    BelowAverage,
    Low,
}

impl Classification {
    pub const ALL: [Classification; 6] = [
        Classification::Excellent,
        Classification::VeryGood,
        Classification::Good,
        Classification::Fair,
        Classification::BelowAverage,
        Classification::Low,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Classification::Excellent => "Excellent",
            Classification::VeryGood => "Very Good",
            Classification::Good => "Good",
            Classification::Fair => "Fair",
            Classification::BelowAverage => "Below Average",
            Classification::Low => "Low",
        }
    }
}

/// Band for a total score; each boundary belongs to the higher band.
pub fn classify(score: u32) -> Classification {
    match score {
        90.. => Classification::Excellent,
        80..=89 => Classification::VeryGood,
        70..=79 => Classification::Good,
        60..=69 => Classification::Fair,
        50..=59 => Classification::BelowAverage,
        _ => Classification::Low,
    }
}

/// Tier keying a filter's action bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn for_score(score: u32) -> Self {
        if score >= 80 {
            ScoreTier::High
        } else if score >= 60 {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreTier::High => "high",
            ScoreTier::Medium => "medium",
            ScoreTier::Low => "low",
        }
    }
}

/// Score together with the snapshots it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredApplication {
    pub result: ScoreResult,
    pub candidate: Candidate,
    pub application: Application,
}

/// Ranking order: score descending, then earliest application, then application id.
pub fn ranking_order(left: &ScoredApplication, right: &ScoredApplication) -> Ordering {
    right
        .result
        .total_score
        .cmp(&left.result.total_score)
        .then_with(|| left.application.applied_at.cmp(&right.application.applied_at))
        .then_with(|| left.application.id.cmp(&right.application.id))
}

/// Fetches a job's applications and scores them on a bounded worker pool.
pub struct RankingService {
    repository: Arc<dyn RecruitingRepository>,
    engine: ScoringEngine,
    pool: Option<Arc<ThreadPool>>,
}

impl RankingService {
    pub fn new(
        repository: Arc<dyn RecruitingRepository>,
        engine: ScoringEngine,
        workers: usize,
    ) -> Self {
        let pool = match ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|index| format!("scoring-{index}"))
            .build()
        {
            Ok(pool) => Some(Arc::new(pool)),
            Err(err) => {
                warn!(error = %err, "scoring pool unavailable, scoring sequentially");
                None
            }
        };

        Self {
            repository,
            engine,
            pool,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn job_posting(&self, job_id: &JobId) -> Result<JobPosting, TriageError> {
        self.repository
            .job_posting(job_id)?
            .ok_or_else(|| TriageError::NotFound(format!("job {job_id}")))
    }

    /// Rank every application for `job_id`, best first.
    pub fn rank_candidates(&self, job_id: &JobId) -> Result<Vec<ScoredApplication>, TriageError> {
        let job = self.job_posting(job_id)?;
        let applications = self.repository.applications_by_job(job_id)?;

        let mut pairs = Vec::with_capacity(applications.len());
        for application in applications {
            match self.repository.candidate(&application.candidate_id)? {
                Some(candidate) => pairs.push((candidate, application)),
                None => warn!(
                    job_id = %job_id,
                    application_id = %application.id,
                    candidate_id = %application.candidate_id,
                    "skipping application with unknown candidate"
                ),
            }
        }

        let ranked = self.score_all(&job, pairs);
        debug!(job_id = %job_id, candidates = ranked.len(), "ranked candidates");
        Ok(ranked)
    }

    fn score_all(
        &self,
        job: &JobPosting,
        pairs: Vec<(Candidate, Application)>,
    ) -> Vec<ScoredApplication> {
        let engine = &self.engine;
        let score_pair = |(candidate, application): (Candidate, Application)| {
            let result = engine.score(&candidate, job, &application);
            ScoredApplication {
                result,
                candidate,
                application,
            }
        };

        let mut scored: Vec<ScoredApplication> = match &self.pool {
            Some(pool) => pool.install(|| pairs.into_par_iter().map(score_pair).collect()),
            None => pairs.into_iter().map(score_pair).collect(),
        };
        scored.sort_by(ranking_order);
        scored
    }
}
