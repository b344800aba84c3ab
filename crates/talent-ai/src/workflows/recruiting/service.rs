use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::domain::{ApplicationId, ApplicationStatus, JobId, Priority, StatusTransition};
use super::filters::{
    evaluate, FilterScope, NewTriageFilter, TriageFilter, TriageResult, ValidationError,
};
use super::locks::KeyedLocks;
use super::notifications::NotificationDispatcher;
use super::ranking::{Classification, RankingService, ScoreTier, ScoredApplication};
use super::repository::{
    ApprovalNotice, ApprovalNotifier, Clock, FilterRepository, RecruitingRepository,
    RepositoryError, TriageLog,
};
use super::scoring::{ScoreResult, ScoringEngine, ScoringWeights};

/// Tunables for scoring and triage runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TriageSettings {
    pub weights: ScoringWeights,
    pub scoring_workers: usize,
    pub run_timeout: Duration,
}

impl Default for TriageSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            scoring_workers: 4,
            run_timeout: Duration::from_secs(30),
        }
    }
}

/// External collaborators the triage service depends on.
#[derive(Clone)]
pub struct TriageDependencies {
    pub repository: Arc<dyn RecruitingRepository>,
    pub filters: Arc<dyn FilterRepository>,
    pub log: Arc<dyn TriageLog>,
    pub notifier: Arc<dyn ApprovalNotifier>,
    pub clock: Arc<dyn Clock>,
}

/// Outcome of one automatic triage run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRun {
    pub job_id: JobId,
    pub results: Vec<TriageResult>,
    /// Set when the run deadline expired; `results` then holds the records produced so far.
    pub timed_out: bool,
}

/// Aggregate view over a job's current ranking and audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageStatistics {
    pub job_id: JobId,
    pub total_candidates: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub mean_score: f64,
    pub by_classification: BTreeMap<Classification, usize>,
    pub by_status: BTreeMap<ApplicationStatus, usize>,
    pub auto_approved: usize,
}

/// Ranks candidates, applies configured filters and records every automated decision.
pub struct TriageService {
    ranking: RankingService,
    repository: Arc<dyn RecruitingRepository>,
    filters: Arc<dyn FilterRepository>,
    log: Arc<dyn TriageLog>,
    notifications: NotificationDispatcher,
    clock: Arc<dyn Clock>,
    locks: Arc<KeyedLocks<ApplicationId>>,
    run_timeout: Duration,
}

impl TriageService {
    pub fn new(
        dependencies: TriageDependencies,
        settings: TriageSettings,
    ) -> Result<Self, TriageError> {
        settings.weights.validate()?;

        let ranking = RankingService::new(
            dependencies.repository.clone(),
            ScoringEngine::new(settings.weights),
            settings.scoring_workers,
        );

        let notifications = NotificationDispatcher::spawn(dependencies.notifier)
            .map_err(TriageError::Worker)?;

        Ok(Self {
            ranking,
            repository: dependencies.repository,
            filters: dependencies.filters,
            log: dependencies.log,
            notifications,
            clock: dependencies.clock,
            locks: Arc::new(KeyedLocks::default()),
            run_timeout: settings.run_timeout,
        })
    }

    /// Share the per-application write locks with another service instance over the same store.
    pub fn with_shared_locks(mut self, locks: Arc<KeyedLocks<ApplicationId>>) -> Self {
        self.locks = locks;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.ranking.engine().weights()
    }

    /// Ranked score results for a job, best first.
    pub fn rank_candidates(&self, job_id: &JobId) -> Result<Vec<ScoreResult>, TriageError> {
        Ok(self
            .ranking
            .rank_candidates(job_id)?
            .into_iter()
            .map(|scored| scored.result)
            .collect())
    }

    /// Apply every active filter to every ranked candidate and persist the transitions.
    ///
    /// Notices for advanced candidates are queued and delivered off the run thread.
    pub fn run_automatic_triage(&self, job_id: &JobId) -> Result<TriageRun, TriageError> {
        let deadline = Instant::now() + self.run_timeout;
        let ranked = self.ranking.rank_candidates(job_id)?;
        let filters: Vec<TriageFilter> = self
            .list_filters(Some(job_id))?
            .into_iter()
            .filter(|filter| filter.active)
            .collect();

        if filters.is_empty() {
            info!(job_id = %job_id, "no active triage filters configured, skipping run");
            return Ok(TriageRun {
                job_id: job_id.clone(),
                results: Vec::new(),
                timed_out: false,
            });
        }

        info!(
            job_id = %job_id,
            candidates = ranked.len(),
            filters = filters.len(),
            "starting automatic triage"
        );

        let mut results = Vec::with_capacity(ranked.len() * filters.len());
        let mut timed_out = false;

        'candidates: for mut scored in ranked {
            let mut written_this_run = false;
            for filter in &filters {
                // Checked before every evaluation, so after ranking and after each write.
                if Instant::now() >= deadline {
                    warn!(
                        job_id = %job_id,
                        produced = results.len(),
                        "triage run deadline expired, returning partial results"
                    );
                    timed_out = true;
                    break 'candidates;
                }

                let Some(mut result) = evaluate(&scored, filter, self.clock.now()) else {
                    continue;
                };

                let transition = transition_for(&scored, &result);
                self.locks.with_lock(&scored.application.id, || {
                    self.record(&mut result, &transition, written_this_run)
                })?;

                if result.persisted {
                    written_this_run = true;
                    transition.apply_to(&mut scored.application);
                }
                if result.auto_approved {
                    self.notifications.dispatch(ApprovalNotice {
                        candidate_id: result.candidate_id.clone(),
                        job_id: result.job_id.clone(),
                        score: result.score,
                        new_status: result.new_status,
                    });
                }
                results.push(result);
            }
        }

        info!(
            job_id = %job_id,
            results = results.len(),
            timed_out,
            "automatic triage finished"
        );

        Ok(TriageRun {
            job_id: job_id.clone(),
            results,
            timed_out,
        })
    }

    /// Write a transition and its audit record. Callers hold the application's lock.
    ///
    /// Withheld transitions are still audited, with `persisted` and `auto_approved` cleared.
    fn record(
        &self,
        result: &mut TriageResult,
        transition: &StatusTransition,
        written_this_run: bool,
    ) -> Result<(), TriageError> {
        let application_id = result.application_id.clone();
        let current = self
            .repository
            .application(&application_id)?
            .ok_or_else(|| TriageError::NotFound(format!("application {application_id}")))?;

        if current.status.is_terminal() && !written_this_run {
            debug!(
                application_id = %application_id,
                status = current.status.label(),
                "application already terminal, transition withheld"
            );
            result.persisted = false;
            result.auto_approved = false;
            self.log.append(result.clone())?;
            return Ok(());
        }

        self.repository
            .update_application_status(&application_id, transition)?;
        debug!(
            application_id = %application_id,
            from = current.status.label(),
            to = transition.status.label(),
            "application status updated"
        );

        result.persisted = true;
        self.log
            .append(result.clone())
            .map_err(|source| TriageError::Unaudited {
                application_id,
                status: transition.status,
                source,
            })
    }

    /// Counts by score tier and band, mean score and automated approvals for a job.
    pub fn triage_statistics(&self, job_id: &JobId) -> Result<TriageStatistics, TriageError> {
        let ranked = self.ranking.rank_candidates(job_id)?;
        let audit = self.log.results_for_job(job_id)?;

        let mut statistics = TriageStatistics {
            job_id: job_id.clone(),
            total_candidates: ranked.len(),
            high: 0,
            medium: 0,
            low: 0,
            mean_score: 0.0,
            by_classification: BTreeMap::new(),
            by_status: BTreeMap::new(),
            auto_approved: audit
                .iter()
                .filter(|result| result.persisted && result.auto_approved)
                .count(),
        };

        let mut total: u64 = 0;
        for scored in &ranked {
            let score = scored.result.total_score;
            total += u64::from(score);
            match ScoreTier::for_score(score) {
                ScoreTier::High => statistics.high += 1,
                ScoreTier::Medium => statistics.medium += 1,
                ScoreTier::Low => statistics.low += 1,
            }
            *statistics
                .by_classification
                .entry(scored.result.classification)
                .or_default() += 1;
            *statistics
                .by_status
                .entry(scored.application.status)
                .or_default() += 1;
        }

        if !ranked.is_empty() {
            let mean = total as f64 / ranked.len() as f64;
            statistics.mean_score = (mean * 100.0).round() / 100.0;
        }

        Ok(statistics)
    }

    /// Audit records for a job in the order they were produced.
    pub fn triage_results(&self, job_id: &JobId) -> Result<Vec<TriageResult>, TriageError> {
        self.ranking.job_posting(job_id)?;
        Ok(self.log.results_for_job(job_id)?)
    }

    /// Validate and store a new filter.
    pub fn create_filter(&self, definition: NewTriageFilter) -> Result<TriageFilter, TriageError> {
        definition.validate()?;
        if let FilterScope::Job(job_id) = &definition.scope {
            self.ranking.job_posting(job_id)?;
        }

        let filter_id = self.filters.next_filter_id()?;
        let filter = TriageFilter::from_new(filter_id, definition, self.clock.now());
        let stored = self.filters.insert_filter(filter)?;
        info!(
            filter_id = %stored.id,
            name = %stored.name,
            scope = %stored.scope,
            "triage filter created"
        );
        Ok(stored)
    }

    /// Filters for a job (plus global ones), or all filters, oldest first.
    pub fn list_filters(&self, job_id: Option<&JobId>) -> Result<Vec<TriageFilter>, TriageError> {
        let mut filters = self.filters.list_filters(job_id)?;
        if let Some(job_id) = job_id {
            filters.retain(|filter| filter.scope.applies_to(job_id));
        }
        filters.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(filters)
    }
}

fn transition_for(scored: &ScoredApplication, result: &TriageResult) -> StatusTransition {
    let breakdown = &scored.result.breakdown;
    StatusTransition {
        status: result.new_status,
        reason: result.reason.clone(),
        score: result.score,
        behavioral_compatibility: breakdown.behavioral.percentage(),
        skills_compatibility: breakdown.skills.percentage(),
        location_compatible: breakdown.location.is_full(),
        priority: match ScoreTier::for_score(result.score) {
            ScoreTier::High => Priority::High,
            ScoreTier::Medium => Priority::Medium,
            ScoreTier::Low => Priority::Low,
        },
        triaged_at: result.evaluated_at,
    }
}

/// Error raised by the triage service.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("persistence failure: {0}")]
    Persistence(RepositoryError),
    /// The status write landed but its audit record could not be appended.
    #[error(
        "application {application_id} moved to {} without an audit record: {source}",
        .status.label()
    )]
    Unaudited {
        application_id: ApplicationId,
        status: ApplicationStatus,
        source: RepositoryError,
    },
    #[error("failed to start notification worker: {0}")]
    Worker(std::io::Error),
}

impl From<RepositoryError> for TriageError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(what) => TriageError::NotFound(what),
            other => TriageError::Persistence(other),
        }
    }
}
