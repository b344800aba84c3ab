use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::recruiting::domain::{
    Application, ApplicationId, BehavioralProfile, Candidate, CandidateId, ExperienceTier, JobId,
    JobPosting, StatusTransition, WorkModality,
};
use crate::workflows::recruiting::filters::{
    FilterCriteria, FilterScope, NewTriageFilter, TriageResult,
};
use crate::workflows::recruiting::memory::{
    InMemoryFilterRepository, InMemoryRecruitingRepository, InMemoryTriageLog, RecordingNotifier,
};
use crate::workflows::recruiting::ranking::ScoredApplication;
use crate::workflows::recruiting::repository::{
    ApprovalNotice, ApprovalNotifier, FixedClock, NotificationError, RecruitingRepository,
    RepositoryError, TriageLog,
};
use crate::workflows::recruiting::scoring::ScoringEngine;
use crate::workflows::recruiting::service::{TriageDependencies, TriageService, TriageSettings};

pub(super) const JOB: &str = "job-fullstack";

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn job_id() -> JobId {
    JobId(JOB.to_string())
}

pub(super) fn tech_job() -> JobPosting {
    JobPosting {
        id: job_id(),
        title: "Senior Full Stack Developer".to_string(),
        area: "Tecnologia".to_string(),
        requirements: "React, Node.js".to_string(),
        experience_tier: Some(ExperienceTier::Senior),
        city: "São Paulo".to_string(),
        region: "SP".to_string(),
        modality: WorkModality::OnSite,
        salary_range: "R$ 10.000,00 - R$ 14.000,00".to_string(),
    }
}

pub(super) fn candidate(id: &str, name: &str) -> Candidate {
    Candidate {
        id: CandidateId(id.to_string()),
        name: name.to_string(),
        email: format!("{id}@example.com"),
        behavioral_profile: None,
        skills: Vec::new(),
        experience: String::new(),
        salary_expectation: String::new(),
        city: String::new(),
        region: String::new(),
    }
}

/// Scores 100 against `tech_job`.
pub(super) fn strong_candidate() -> Candidate {
    Candidate {
        behavioral_profile: Some(BehavioralProfile::Conscientious),
        skills: vec!["React".to_string(), "Node.js".to_string(), "SQL".to_string()],
        experience: "7 years building web platforms".to_string(),
        salary_expectation: "R$ 9.500,00".to_string(),
        city: "São Paulo".to_string(),
        region: "SP".to_string(),
        ..candidate("cand-ana", "Ana Souza")
    }
}

/// Scores 73 against `tech_job`.
pub(super) fn medium_candidate() -> Candidate {
    Candidate {
        behavioral_profile: Some(BehavioralProfile::Steady),
        skills: vec!["React".to_string(), "Node".to_string()],
        experience: "4 years".to_string(),
        salary_expectation: "R$ 10.500,00".to_string(),
        city: "Campinas".to_string(),
        region: "SP".to_string(),
        ..candidate("cand-bruno", "Bruno Lima")
    }
}

/// Scores 15 against `tech_job`.
pub(super) fn weak_candidate() -> Candidate {
    Candidate {
        behavioral_profile: Some(BehavioralProfile::Influence),
        skills: vec!["Excel".to_string()],
        experience: "1 year".to_string(),
        salary_expectation: "R$ 20.000,00".to_string(),
        city: "Recife".to_string(),
        region: "PE".to_string(),
        ..candidate("cand-carla", "Carla Dias")
    }
}

pub(super) fn application(id: &str, candidate: &Candidate, minutes_after: i64) -> Application {
    Application::new(
        ApplicationId(id.to_string()),
        candidate.id.clone(),
        job_id(),
        fixed_now() - Duration::days(3) + Duration::minutes(minutes_after),
    )
}

pub(super) fn scored(candidate: Candidate, job: &JobPosting) -> ScoredApplication {
    let application = application("app-scored", &candidate, 0);
    let result = ScoringEngine::default().score(&candidate, job, &application);
    ScoredApplication {
        result,
        candidate,
        application,
    }
}

pub(super) fn filter_definition(scope: FilterScope, name: &str) -> NewTriageFilter {
    NewTriageFilter {
        scope,
        name: name.to_string(),
        criteria: FilterCriteria::default(),
        actions: Default::default(),
        active: true,
    }
}

/// Repository holding `tech_job` with the strong, medium and weak candidates applied in order.
pub(super) fn seeded_repository() -> InMemoryRecruitingRepository {
    let repository = InMemoryRecruitingRepository::default();
    repository.upsert_job(tech_job());
    let candidates = [strong_candidate(), medium_candidate(), weak_candidate()];
    for (index, candidate) in candidates.into_iter().enumerate() {
        let application = application(
            &format!("app-{:06}", index + 1),
            &candidate,
            index as i64 * 5,
        );
        repository.upsert_candidate(candidate);
        repository
            .insert_application(application)
            .expect("unique application");
    }
    repository
}

pub(super) struct Harness {
    pub(super) service: TriageService,
    pub(super) repository: InMemoryRecruitingRepository,
    pub(super) log: InMemoryTriageLog,
    pub(super) notifier: RecordingNotifier,
}

pub(super) fn dependencies(
    repository: Arc<dyn RecruitingRepository>,
    filters: InMemoryFilterRepository,
    log: InMemoryTriageLog,
    notifier: Arc<dyn ApprovalNotifier>,
) -> TriageDependencies {
    TriageDependencies {
        repository,
        filters: Arc::new(filters),
        log: Arc::new(log),
        notifier,
        clock: Arc::new(FixedClock(fixed_now())),
    }
}

pub(super) fn harness_with(
    repository: InMemoryRecruitingRepository,
    settings: TriageSettings,
) -> Harness {
    let log = InMemoryTriageLog::default();
    let notifier = RecordingNotifier::default();
    let service = TriageService::new(
        dependencies(
            Arc::new(repository.clone()),
            InMemoryFilterRepository::default(),
            log.clone(),
            Arc::new(notifier.clone()),
        ),
        settings,
    )
    .expect("default weights are valid");
    Harness {
        service,
        repository,
        log,
        notifier,
    }
}

pub(super) fn harness() -> Harness {
    harness_with(seeded_repository(), TriageSettings::default())
}

pub(super) fn stored(repository: &InMemoryRecruitingRepository, id: &str) -> Application {
    repository
        .application(&ApplicationId(id.to_string()))
        .expect("lookup succeeds")
        .expect("application present")
}

pub(super) struct UnavailableRepository;

impl RecruitingRepository for UnavailableRepository {
    fn candidate(&self, _id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn job_posting(&self, _id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn applications_by_job(&self, _job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_application_status(
        &self,
        _id: &ApplicationId,
        _transition: &StatusTransition,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Serves reads from an in-memory store but rejects every status write.
pub(super) struct ReadOnlyRepository(pub(super) InMemoryRecruitingRepository);

impl RecruitingRepository for ReadOnlyRepository {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.0.candidate(id)
    }

    fn job_posting(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.0.job_posting(id)
    }

    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.0.applications_by_job(job_id)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.0.application(id)
    }

    fn update_application_status(
        &self,
        _id: &ApplicationId,
        _transition: &StatusTransition,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("replica is read only".to_string()))
    }
}

/// Delegates to an in-memory store, sleeping before every status write.
pub(super) struct SlowWrites {
    pub(super) inner: InMemoryRecruitingRepository,
    pub(super) delay: StdDuration,
}

impl RecruitingRepository for SlowWrites {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        self.inner.candidate(id)
    }

    fn job_posting(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.inner.job_posting(id)
    }

    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_by_job(job_id)
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.application(id)
    }

    fn update_application_status(
        &self,
        id: &ApplicationId,
        transition: &StatusTransition,
    ) -> Result<(), RepositoryError> {
        thread::sleep(self.delay);
        self.inner.update_application_status(id, transition)
    }
}

/// Audit store that rejects every append.
pub(super) struct FullTriageLog;

impl TriageLog for FullTriageLog {
    fn append(&self, _result: TriageResult) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("audit volume full".to_string()))
    }

    fn results_for_job(&self, _job_id: &JobId) -> Result<Vec<TriageResult>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Records notices after sleeping, like a slow SMTP relay.
pub(super) struct SlowNotifier {
    pub(super) inner: RecordingNotifier,
    pub(super) delay: StdDuration,
}

impl ApprovalNotifier for SlowNotifier {
    fn notify_approval(&self, notice: ApprovalNotice) -> Result<(), NotificationError> {
        thread::sleep(self.delay);
        self.inner.notify_approval(notice)
    }
}

pub(super) struct FailingNotifier;

impl ApprovalNotifier for FailingNotifier {
    fn notify_approval(&self, _notice: ApprovalNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
