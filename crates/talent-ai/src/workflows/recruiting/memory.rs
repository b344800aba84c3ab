//! In-memory adapters for the repository traits, used by the demo service and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Application, ApplicationId, Candidate, CandidateId, FilterId, JobId, JobPosting,
    StatusTransition,
};
use super::filters::{TriageFilter, TriageResult};
use super::repository::{
    ApprovalNotice, ApprovalNotifier, FilterRepository, NotificationError, RecruitingRepository,
    RepositoryError, TriageLog,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().expect("in-memory store mutex poisoned")
}

#[derive(Debug, Default)]
struct RecruitingTables {
    candidates: HashMap<CandidateId, Candidate>,
    jobs: HashMap<JobId, JobPosting>,
    applications: BTreeMap<ApplicationId, Application>,
}

/// Candidate, posting and application tables behind a single mutex.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecruitingRepository {
    tables: Arc<Mutex<RecruitingTables>>,
}

impl InMemoryRecruitingRepository {
    pub fn upsert_candidate(&self, candidate: Candidate) {
        lock(&self.tables)
            .candidates
            .insert(candidate.id.clone(), candidate);
    }

    pub fn upsert_job(&self, job: JobPosting) {
        lock(&self.tables).jobs.insert(job.id.clone(), job);
    }

    /// Register an application, enforcing one application per candidate/job pair.
    pub fn insert_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut tables = lock(&self.tables);
        let duplicate = tables.applications.values().any(|existing| {
            existing.id == application.id
                || (existing.candidate_id == application.candidate_id
                    && existing.job_id == application.job_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        tables
            .applications
            .insert(application.id.clone(), application);
        Ok(())
    }
}

impl RecruitingRepository for InMemoryRecruitingRepository {
    fn candidate(&self, id: &CandidateId) -> Result<Option<Candidate>, RepositoryError> {
        Ok(lock(&self.tables).candidates.get(id).cloned())
    }

    fn job_posting(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(lock(&self.tables).jobs.get(id).cloned())
    }

    fn applications_by_job(&self, job_id: &JobId) -> Result<Vec<Application>, RepositoryError> {
        Ok(lock(&self.tables)
            .applications
            .values()
            .filter(|application| &application.job_id == job_id)
            .cloned()
            .collect())
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(lock(&self.tables).applications.get(id).cloned())
    }

    fn update_application_status(
        &self,
        id: &ApplicationId,
        transition: &StatusTransition,
    ) -> Result<(), RepositoryError> {
        let mut tables = lock(&self.tables);
        let application = tables
            .applications
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(format!("application {id}")))?;
        transition.apply_to(application);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FilterTable {
    filters: Vec<TriageFilter>,
    issued: u64,
}

/// Filter store; clones share the table and its id sequence.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFilterRepository {
    table: Arc<Mutex<FilterTable>>,
}

impl FilterRepository for InMemoryFilterRepository {
    fn list_filters(&self, job_id: Option<&JobId>) -> Result<Vec<TriageFilter>, RepositoryError> {
        Ok(lock(&self.table)
            .filters
            .iter()
            .filter(|filter| job_id.map_or(true, |job_id| filter.scope.applies_to(job_id)))
            .cloned()
            .collect())
    }

    fn insert_filter(&self, filter: TriageFilter) -> Result<TriageFilter, RepositoryError> {
        let mut table = lock(&self.table);
        if table.filters.iter().any(|existing| existing.id == filter.id) {
            return Err(RepositoryError::Conflict);
        }
        table.filters.push(filter.clone());
        Ok(filter)
    }

    fn next_filter_id(&self) -> Result<FilterId, RepositoryError> {
        let mut table = lock(&self.table);
        table.issued += 1;
        Ok(FilterId(format!("flt-{:06}", table.issued)))
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTriageLog {
    entries: Arc<Mutex<Vec<TriageResult>>>,
}

impl InMemoryTriageLog {
    pub fn entries(&self) -> Vec<TriageResult> {
        lock(&self.entries).clone()
    }
}

impl TriageLog for InMemoryTriageLog {
    fn append(&self, result: TriageResult) -> Result<(), RepositoryError> {
        lock(&self.entries).push(result);
        Ok(())
    }

    fn results_for_job(&self, job_id: &JobId) -> Result<Vec<TriageResult>, RepositoryError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|result| &result.job_id == job_id)
            .cloned()
            .collect())
    }
}

/// Notifier that records every notice instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<ApprovalNotice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<ApprovalNotice> {
        lock(&self.notices).clone()
    }
}

impl ApprovalNotifier for RecordingNotifier {
    fn notify_approval(&self, notice: ApprovalNotice) -> Result<(), NotificationError> {
        lock(&self.notices).push(notice);
        Ok(())
    }
}
