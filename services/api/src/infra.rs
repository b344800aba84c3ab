use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_ai::workflows::recruiting::{
    ApprovalNotice, ApprovalNotifier, InMemoryFilterRepository, InMemoryRecruitingRepository,
    InMemoryTriageLog, NotificationError, SystemClock, TriageDependencies, TriageError,
    TriageService, TriageSettings,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Stands in for the e-mail/ATS hook by writing approvals to the log.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingNotifier;

impl ApprovalNotifier for LoggingNotifier {
    fn notify_approval(&self, notice: ApprovalNotice) -> Result<(), NotificationError> {
        info!(
            candidate_id = %notice.candidate_id,
            job_id = %notice.job_id,
            score = notice.score,
            status = notice.new_status.label(),
            "candidate advanced by automated triage"
        );
        Ok(())
    }
}

/// Triage service wired to in-memory adapters. The recruiting store is returned for seeding.
pub(crate) fn in_memory_triage_service(
    settings: TriageSettings,
) -> Result<(TriageService, InMemoryRecruitingRepository), TriageError> {
    let repository = InMemoryRecruitingRepository::default();
    let dependencies = TriageDependencies {
        repository: Arc::new(repository.clone()),
        filters: Arc::new(InMemoryFilterRepository::default()),
        log: Arc::new(InMemoryTriageLog::default()),
        notifier: Arc::new(LoggingNotifier),
        clock: Arc::new(SystemClock),
    };
    let service = TriageService::new(dependencies, settings)?;
    Ok((service, repository))
}
