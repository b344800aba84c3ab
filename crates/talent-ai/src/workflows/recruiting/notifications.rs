use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::warn;

use super::repository::{ApprovalNotice, ApprovalNotifier};

/// Delivers approval notices on a dedicated worker thread.
///
/// Dropping the dispatcher closes the queue and waits for notices already queued.
pub(crate) struct NotificationDispatcher {
    sender: Option<UnboundedSender<ApprovalNotice>>,
    worker: Option<JoinHandle<()>>,
}

impl NotificationDispatcher {
    pub(crate) fn spawn(notifier: Arc<dyn ApprovalNotifier>) -> std::io::Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ApprovalNotice>();
        let worker = thread::Builder::new()
            .name("triage-notifier".to_string())
            .spawn(move || {
                while let Some(notice) = receiver.blocking_recv() {
                    let candidate_id = notice.candidate_id.clone();
                    let job_id = notice.job_id.clone();
                    if let Err(err) = notifier.notify_approval(notice) {
                        warn!(
                            candidate_id = %candidate_id,
                            job_id = %job_id,
                            error = %err,
                            "approval notification failed"
                        );
                    }
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queue a notice without waiting for delivery.
    pub(crate) fn dispatch(&self, notice: ApprovalNotice) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(rejected) = sender.send(notice) {
            warn!(
                candidate_id = %rejected.0.candidate_id,
                "notification worker stopped, notice dropped"
            );
        }
    }
}

impl Drop for NotificationDispatcher {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("notification worker panicked");
            }
        }
    }
}
