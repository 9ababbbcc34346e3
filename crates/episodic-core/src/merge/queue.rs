//! Background merge jobs.
//!
//! [`MergeQueue::queue_merge`] returns immediately with a job id; the merge
//! itself runs on tokio's blocking pool against its own connection. Job state
//! lives in memory; each new job prunes finished jobs past the retention
//! window, and callers may also call [`MergeQueue::prune_expired`] directly.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use super::{AccountMerger, GuestLocks, MergeStats};
use crate::config::MergeConfig;
use crate::db::Database;
use crate::models::UserId;
use crate::util::unix_millis_now;

/// Lifecycle of a queued merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// State of one queued merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeJob {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub guest_user_id: UserId,
    pub target_user_id: UserId,
    pub progress: u8,
    pub stats: Option<MergeStats>,
    pub error: Option<String>,
    pub started_at: i64,
    pub finished_at: Option<i64>,
}

/// Handle returned when a merge is queued
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeTicket {
    pub job_id: Uuid,
    pub message: String,
}

type JobTable = Arc<Mutex<HashMap<Uuid, MergeJob>>>;

/// Runs merges in the background and tracks their status
#[derive(Debug, Clone)]
pub struct MergeQueue {
    db_path: PathBuf,
    config: MergeConfig,
    locks: GuestLocks,
    jobs: JobTable,
}

impl MergeQueue {
    pub fn new(db_path: impl Into<PathBuf>, config: MergeConfig) -> Self {
        Self {
            db_path: db_path.into(),
            config,
            locks: GuestLocks::new(),
            jobs: Arc::default(),
        }
    }

    /// Lock registry shared with every merge this queue runs
    pub const fn locks(&self) -> &GuestLocks {
        &self.locks
    }

    /// Queue a merge of `guest` into `target`.
    ///
    /// Failures, including a merge already running for the same guest or a
    /// call made outside a tokio runtime, are recorded on the job.
    pub fn queue_merge(&self, guest: UserId, target: UserId) -> MergeTicket {
        self.prune_expired();

        let job_id = Uuid::now_v7();
        self.update_jobs(|jobs| {
            jobs.insert(
                job_id,
                MergeJob {
                    job_id,
                    status: JobStatus::Pending,
                    guest_user_id: guest,
                    target_user_id: target,
                    progress: 0,
                    stats: None,
                    error: None,
                    started_at: unix_millis_now(),
                    finished_at: None,
                },
            );
        });
        tracing::info!(%job_id, %guest, %target, "Merge job queued");

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let queue = self.clone();
                let task = runtime.spawn_blocking(move || queue.process(job_id, guest, target));
                let queue = self.clone();
                runtime.spawn(async move {
                    if let Err(error) = task.await {
                        tracing::error!(%job_id, %error, "Merge job aborted");
                        queue.fail_job(job_id, format!("merge task aborted: {error}"));
                    }
                });
            }
            Err(error) => {
                tracing::error!(%job_id, %error, "No async runtime for merge job");
                self.fail_job(job_id, format!("no async runtime available: {error}"));
            }
        }

        MergeTicket {
            job_id,
            message: format!("Merge queued. Track progress with job {job_id}."),
        }
    }

    /// Current state of a job, if it is still tracked
    pub fn status(&self, job_id: Uuid) -> Option<MergeJob> {
        self.lock_jobs().get(&job_id).cloned()
    }

    /// Jobs where `user` is the guest or the target, newest first
    pub fn jobs_for_user(&self, user: UserId) -> Vec<MergeJob> {
        let mut jobs: Vec<MergeJob> = self
            .lock_jobs()
            .values()
            .filter(|job| job.guest_user_id == user || job.target_user_id == user)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| b.job_id.cmp(&a.job_id))
        });
        jobs
    }

    /// Drop finished jobs that finished at least `older_than` ago
    pub fn prune_finished(&self, older_than: Duration) -> usize {
        let age = i64::try_from(older_than.as_millis()).unwrap_or(i64::MAX);
        let cutoff = unix_millis_now().saturating_sub(age);
        let mut jobs = self.lock_jobs();
        let before = jobs.len();
        jobs.retain(|_, job| {
            !(job.status.is_finished() && job.finished_at.is_some_and(|at| at <= cutoff))
        });
        let removed = before - jobs.len();
        if removed > 0 {
            tracing::debug!(removed, "Pruned finished merge jobs");
        }
        removed
    }

    /// Prune using the configured retention window
    pub fn prune_expired(&self) -> usize {
        self.prune_finished(self.config.job_retention())
    }

    fn process(&self, job_id: Uuid, guest: UserId, target: UserId) {
        self.update_job(job_id, |job| {
            job.status = JobStatus::Processing;
        });

        let merger = AccountMerger::with_locks(self.config.strategy, self.locks.clone());
        let result = Database::open_with_timeout(&self.db_path, self.config.busy_timeout())
            .and_then(|mut db| {
                merger.merge_with_progress(&mut db, guest, target, |progress| {
                    self.update_job(job_id, |job| job.progress = progress.percent);
                })
            });

        let finished_at = unix_millis_now();
        match result {
            Ok(stats) => {
                tracing::info!(%job_id, "Merge job completed");
                self.update_job(job_id, |job| {
                    job.status = JobStatus::Completed;
                    job.progress = 100;
                    job.stats = Some(stats);
                    job.finished_at = Some(finished_at);
                });
            }
            Err(error) => {
                tracing::error!(%job_id, %error, "Merge job failed");
                self.update_job(job_id, |job| {
                    job.status = JobStatus::Failed;
                    job.error = Some(error.to_string());
                    job.finished_at = Some(finished_at);
                });
            }
        }
    }

    /// Mark a job failed unless it already finished
    fn fail_job(&self, job_id: Uuid, message: String) {
        let finished_at = unix_millis_now();
        self.update_job(job_id, |job| {
            if !job.status.is_finished() {
                job.status = JobStatus::Failed;
                job.error = Some(message);
                job.finished_at = Some(finished_at);
            }
        });
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, MergeJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_jobs(&self, f: impl FnOnce(&mut HashMap<Uuid, MergeJob>)) {
        f(&mut self.lock_jobs());
    }

    fn update_job(&self, job_id: Uuid, f: impl FnOnce(&mut MergeJob)) {
        if let Some(job) = self.lock_jobs().get_mut(&job_id) {
            f(job);
        }
    }
}
