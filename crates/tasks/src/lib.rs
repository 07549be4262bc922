use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Job not found: {0}")]
    NotFound(String),
    #[error("Job already exists: {0}")]
    AlreadyExists(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobInfo {
    pub id: String,
    pub group: String,
    pub period_ms: u64,
    pub created_at: i64,
}

struct JobHandle {
    info: JobInfo,
    handle: JoinHandle<()>,
}

/// Named recurring jobs, each running on its own tokio task.
///
/// A job's first tick fires one full period after it is spawned.
#[derive(Clone)]
pub struct JobManager {
    jobs: Arc<RwLock<HashMap<String, JobHandle>>>,
}

impl JobManager {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn spawn_recurring<F, Fut>(
        &self,
        id: impl Into<String>,
        group: impl Into<String>,
        period: Duration,
        mut job: F,
    ) -> Result<(), JobError>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let id = id.into();
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&id) {
            return Err(JobError::AlreadyExists(id));
        }

        let info = JobInfo {
            id: id.clone(),
            group: group.into(),
            period_ms: period.as_millis() as u64,
            created_at: chrono::Utc::now().timestamp(),
        };

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                job().await;
            }
        });

        jobs.insert(id.clone(), JobHandle { info, handle });
        tracing::info!("Spawned job: {} every {:?}", id, period);
        Ok(())
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.jobs.read().await.contains_key(id)
    }

    pub async fn cancel(&self, id: &str) -> Result<(), JobError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .remove(id)
            .ok_or_else(|| JobError::NotFound(id.to_string()))?;
        job.handle.abort();
        tracing::info!("Cancelled job: {}", id);
        Ok(())
    }

    /// Cancels every job matching `pred`, returning the cancelled ids.
    pub async fn cancel_where<P>(&self, pred: P) -> Vec<String>
    where
        P: Fn(&JobInfo) -> bool,
    {
        let mut jobs = self.jobs.write().await;
        let ids: Vec<String> = jobs
            .values()
            .filter(|job| pred(&job.info))
            .map(|job| job.info.id.clone())
            .collect();

        for id in &ids {
            if let Some(job) = jobs.remove(id) {
                job.handle.abort();
            }
        }
        tracing::info!("Cancelled {} job(s)", ids.len());
        ids
    }

    pub async fn cancel_all(&self) -> usize {
        let mut jobs = self.jobs.write().await;
        let count = jobs.len();
        for (_, job) in jobs.drain() {
            job.handle.abort();
        }
        tracing::info!("Cancelled all {} job(s)", count);
        count
    }

    /// Jobs sorted by id, optionally limited to one group.
    pub async fn list(&self, group: Option<&str>) -> Vec<JobInfo> {
        let jobs = self.jobs.read().await;
        let mut result: Vec<JobInfo> = jobs
            .values()
            .filter(|job| group.map_or(true, |g| job.info.group == g))
            .map(|job| job.info.clone())
            .collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        result
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new()
    }
}
