use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use anyhow::anyhow;
use async_trait::async_trait;
use futures::FutureExt;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;

use crate::jobs::{
    context::{ExecutionContext, ExecutionContextFactory},
    queue::JobQueue,
    registry::JobQueues,
    status::{JobOutcome, JobStatusRecorder},
    work_items::WorkItem,
};

/// Delay between polls of an empty queue.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The job-specific step executed for each dequeued work item. Chained work
/// is requested through [`JobOutcome::then_enqueue`].
#[async_trait]
pub trait JobProcessor<T: WorkItem>: Send + Sync + 'static {
    async fn process(&self, item: &T, context: &ExecutionContext) -> anyhow::Result<JobOutcome>;
}

/// Long running consumer of one queue.
///
/// Each item runs in its own execution scope, committed when the processor
/// succeeds and rolled back otherwise. Follow-up items are enqueued after the
/// commit. Failures, including panics, are recorded on the item's status and
/// never stop the loop.
pub struct Worker<T, P> {
    queue: JobQueue<T>,
    processor: P,
    contexts: ExecutionContextFactory,
    statuses: JobStatusRecorder,
    queues: Arc<JobQueues>,
    poll_interval: Duration,
}

impl<T, P> Worker<T, P>
where
    T: WorkItem,
    P: JobProcessor<T>,
{
    pub fn new(
        queue: JobQueue<T>,
        processor: P,
        db: DatabaseConnection,
        queues: Arc<JobQueues>,
    ) -> Self {
        Self {
            queue,
            processor,
            contexts: ExecutionContextFactory::new(db.clone()),
            statuses: JobStatusRecorder::new(db),
            queues,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn contexts(&self) -> &ExecutionContextFactory {
        &self.contexts
    }

    /// Poll the queue until `shutdown` is cancelled. An item already being
    /// executed when shutdown is requested runs to completion.
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!("{} worker started", self.queue.name());

        while !shutdown.is_cancelled() {
            if self.process_next().await {
                continue;
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        tracing::info!("{} worker stopped", self.queue.name());
    }

    /// Execute the item at the head of the queue, if there is one. Returns
    /// whether an item was processed.
    pub async fn process_next(&self) -> bool {
        let Some(item) = self.queue.dequeue() else {
            return false;
        };

        let job_name = item.job_name().to_string();
        tracing::info!("Dequeued {} work item", job_name);

        let status_id = match self.statuses.start(&item).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!("Failed to record start of {}: {}", job_name, e);
                None
            }
        };

        let result = self.execute(&item).await;

        let recorded = match &result {
            Ok(outcome) => {
                match outcome.records {
                    Some(count) => tracing::info!("{} completed: {} record(s)", job_name, count),
                    None => tracing::info!("{} completed", job_name),
                }
                match status_id {
                    Some(id) => self.statuses.complete(id, outcome).await,
                    None => Ok(()),
                }
            }
            Err(e) => {
                tracing::error!("{} failed: {:#}", job_name, e);
                match status_id {
                    Some(id) => self.statuses.fail(id, e).await,
                    None => Ok(()),
                }
            }
        };

        if let Err(e) = recorded {
            tracing::error!("Failed to record outcome of {}: {}", job_name, e);
        }

        true
    }

    /// Run the processor inside a fresh scope, releasing the scope on every
    /// path before returning. A follow-up that cannot be enqueued fails the
    /// item even though its scope has been committed.
    async fn execute(&self, item: &T) -> anyhow::Result<JobOutcome> {
        let context = self.contexts.create_scope().await?;

        let result = AssertUnwindSafe(self.processor.process(item, &context))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(anyhow!("job panicked: {}", panic_message(&*panic))));

        match result {
            Ok(mut outcome) => {
                context.commit().await?;
                if outcome.pending_follow_ups() > 0 {
                    tracing::debug!(
                        "Enqueueing {} follow-up items of {}",
                        outcome.pending_follow_ups(),
                        item.job_name()
                    );
                }
                outcome.enqueue_follow_ups(&self.queues)?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(rollback) = context.rollback().await {
                    tracing::warn!("Rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
