use std::fmt;

use sea_orm::{DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::{
    db::repositories::JobStatusRepository,
    error::QueueError,
    jobs::{registry::JobQueues, work_items::WorkItem},
};

type FollowUp = Box<dyn FnOnce(&JobQueues) -> Result<(), QueueError> + Send + Sync>;

/// Result of a successful job execution.
///
/// Follow-up work items requested by a processor are only enqueued once the
/// execution scope has been committed.
#[derive(Default)]
pub struct JobOutcome {
    pub records: Option<u64>,
    follow_ups: Vec<FollowUp>,
}

impl JobOutcome {
    pub fn records(count: u64) -> Self {
        Self {
            records: Some(count),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Request `item` to be enqueued after the execution commits.
    pub fn then_enqueue<T: WorkItem>(mut self, item: T) -> Self {
        self.follow_ups
            .push(Box::new(move |queues: &JobQueues| queues.enqueue(item)));
        self
    }

    pub fn pending_follow_ups(&self) -> usize {
        self.follow_ups.len()
    }

    /// Enqueue every requested follow-up, stopping at the first failure.
    pub fn enqueue_follow_ups(&mut self, queues: &JobQueues) -> Result<(), QueueError> {
        for follow_up in self.follow_ups.drain(..) {
            follow_up(queues)?;
        }
        Ok(())
    }
}

impl fmt::Debug for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobOutcome")
            .field("records", &self.records)
            .field("follow_ups", &self.follow_ups.len())
            .finish()
    }
}

/// Records the start and the outcome of every job execution.
#[derive(Clone)]
pub struct JobStatusRecorder {
    db: DatabaseConnection,
}

impl JobStatusRecorder {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a running status record named after the work item, with the
    /// item itself as parameters.
    pub async fn start<T: WorkItem>(&self, item: &T) -> Result<Uuid, DbErr> {
        let parameters = match serde_json::to_string(item) {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::warn!("Failed to serialise parameters for {}: {}", item.job_name(), e);
                None
            }
        };

        let status = JobStatusRepository::new(&self.db)
            .create(item.job_name(), parameters)
            .await?;

        Ok(status.id)
    }

    pub async fn complete(&self, id: Uuid, outcome: &JobOutcome) -> Result<(), DbErr> {
        let records = outcome
            .records
            .map(|count| i64::try_from(count).unwrap_or(i64::MAX));

        JobStatusRepository::new(&self.db)
            .finish(id, records, None)
            .await?;
        Ok(())
    }

    pub async fn fail(&self, id: Uuid, error: &anyhow::Error) -> Result<(), DbErr> {
        JobStatusRepository::new(&self.db)
            .finish(id, None, Some(format!("{:#}", error)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::work_items::{MealExport, MealFoodItemExport};

    #[test]
    fn follow_ups_wait_until_requested() {
        let mut queues = JobQueues::new();
        let queue = queues.register::<MealFoodItemExport>();

        let mut outcome = JobOutcome::records(3).then_enqueue(MealFoodItemExport {
            file_name: "meals-FoodItems.csv".to_string(),
            ..Default::default()
        });
        assert_eq!(outcome.pending_follow_ups(), 1);
        assert!(queue.is_empty());

        outcome.enqueue_follow_ups(&queues).unwrap();
        assert_eq!(outcome.pending_follow_ups(), 0);
        assert_eq!(queue.dequeue().unwrap().file_name, "meals-FoodItems.csv");
    }

    #[test]
    fn unregistered_follow_up_is_reported() {
        let queues = JobQueues::new();
        let mut outcome = JobOutcome::empty().then_enqueue(MealExport::default());

        assert_eq!(
            outcome.enqueue_follow_ups(&queues),
            Err(QueueError::NotRegistered("Meal Export".to_string()))
        );
    }
}
