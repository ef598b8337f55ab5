use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use crate::{
    error::QueueError,
    jobs::{queue::JobQueue, work_items::WorkItem},
};

/// One queue per work item type, built at start-up and shared by producers,
/// workers and chaining processors.
#[derive(Default)]
pub struct JobQueues {
    queues: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl JobQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the queue for `T`, returning a handle to it. Registering the
    /// same type twice returns the existing queue.
    pub fn register<T: WorkItem>(&mut self) -> JobQueue<T> {
        if let Ok(queue) = self.get::<T>() {
            return queue;
        }

        let queue = JobQueue::<T>::new(T::JOB_NAME);
        self.queues
            .insert(TypeId::of::<T>(), Box::new(queue.clone()));
        tracing::debug!(queue = T::JOB_NAME, "Job queue registered");
        queue
    }

    pub fn get<T: WorkItem>(&self) -> Result<JobQueue<T>, QueueError> {
        self.queues
            .get(&TypeId::of::<T>())
            .and_then(|queue| queue.downcast_ref::<JobQueue<T>>())
            .cloned()
            .ok_or_else(|| QueueError::NotRegistered(T::JOB_NAME.to_string()))
    }

    /// Enqueue onto the queue registered for `T`.
    pub fn enqueue<T: WorkItem>(&self, item: T) -> Result<(), QueueError> {
        self.enqueue_optional(Some(item))
    }

    /// Enqueue an item that may be absent, as submitted by a producer. An
    /// absent item is rejected by the target queue.
    pub fn enqueue_optional<T: WorkItem>(&self, item: Option<T>) -> Result<(), QueueError> {
        self.get::<T>()?.enqueue(item)
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::work_items::{MealExport, MealFoodItemExport};

    #[test]
    fn enqueue_reaches_the_registered_queue() {
        let mut queues = JobQueues::new();
        let queue = queues.register::<MealExport>();

        queues
            .enqueue(MealExport {
                file_name: "meals.csv".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.dequeue().unwrap().file_name, "meals.csv");
    }

    #[test]
    fn unregistered_type_is_reported_by_job_name() {
        let queues = JobQueues::new();
        let result = queues.enqueue(MealFoodItemExport::default());

        assert_eq!(
            result,
            Err(QueueError::NotRegistered("Meal Food Item Export".to_string()))
        );
    }

    #[test]
    fn registering_twice_shares_one_queue() {
        let mut queues = JobQueues::new();
        let first = queues.register::<MealExport>();
        let second = queues.register::<MealExport>();

        first.enqueue(MealExport::default()).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(queues.len(), 1);
    }

    #[test]
    fn absent_item_is_rejected_by_the_queue() {
        let mut queues = JobQueues::new();
        let queue = queues.register::<MealExport>();

        assert_eq!(
            queues.enqueue_optional::<MealExport>(None),
            Err(QueueError::InvalidArgument)
        );
        assert!(queue.is_empty());
    }
}
