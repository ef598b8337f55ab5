use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, PoisonError,
};

use tokio::sync::mpsc;

use crate::error::QueueError;

/// Unbounded FIFO of pending work items of a single type.
///
/// Producers push lock-free through the channel sender; the consuming side
/// drains with `try_recv`, so `dequeue` never waits for an item to arrive.
pub struct JobQueue<T> {
    name: &'static str,
    sender: mpsc::UnboundedSender<T>,
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<T>>>,
    pending: Arc<AtomicUsize>,
}

impl<T> Clone for JobQueue<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            sender: self.sender.clone(),
            receiver: Arc::clone(&self.receiver),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T: Send + 'static> JobQueue<T> {
    /// Create an empty queue. `name` labels the queue in logs and errors.
    pub fn new(name: &'static str) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            name,
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append a work item at the tail of the queue.
    ///
    /// Passing `None` fails with [`QueueError::InvalidArgument`] and leaves
    /// the queue untouched.
    pub fn enqueue(&self, item: impl Into<Option<T>>) -> Result<(), QueueError> {
        let item = item.into().ok_or(QueueError::InvalidArgument)?;

        // Every handle holds the receiver, so the channel is never closed
        self.pending.fetch_add(1, Ordering::SeqCst);
        let _ = self.sender.send(item);

        tracing::debug!(queue = self.name, "Work item enqueued");
        Ok(())
    }

    /// Remove and return the item at the head of the queue, if any.
    pub fn dequeue(&self) -> Option<T> {
        let mut receiver = self
            .receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let item = receiver.try_recv().ok()?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
