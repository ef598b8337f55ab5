pub mod context;
pub mod queue;
pub mod registry;
pub mod status;
pub mod work_items;
pub mod worker;

pub use context::{ExecutionContext, ExecutionContextFactory};
pub use queue::JobQueue;
pub use registry::JobQueues;
pub use status::{JobOutcome, JobStatusRecorder};
pub use work_items::*;
pub use worker::{JobProcessor, Worker, DEFAULT_POLL_INTERVAL};
