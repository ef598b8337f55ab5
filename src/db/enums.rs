use serde::{Deserialize, Serialize};

use crate::db::entities::job_status;

/// Lifecycle state of a background job, derived from its status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn of(status: &job_status::Model) -> Self {
        match (&status.completed_at, &status.error) {
            (None, _) => Self::Running,
            (Some(_), None) => Self::Succeeded,
            (Some(_), Some(_)) => Self::Failed,
        }
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> String {
        state.as_str().to_string()
    }
}

