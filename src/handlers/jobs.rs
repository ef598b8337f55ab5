use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{
        entities::job_status,
        enums::JobState,
        repositories::{JobStatusFilter, JobStatusRepository},
    },
    error::{AppError, Result},
    jobs::WorkItem,
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Stamp the canonical job name on a submitted work item and queue it.
/// A `null` body is rejected by the queue.
pub async fn enqueue<T>(
    State(state): State<AppState>,
    Json(item): Json<Option<T>>,
) -> Result<StatusCode>
where
    T: WorkItem + DeserializeOwned,
{
    let item = item.map(|mut item| {
        item.set_job_name(T::JOB_NAME);
        item
    });

    state.queues.enqueue_optional(item)?;
    tracing::debug!("{} queued", T::JOB_NAME);

    Ok(StatusCode::ACCEPTED)
}

#[derive(Debug, Deserialize)]
pub struct JobStatusQuery {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub id: Uuid,
    pub name: String,
    pub state: String,
    pub parameters: Option<String>,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub records_processed: Option<i64>,
    pub error: Option<String>,
}

impl From<job_status::Model> for JobStatusResponse {
    fn from(status: job_status::Model) -> Self {
        Self {
            id: status.id,
            state: JobState::of(&status).into(),
            name: status.name,
            parameters: status.parameters,
            started_at: status.started_at.to_rfc3339(),
            completed_at: status.completed_at.map(|dt| dt.to_rfc3339()),
            records_processed: status.records_processed,
            error: status.error,
        }
    }
}

/// Page through job status records, newest first. Responds with
/// `204 No Content` when the page is empty.
pub async fn list_job_statuses(
    State(state): State<AppState>,
    Query(query): Query<JobStatusQuery>,
) -> Result<Response> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 || page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "page must be at least 1 and page_size between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let filter = JobStatusFilter {
        from: query.from,
        to: query.to,
    };
    let statuses = JobStatusRepository::new(&state.db)
        .list(&filter, page, page_size)
        .await?;

    if statuses.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let responses: Vec<JobStatusResponse> =
        statuses.into_iter().map(JobStatusResponse::from).collect();

    Ok(Json(responses).into_response())
}
