use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::db::entities::job_status;

/// Optional bounds for listing job statuses: jobs started at or after `from`
/// that are either still running or finished by `to`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobStatusFilter {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

pub struct JobStatusRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> JobStatusRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: &str,
        parameters: Option<String>,
    ) -> Result<job_status::Model, DbErr> {
        job_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            parameters: Set(parameters),
            started_at: Set(Utc::now().into()),
            completed_at: Set(None),
            records_processed: Set(None),
            error: Set(None),
        }
        .insert(self.db)
        .await
    }

    /// Stamp the completion time and outcome on a running status. Finished
    /// records are left untouched.
    pub async fn finish(
        &self,
        id: Uuid,
        records_processed: Option<i64>,
        error: Option<String>,
    ) -> Result<Option<job_status::Model>, DbErr> {
        let Some(status) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if status.is_finished() {
            return Ok(Some(status));
        }

        let mut active: job_status::ActiveModel = status.into();
        active.completed_at = Set(Some(Utc::now().into()));
        active.records_processed = Set(records_processed);
        active.error = Set(error);

        Ok(Some(active.update(self.db).await?))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<job_status::Model>, DbErr> {
        job_status::Entity::find_by_id(id).one(self.db).await
    }

    /// Page through statuses, most recently started first. Pages are 1-based.
    pub async fn list(
        &self,
        filter: &JobStatusFilter,
        page_number: u64,
        page_size: u64,
    ) -> Result<Vec<job_status::Model>, DbErr> {
        let mut query = job_status::Entity::find();

        if let Some(from) = filter.from {
            query = query.filter(job_status::Column::StartedAt.gte(from));
        }

        if let Some(to) = filter.to {
            query = query.filter(
                Condition::any()
                    .add(job_status::Column::CompletedAt.is_null())
                    .add(job_status::Column::CompletedAt.lte(to)),
            );
        }

        query
            .order_by_desc(job_status::Column::StartedAt)
            .offset(page_number.saturating_sub(1) * page_size)
            .limit(page_size)
            .all(self.db)
            .await
    }
}
