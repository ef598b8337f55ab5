use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per background job execution. `completed_at` stays empty while
/// the job is in flight; a failed job carries its error text.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_statuses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub parameters: Option<String>,
    pub started_at: DateTimeWithTimeZone,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub records_processed: Option<i64>,
    pub error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_finished(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn succeeded(&self) -> bool {
        self.is_finished() && self.error.is_none()
    }
}
