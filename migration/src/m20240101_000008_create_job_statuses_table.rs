use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobStatuses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JobStatuses::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobStatuses::Parameters).text())
                    .col(
                        ColumnDef::new(JobStatuses::StartedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobStatuses::CompletedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(JobStatuses::RecordsProcessed).big_integer())
                    .col(ColumnDef::new(JobStatuses::Error).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_statuses_started_at")
                    .table(JobStatuses::Table)
                    .col(JobStatuses::StartedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobStatuses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum JobStatuses {
    Table,
    Id,
    Name,
    Parameters,
    StartedAt,
    CompletedAt,
    RecordsProcessed,
    Error,
}
