use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_people_table::People;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WeightMeasurements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WeightMeasurements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WeightMeasurements::PersonId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeightMeasurements::Date)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WeightMeasurements::Weight)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_weight_measurements_person_id")
                            .from(WeightMeasurements::Table, WeightMeasurements::PersonId)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_weight_measurements_person_date")
                    .table(WeightMeasurements::Table)
                    .col(WeightMeasurements::PersonId)
                    .col(WeightMeasurements::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WeightMeasurements::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WeightMeasurements {
    Table,
    Id,
    PersonId,
    Date,
    Weight,
}
