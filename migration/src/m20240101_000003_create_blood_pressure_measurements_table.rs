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
                    .table(BloodPressureMeasurements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BloodPressureMeasurements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BloodPressureMeasurements::PersonId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodPressureMeasurements::Date)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodPressureMeasurements::Systolic)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BloodPressureMeasurements::Diastolic)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blood_pressure_measurements_person_id")
                            .from(
                                BloodPressureMeasurements::Table,
                                BloodPressureMeasurements::PersonId,
                            )
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blood_pressure_measurements_person_date")
                    .table(BloodPressureMeasurements::Table)
                    .col(BloodPressureMeasurements::PersonId)
                    .col(BloodPressureMeasurements::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(BloodPressureMeasurements::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum BloodPressureMeasurements {
    Table,
    Id,
    PersonId,
    Date,
    Systolic,
    Diastolic,
}
