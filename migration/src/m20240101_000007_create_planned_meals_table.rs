use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_people_table::People;
use super::m20240101_000005_create_meals_table::Meals;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PlannedMeals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlannedMeals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlannedMeals::PersonId).integer().not_null())
                    .col(
                        ColumnDef::new(PlannedMeals::MealType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlannedMeals::MealId).integer().not_null())
                    .col(ColumnDef::new(PlannedMeals::Date).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_planned_meals_person_id")
                            .from(PlannedMeals::Table, PlannedMeals::PersonId)
                            .to(People::Table, People::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_planned_meals_meal_id")
                            .from(PlannedMeals::Table, PlannedMeals::MealId)
                            .to(Meals::Table, Meals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_planned_meals_person_date")
                    .table(PlannedMeals::Table)
                    .col(PlannedMeals::PersonId)
                    .col(PlannedMeals::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlannedMeals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PlannedMeals {
    Table,
    Id,
    PersonId,
    MealType,
    MealId,
    Date,
}
