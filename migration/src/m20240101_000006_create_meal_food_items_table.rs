use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_food_items_table::FoodItems;
use super::m20240101_000005_create_meals_table::Meals;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MealFoodItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MealFoodItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MealFoodItems::MealId).integer().not_null())
                    .col(
                        ColumnDef::new(MealFoodItems::FoodItemId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MealFoodItems::Quantity)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meal_food_items_meal_id")
                            .from(MealFoodItems::Table, MealFoodItems::MealId)
                            .to(Meals::Table, Meals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meal_food_items_food_item_id")
                            .from(MealFoodItems::Table, MealFoodItems::FoodItemId)
                            .to(FoodItems::Table, FoodItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meal_food_items_meal_id")
                    .table(MealFoodItems::Table)
                    .col(MealFoodItems::MealId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MealFoodItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MealFoodItems {
    Table,
    Id,
    MealId,
    FoodItemId,
    Quantity,
}
