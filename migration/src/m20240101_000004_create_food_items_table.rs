use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FoodItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FoodItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FoodItems::Name)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FoodItems::Portion).double().not_null())
                    .col(ColumnDef::new(FoodItems::Calories).double())
                    .col(ColumnDef::new(FoodItems::Fat).double())
                    .col(ColumnDef::new(FoodItems::Protein).double())
                    .col(ColumnDef::new(FoodItems::Carbohydrates).double())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FoodItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FoodItems {
    Table,
    Id,
    Name,
    Portion,
    Calories,
    Fat,
    Protein,
    Carbohydrates,
}
