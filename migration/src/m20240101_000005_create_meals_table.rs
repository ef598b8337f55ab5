use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meals::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Meals::Name)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Meals::Portions)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Meals::Calories).double())
                    .col(ColumnDef::new(Meals::Fat).double())
                    .col(ColumnDef::new(Meals::Protein).double())
                    .col(ColumnDef::new(Meals::Carbohydrates).double())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Meals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Meals {
    Table,
    Id,
    Name,
    Portions,
    Calories,
    Fat,
    Protein,
    Carbohydrates,
}
