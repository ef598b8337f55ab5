pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_people_table;
mod m20240101_000002_create_weight_measurements_table;
mod m20240101_000003_create_blood_pressure_measurements_table;
mod m20240101_000004_create_food_items_table;
mod m20240101_000005_create_meals_table;
mod m20240101_000006_create_meal_food_items_table;
mod m20240101_000007_create_planned_meals_table;
mod m20240101_000008_create_job_statuses_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_people_table::Migration),
            Box::new(m20240101_000002_create_weight_measurements_table::Migration),
            Box::new(m20240101_000003_create_blood_pressure_measurements_table::Migration),
            Box::new(m20240101_000004_create_food_items_table::Migration),
            Box::new(m20240101_000005_create_meals_table::Migration),
            Box::new(m20240101_000006_create_meal_food_items_table::Migration),
            Box::new(m20240101_000007_create_planned_meals_table::Migration),
            Box::new(m20240101_000008_create_job_statuses_table::Migration),
        ]
    }
}
