mod job_statuses;
mod meals;
mod measurements;
mod people;
mod planned_meals;

pub use job_statuses::{JobStatusFilter, JobStatusRepository};
pub use meals::{FoodItemRepository, MealFoodItemRepository, MealRepository, Nutrition};
pub use measurements::{BloodPressureMeasurementRepository, WeightMeasurementRepository};
pub use people::PersonRepository;
pub use planned_meals::PlannedMealRepository;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::db::DateRange;

/// Apply an optional, independently bounded date range to a date column.
fn within_range<E, Col>(query: Select<E>, column: Col, range: &DateRange) -> Select<E>
where
    E: EntityTrait,
    Col: ColumnTrait,
{
    let query = match range.from {
        Some(from) => query.filter(column.gte(from)),
        None => query,
    };
    match range.to {
        Some(to) => query.filter(column.lte(to)),
        None => query,
    }
}
