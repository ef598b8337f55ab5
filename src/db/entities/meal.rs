use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A meal's nutritional columns hold totals derived from its food items and
/// are only written by the nutrition recalculation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub portions: i32,
    pub calories: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meal_food_item::Entity")]
    MealFoodItem,
    #[sea_orm(has_many = "super::planned_meal::Entity")]
    PlannedMeal,
}

impl Related<super::meal_food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealFoodItem.def()
    }
}

impl Related<super::planned_meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedMeal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
