use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "food_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub portion: f64,
    pub calories: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meal_food_item::Entity")]
    MealFoodItem,
}

impl Related<super::meal_food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealFoodItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
