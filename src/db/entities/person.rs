use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "people")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_names: String,
    pub surname: String,
    pub date_of_birth: Date,
    pub height: f64,
    pub gender: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::weight_measurement::Entity")]
    WeightMeasurement,
    #[sea_orm(has_many = "super::blood_pressure_measurement::Entity")]
    BloodPressureMeasurement,
    #[sea_orm(has_many = "super::planned_meal::Entity")]
    PlannedMeal,
}

impl Related<super::weight_measurement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeightMeasurement.def()
    }
}

impl Related<super::blood_pressure_measurement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BloodPressureMeasurement.def()
    }
}

impl Related<super::planned_meal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedMeal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.surname)
    }
}
