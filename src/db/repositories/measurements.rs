use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::within_range;
use crate::db::{
    entities::{blood_pressure_measurement, weight_measurement},
    DateRange,
};

pub struct WeightMeasurementRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> WeightMeasurementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        person_id: i32,
        date: NaiveDateTime,
        weight: f64,
    ) -> Result<weight_measurement::Model, DbErr> {
        weight_measurement::ActiveModel {
            person_id: Set(person_id),
            date: Set(date),
            weight: Set(weight),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn list(
        &self,
        person_id: i32,
        range: &DateRange,
    ) -> Result<Vec<weight_measurement::Model>, DbErr> {
        let query = weight_measurement::Entity::find()
            .filter(weight_measurement::Column::PersonId.eq(person_id));

        within_range(query, weight_measurement::Column::Date, range)
            .order_by_asc(weight_measurement::Column::Date)
            .all(self.db)
            .await
    }
}

pub struct BloodPressureMeasurementRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BloodPressureMeasurementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        person_id: i32,
        date: NaiveDateTime,
        systolic: i32,
        diastolic: i32,
    ) -> Result<blood_pressure_measurement::Model, DbErr> {
        blood_pressure_measurement::ActiveModel {
            person_id: Set(person_id),
            date: Set(date),
            systolic: Set(systolic),
            diastolic: Set(diastolic),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn list(
        &self,
        person_id: i32,
        range: &DateRange,
    ) -> Result<Vec<blood_pressure_measurement::Model>, DbErr> {
        let query = blood_pressure_measurement::Entity::find()
            .filter(blood_pressure_measurement::Column::PersonId.eq(person_id));

        within_range(query, blood_pressure_measurement::Column::Date, range)
            .order_by_asc(blood_pressure_measurement::Column::Date)
            .all(self.db)
            .await
    }
}
