use chrono::{Duration, NaiveDateTime, NaiveTime};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use super::within_range;
use crate::db::{
    entities::{
        meal,
        planned_meal::{self, MealType},
    },
    DateRange,
};

pub struct PlannedMealRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PlannedMealRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        person_id: i32,
        meal_type: MealType,
        meal_id: i32,
        date: NaiveDateTime,
    ) -> Result<planned_meal::Model, DbErr> {
        planned_meal::ActiveModel {
            person_id: Set(person_id),
            meal_type: Set(meal_type),
            meal_id: Set(meal_id),
            date: Set(date),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// The planned meal a person has in the given slot on the given day, if any.
    pub async fn find(
        &self,
        person_id: i32,
        meal_type: MealType,
        date: NaiveDateTime,
    ) -> Result<Option<planned_meal::Model>, DbErr> {
        let start_of_day = date.date().and_time(NaiveTime::MIN);
        let next_day = start_of_day + Duration::days(1);

        planned_meal::Entity::find()
            .filter(planned_meal::Column::PersonId.eq(person_id))
            .filter(planned_meal::Column::MealType.eq(meal_type))
            .filter(planned_meal::Column::Date.gte(start_of_day))
            .filter(planned_meal::Column::Date.lt(next_day))
            .one(self.db)
            .await
    }

    /// A person's planned meals in the range, paired with the planned meal's
    /// name and ordered by date.
    pub async fn list_named(
        &self,
        person_id: i32,
        range: &DateRange,
    ) -> Result<Vec<(planned_meal::Model, String)>, DbErr> {
        let query = planned_meal::Entity::find()
            .filter(planned_meal::Column::PersonId.eq(person_id));

        let planned = within_range(query, planned_meal::Column::Date, range)
            .order_by_asc(planned_meal::Column::Date)
            .order_by_asc(planned_meal::Column::Id)
            .find_also_related(meal::Entity)
            .all(self.db)
            .await?;

        Ok(planned
            .into_iter()
            .filter_map(|(planned, meal)| Some((planned, meal?.name)))
            .collect())
    }

    /// Delete a person's planned meals scheduled before the start of the
    /// cutoff day. Returns the number of rows removed.
    pub async fn purge(&self, person_id: i32, cutoff: NaiveDateTime) -> Result<u64, DbErr> {
        let start_of_day = cutoff.date().and_time(NaiveTime::MIN);

        let result = planned_meal::Entity::delete_many()
            .filter(planned_meal::Column::PersonId.eq(person_id))
            .filter(planned_meal::Column::Date.lt(start_of_day))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
