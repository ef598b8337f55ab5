use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set};

use crate::db::entities::person;

pub struct PersonRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PersonRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        first_names: &str,
        surname: &str,
        date_of_birth: NaiveDate,
        height: f64,
        gender: &str,
    ) -> Result<person::Model, DbErr> {
        person::ActiveModel {
            first_names: Set(first_names.to_string()),
            surname: Set(surname.to_string()),
            date_of_birth: Set(date_of_birth),
            height: Set(height),
            gender: Set(gender.to_string()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<person::Model>, DbErr> {
        person::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn list_all(&self) -> Result<Vec<person::Model>, DbErr> {
        person::Entity::find()
            .order_by_asc(person::Column::Id)
            .all(self.db)
            .await
    }
}
