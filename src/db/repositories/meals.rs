use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::db::entities::{food_item, meal, meal_food_item};

pub struct FoodItemRepository<'a, C> {
    db: &'a C,
}

/// Nutritional values of a food item portion or a whole meal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
}

impl From<&food_item::Model> for Nutrition {
    fn from(item: &food_item::Model) -> Self {
        Self {
            calories: item.calories,
            fat: item.fat,
            protein: item.protein,
            carbohydrates: item.carbohydrates,
        }
    }
}

impl From<&meal::Model> for Nutrition {
    fn from(meal: &meal::Model) -> Self {
        Self {
            calories: meal.calories,
            fat: meal.fat,
            protein: meal.protein,
            carbohydrates: meal.carbohydrates,
        }
    }
}

impl Nutrition {
    /// Add `quantity` portions of `item` to the running totals. A value stays
    /// unset until at least one contributing food item provides it.
    fn accumulate(&mut self, item: &food_item::Model, quantity: f64) {
        fn add(total: &mut Option<f64>, value: Option<f64>, quantity: f64) {
            if let Some(value) = value {
                *total = Some(total.unwrap_or(0.0) + value * quantity);
            }
        }

        add(&mut self.calories, item.calories, quantity);
        add(&mut self.fat, item.fat, quantity);
        add(&mut self.protein, item.protein, quantity);
        add(&mut self.carbohydrates, item.carbohydrates, quantity);
    }
}

impl<'a, C: ConnectionTrait> FoodItemRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: &str,
        portion: f64,
        nutrition: Nutrition,
    ) -> Result<food_item::Model, DbErr> {
        food_item::ActiveModel {
            name: Set(name.to_string()),
            portion: Set(portion),
            calories: Set(nutrition.calories),
            fat: Set(nutrition.fat),
            protein: Set(nutrition.protein),
            carbohydrates: Set(nutrition.carbohydrates),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<food_item::Model>, DbErr> {
        food_item::Entity::find()
            .filter(food_item::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<food_item::Model>, DbErr> {
        food_item::Entity::find()
            .order_by_asc(food_item::Column::Name)
            .all(self.db)
            .await
    }
}

pub struct MealRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MealRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        name: &str,
        portions: i32,
        nutrition: Nutrition,
    ) -> Result<meal::Model, DbErr> {
        meal::ActiveModel {
            name: Set(name.to_string()),
            portions: Set(portions),
            calories: Set(nutrition.calories),
            fat: Set(nutrition.fat),
            protein: Set(nutrition.protein),
            carbohydrates: Set(nutrition.carbohydrates),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<meal::Model>, DbErr> {
        meal::Entity::find()
            .filter(meal::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<meal::Model>, DbErr> {
        meal::Entity::find()
            .order_by_asc(meal::Column::Name)
            .all(self.db)
            .await
    }

    /// Recompute the nutritional totals of every meal from its food items.
    /// Meals without food items end up with no values. Returns the number of
    /// meals updated.
    pub async fn update_all_nutritional_values(&self) -> Result<u64, DbErr> {
        let relationships = meal_food_item::Entity::find()
            .find_also_related(food_item::Entity)
            .all(self.db)
            .await?;

        let mut totals: HashMap<i32, Nutrition> = HashMap::new();
        for (relationship, item) in relationships {
            if let Some(item) = item {
                totals
                    .entry(relationship.meal_id)
                    .or_default()
                    .accumulate(&item, relationship.quantity);
            }
        }

        let meals = meal::Entity::find().all(self.db).await?;
        let mut updated = 0;
        for meal_model in meals {
            let nutrition = totals.remove(&meal_model.id).unwrap_or_default();
            let mut active: meal::ActiveModel = meal_model.into();
            active.calories = Set(nutrition.calories);
            active.fat = Set(nutrition.fat);
            active.protein = Set(nutrition.protein);
            active.carbohydrates = Set(nutrition.carbohydrates);
            active.update(self.db).await?;
            updated += 1;
        }

        Ok(updated)
    }
}

pub struct MealFoodItemRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MealFoodItemRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        meal_id: i32,
        food_item_id: i32,
        quantity: f64,
    ) -> Result<meal_food_item::Model, DbErr> {
        meal_food_item::ActiveModel {
            meal_id: Set(meal_id),
            food_item_id: Set(food_item_id),
            quantity: Set(quantity),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// All relationships paired with the names of the meal and food item they
    /// link, ordered by meal then food item.
    pub async fn list_named(&self) -> Result<Vec<(String, String, f64)>, DbErr> {
        let meal_names: HashMap<i32, String> = meal::Entity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, m.name))
            .collect();

        let relationships = meal_food_item::Entity::find()
            .find_also_related(food_item::Entity)
            .all(self.db)
            .await?;

        let mut named: Vec<(String, String, f64)> = relationships
            .into_iter()
            .filter_map(|(relationship, item)| {
                let meal_name = meal_names.get(&relationship.meal_id)?.clone();
                Some((meal_name, item?.name, relationship.quantity))
            })
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        Ok(named)
    }
}
