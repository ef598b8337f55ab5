use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    db::{
        entities::{
            blood_pressure_measurement, food_item, meal, person,
            planned_meal::{self, MealType},
            weight_measurement,
        },
        repositories::Nutrition,
    },
    error::ExchangeError,
    exchange::{
        field, format_optional, parse_date, parse_optional, parse_timestamp, parse_value,
        CsvRecord, Importable, DATE_FORMAT, TIMESTAMP_FORMAT,
    },
    jobs::ExecutionContext,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    pub first_names: String,
    pub surname: String,
    pub date_of_birth: NaiveDate,
    pub height: f64,
    pub gender: String,
}

impl From<&person::Model> for PersonRecord {
    fn from(person: &person::Model) -> Self {
        Self {
            first_names: person.first_names.clone(),
            surname: person.surname.clone(),
            date_of_birth: person.date_of_birth,
            height: person.height,
            gender: person.gender.clone(),
        }
    }
}

impl CsvRecord for PersonRecord {
    const HEADER: &'static [&'static str] =
        &["FirstNames", "Surname", "DateOfBirth", "Height", "Gender"];
    const PATTERN: &'static str =
        r#"^("[^"]*",){2}"[0-9]+/[0-9]+/[0-9]+","[0-9.]+","[^"]*"$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            first_names: field(fields, 0, "FirstNames", line)?.to_string(),
            surname: field(fields, 1, "Surname", line)?.to_string(),
            date_of_birth: parse_date(field(fields, 2, "DateOfBirth", line)?, "DateOfBirth", line)?,
            height: parse_value(field(fields, 3, "Height", line)?, "Height", line)?,
            gender: field(fields, 4, "Gender", line)?.to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.first_names.clone(),
            self.surname.clone(),
            self.date_of_birth.format(DATE_FORMAT).to_string(),
            self.height.to_string(),
            self.gender.clone(),
        ]
    }
}

#[async_trait]
impl Importable for PersonRecord {
    const SINGULAR: &'static str = "person";
    const PLURAL: &'static str = "people";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        context
            .people()
            .create(
                &self.first_names,
                &self.surname,
                self.date_of_birth,
                self.height,
                &self.gender,
            )
            .await?;
        Ok(())
    }
}

async fn require_person(context: &ExecutionContext, person_id: i32) -> Result<(), ExchangeError> {
    match context.people().find_by_id(person_id).await? {
        Some(_) => Ok(()),
        None => Err(ExchangeError::UnknownReference {
            kind: "person",
            reference: person_id.to_string(),
        }),
    }
}

/// Weight measurement, exported with the person's name for readability.
/// The name is ignored on import.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMeasurementRecord {
    pub person_id: i32,
    pub name: String,
    pub date: NaiveDateTime,
    pub weight: f64,
}

impl WeightMeasurementRecord {
    pub fn new(name: &str, measurement: &weight_measurement::Model) -> Self {
        Self {
            person_id: measurement.person_id,
            name: name.to_string(),
            date: measurement.date,
            weight: measurement.weight,
        }
    }
}

impl CsvRecord for WeightMeasurementRecord {
    const HEADER: &'static [&'static str] = &["PersonId", "Name", "Date", "Weight"];
    const PATTERN: &'static str =
        r#"^"[0-9]+","[^"]*","[0-9]+/[0-9]+/[0-9]+ [0-9]+:[0-9]+:[0-9]+","[0-9.]+"$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            person_id: parse_value(field(fields, 0, "PersonId", line)?, "PersonId", line)?,
            name: field(fields, 1, "Name", line)?.to_string(),
            date: parse_timestamp(field(fields, 2, "Date", line)?, "Date", line)?,
            weight: parse_value(field(fields, 3, "Weight", line)?, "Weight", line)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.person_id.to_string(),
            self.name.clone(),
            self.date.format(TIMESTAMP_FORMAT).to_string(),
            self.weight.to_string(),
        ]
    }
}

#[async_trait]
impl Importable for WeightMeasurementRecord {
    const SINGULAR: &'static str = "weight measurement";
    const PLURAL: &'static str = "weight measurements";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        require_person(context, self.person_id).await?;
        context
            .weight_measurements()
            .create(self.person_id, self.date, self.weight)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BloodPressureMeasurementRecord {
    pub person_id: i32,
    pub name: String,
    pub date: NaiveDateTime,
    pub systolic: i32,
    pub diastolic: i32,
}

impl BloodPressureMeasurementRecord {
    pub fn new(name: &str, measurement: &blood_pressure_measurement::Model) -> Self {
        Self {
            person_id: measurement.person_id,
            name: name.to_string(),
            date: measurement.date,
            systolic: measurement.systolic,
            diastolic: measurement.diastolic,
        }
    }
}

impl CsvRecord for BloodPressureMeasurementRecord {
    const HEADER: &'static [&'static str] =
        &["PersonId", "Name", "Date", "Systolic", "Diastolic"];
    const PATTERN: &'static str = r#"^"[0-9]+","[^"]*","[0-9]+/[0-9]+/[0-9]+ [0-9]+:[0-9]+:[0-9]+","[0-9]+","[0-9]+"$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            person_id: parse_value(field(fields, 0, "PersonId", line)?, "PersonId", line)?,
            name: field(fields, 1, "Name", line)?.to_string(),
            date: parse_timestamp(field(fields, 2, "Date", line)?, "Date", line)?,
            systolic: parse_value(field(fields, 3, "Systolic", line)?, "Systolic", line)?,
            diastolic: parse_value(field(fields, 4, "Diastolic", line)?, "Diastolic", line)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.person_id.to_string(),
            self.name.clone(),
            self.date.format(TIMESTAMP_FORMAT).to_string(),
            self.systolic.to_string(),
            self.diastolic.to_string(),
        ]
    }
}

#[async_trait]
impl Importable for BloodPressureMeasurementRecord {
    const SINGULAR: &'static str = "blood pressure measurement";
    const PLURAL: &'static str = "blood pressure measurements";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        require_person(context, self.person_id).await?;
        context
            .blood_pressure_measurements()
            .create(self.person_id, self.date, self.systolic, self.diastolic)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoodItemRecord {
    pub name: String,
    pub portion: f64,
    pub calories: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
    pub carbohydrates: Option<f64>,
}

impl FoodItemRecord {
    fn nutrition(&self) -> Nutrition {
        Nutrition {
            calories: self.calories,
            fat: self.fat,
            protein: self.protein,
            carbohydrates: self.carbohydrates,
        }
    }
}

impl From<&food_item::Model> for FoodItemRecord {
    fn from(item: &food_item::Model) -> Self {
        Self {
            name: item.name.clone(),
            portion: item.portion,
            calories: item.calories,
            fat: item.fat,
            protein: item.protein,
            carbohydrates: item.carbohydrates,
        }
    }
}

impl CsvRecord for FoodItemRecord {
    const HEADER: &'static [&'static str] =
        &["Name", "Portion", "Calories", "Fat", "Protein", "Carbohydrates"];
    const PATTERN: &'static str = r#"^"[^"]*","[0-9.]+"(,"(?:[0-9.]+)?"){4}$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            name: field(fields, 0, "Name", line)?.to_string(),
            portion: parse_value(field(fields, 1, "Portion", line)?, "Portion", line)?,
            calories: parse_optional(field(fields, 2, "Calories", line)?, "Calories", line)?,
            fat: parse_optional(field(fields, 3, "Fat", line)?, "Fat", line)?,
            protein: parse_optional(field(fields, 4, "Protein", line)?, "Protein", line)?,
            carbohydrates: parse_optional(
                field(fields, 5, "Carbohydrates", line)?,
                "Carbohydrates",
                line,
            )?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.portion.to_string(),
            format_optional(self.calories),
            format_optional(self.fat),
            format_optional(self.protein),
            format_optional(self.carbohydrates),
        ]
    }
}

#[async_trait]
impl Importable for FoodItemRecord {
    const SINGULAR: &'static str = "food item";
    const PLURAL: &'static str = "food items";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        context
            .food_items()
            .create(&self.name, self.portion, self.nutrition())
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealRecord {
    pub name: String,
    pub portions: i32,
    pub nutrition: Nutrition,
}

impl From<&meal::Model> for MealRecord {
    fn from(meal: &meal::Model) -> Self {
        Self {
            name: meal.name.clone(),
            portions: meal.portions,
            nutrition: Nutrition::from(meal),
        }
    }
}

impl CsvRecord for MealRecord {
    const HEADER: &'static [&'static str] =
        &["Name", "Portions", "Calories", "Fat", "Protein", "Carbohydrates"];
    const PATTERN: &'static str = r#"^"[^"]*","[0-9]+"(,"(?:[0-9.]+)?"){4}$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            name: field(fields, 0, "Name", line)?.to_string(),
            portions: parse_value(field(fields, 1, "Portions", line)?, "Portions", line)?,
            nutrition: Nutrition {
                calories: parse_optional(field(fields, 2, "Calories", line)?, "Calories", line)?,
                fat: parse_optional(field(fields, 3, "Fat", line)?, "Fat", line)?,
                protein: parse_optional(field(fields, 4, "Protein", line)?, "Protein", line)?,
                carbohydrates: parse_optional(
                    field(fields, 5, "Carbohydrates", line)?,
                    "Carbohydrates",
                    line,
                )?,
            },
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.portions.to_string(),
            format_optional(self.nutrition.calories),
            format_optional(self.nutrition.fat),
            format_optional(self.nutrition.protein),
            format_optional(self.nutrition.carbohydrates),
        ]
    }
}

#[async_trait]
impl Importable for MealRecord {
    const SINGULAR: &'static str = "meal";
    const PLURAL: &'static str = "meals";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        context
            .meals()
            .create(&self.name, self.portions, self.nutrition)
            .await?;
        Ok(())
    }
}

/// Relationship between a meal and one of its food items, identified by name.
#[derive(Debug, Clone, PartialEq)]
pub struct MealFoodItemRecord {
    pub meal: String,
    pub food_item: String,
    pub quantity: f64,
}

impl CsvRecord for MealFoodItemRecord {
    const HEADER: &'static [&'static str] = &["Meal", "FoodItem", "Quantity"];
    const PATTERN: &'static str = r#"^"[^"]*","[^"]*","[0-9.]+"$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            meal: field(fields, 0, "Meal", line)?.to_string(),
            food_item: field(fields, 1, "FoodItem", line)?.to_string(),
            quantity: parse_value(field(fields, 2, "Quantity", line)?, "Quantity", line)?,
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.meal.clone(),
            self.food_item.clone(),
            self.quantity.to_string(),
        ]
    }
}

#[async_trait]
impl Importable for MealFoodItemRecord {
    const SINGULAR: &'static str = "meal/food item relationship";
    const PLURAL: &'static str = "meal/food item relationships";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        let meal = context
            .meals()
            .find_by_name(&self.meal)
            .await?
            .ok_or_else(|| ExchangeError::UnknownReference {
                kind: "meal",
                reference: self.meal.clone(),
            })?;

        let food_item = context
            .food_items()
            .find_by_name(&self.food_item)
            .await?
            .ok_or_else(|| ExchangeError::UnknownReference {
                kind: "food item",
                reference: self.food_item.clone(),
            })?;

        context
            .meal_food_items()
            .create(meal.id, food_item.id, self.quantity)
            .await?;
        Ok(())
    }
}

/// A meal planned for one slot of one day, identified by the meal's name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMealRecord {
    pub person_id: i32,
    pub meal_type: MealType,
    pub date: NaiveDate,
    pub meal: String,
}

impl PlannedMealRecord {
    pub fn new(planned: &planned_meal::Model, meal: &str) -> Self {
        Self {
            person_id: planned.person_id,
            meal_type: planned.meal_type,
            date: planned.date.date(),
            meal: meal.to_string(),
        }
    }
}

impl CsvRecord for PlannedMealRecord {
    const HEADER: &'static [&'static str] = &["PersonId", "MealType", "Date", "Meal"];
    const PATTERN: &'static str = r#"^"[0-9]+","[A-Za-z]+","[0-9]+/[0-9]+/[0-9]+","[^"]*"$"#;

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, ExchangeError> {
        Ok(Self {
            person_id: parse_value(field(fields, 0, "PersonId", line)?, "PersonId", line)?,
            meal_type: parse_value(field(fields, 1, "MealType", line)?, "MealType", line)?,
            date: parse_date(field(fields, 2, "Date", line)?, "Date", line)?,
            meal: field(fields, 3, "Meal", line)?.to_string(),
        })
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.person_id.to_string(),
            self.meal_type.to_string(),
            self.date.format(DATE_FORMAT).to_string(),
            self.meal.clone(),
        ]
    }
}

#[async_trait]
impl Importable for PlannedMealRecord {
    const SINGULAR: &'static str = "planned meal";
    const PLURAL: &'static str = "planned meals";

    async fn store(&self, context: &ExecutionContext) -> Result<(), ExchangeError> {
        require_person(context, self.person_id).await?;

        let meal = context
            .meals()
            .find_by_name(&self.meal)
            .await?
            .ok_or_else(|| ExchangeError::UnknownReference {
                kind: "meal",
                reference: self.meal.clone(),
            })?;

        let date = self.date.and_time(NaiveTime::MIN);
        let planned_meals = context.planned_meals();
        if planned_meals
            .find(self.person_id, self.meal_type, date)
            .await?
            .is_some()
        {
            return Err(ExchangeError::Duplicate {
                kind: "planned meal",
                description: format!(
                    "{} on {} already exists for person with ID {}",
                    self.meal_type,
                    self.date.format(DATE_FORMAT),
                    self.person_id
                ),
            });
        }

        planned_meals
            .create(self.person_id, self.meal_type, meal.id, date)
            .await?;
        Ok(())
    }
}
