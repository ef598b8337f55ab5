pub mod blood_pressure_measurement;
pub mod food_item;
pub mod job_status;
pub mod meal;
pub mod meal_food_item;
pub mod person;
pub mod planned_meal;
pub mod weight_measurement;

pub use blood_pressure_measurement::Entity as BloodPressureMeasurement;
pub use food_item::Entity as FoodItem;
pub use job_status::Entity as JobStatus;
pub use meal::Entity as Meal;
pub use meal_food_item::Entity as MealFoodItem;
pub use person::Entity as Person;
pub use planned_meal::Entity as PlannedMeal;
pub use weight_measurement::Entity as WeightMeasurement;
