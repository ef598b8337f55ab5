//! Test utilities for Health Tracker
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - AppState factories with every job queue registered
//! - Test data generators

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{
        entities::{
            food_item, job_status, meal, meal_food_item, person,
            planned_meal::{self, MealType},
            weight_measurement,
        },
        repositories::{
            FoodItemRepository, MealFoodItemRepository, MealRepository, Nutrition,
            PersonRepository, PlannedMealRepository, WeightMeasurementRepository,
        },
    },
    state::AppState,
    tasks,
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // Run all migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration writing exports beneath `export_path`
pub fn test_config(export_path: &Path) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        export_path: export_path.to_path_buf(),
        poll_interval_ms: 10,
    }
}

/// Create a complete test AppState with an isolated database and every job
/// queue registered
pub async fn setup_test_app_state(export_path: &Path) -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, test_config(export_path), tasks::job_queues())
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp
pub fn timestamp(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").expect("Invalid test timestamp")
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Create a test person in the database
pub async fn create_test_person(
    db: &DatabaseConnection,
    first_names: &str,
    surname: &str,
) -> person::Model {
    PersonRepository::new(db)
        .create(
            first_names,
            surname,
            NaiveDate::from_ymd_opt(1980, 6, 15).expect("Invalid test date"),
            1.75,
            "U",
        )
        .await
        .expect("Failed to insert test person")
}

/// Create a test weight measurement in the database
pub async fn create_test_weight(
    db: &DatabaseConnection,
    person_id: i32,
    date: &str,
    weight: f64,
) -> weight_measurement::Model {
    WeightMeasurementRepository::new(db)
        .create(person_id, timestamp(date), weight)
        .await
        .expect("Failed to insert test weight measurement")
}

/// Create a test food item with calories and protein set
pub async fn create_test_food_item(
    db: &DatabaseConnection,
    name: &str,
    calories: f64,
    protein: f64,
) -> food_item::Model {
    let nutrition = Nutrition {
        calories: Some(calories),
        protein: Some(protein),
        ..Default::default()
    };

    FoodItemRepository::new(db)
        .create(name, 1.0, nutrition)
        .await
        .expect("Failed to insert test food item")
}

/// Create a test meal without nutritional values
pub async fn create_test_meal(db: &DatabaseConnection, name: &str) -> meal::Model {
    MealRepository::new(db)
        .create(name, 1, Nutrition::default())
        .await
        .expect("Failed to insert test meal")
}

/// Add a food item to a meal
pub async fn add_test_food_item_to_meal(
    db: &DatabaseConnection,
    meal_id: i32,
    food_item_id: i32,
    quantity: f64,
) -> meal_food_item::Model {
    MealFoodItemRepository::new(db)
        .create(meal_id, food_item_id, quantity)
        .await
        .expect("Failed to insert test meal/food item relationship")
}

/// Create a test planned meal in the database
pub async fn create_test_planned_meal(
    db: &DatabaseConnection,
    person_id: i32,
    meal_id: i32,
    date: &str,
) -> planned_meal::Model {
    PlannedMealRepository::new(db)
        .create(person_id, MealType::Lunch, meal_id, timestamp(date))
        .await
        .expect("Failed to insert test planned meal")
}

/// Create a test job status with explicit timestamps
pub async fn create_test_job_status(
    db: &DatabaseConnection,
    name: &str,
    started_at: &str,
    completed_at: Option<&str>,
) -> job_status::Model {
    let parse = |value: &str| -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(value).expect("Invalid test RFC 3339 timestamp")
    };

    let status = job_status::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        parameters: Set(None),
        started_at: Set(parse(started_at)),
        completed_at: Set(completed_at.map(parse)),
        records_processed: Set(completed_at.map(|_| 0)),
        error: Set(None),
    };

    status.insert(db).await.expect("Failed to insert test job status")
}
