//! Integration tests for the import jobs
//!
//! Tests header-aware record counting, storage of valid content and
//! all-or-nothing behaviour when a record is rejected.

use sea_orm::EntityTrait;
use tempfile::TempDir;

use health_tracker::db::{
    entities::{
        blood_pressure_measurement, food_item, meal_food_item, person,
        planned_meal::{self, MealType},
    },
    repositories::{JobStatusFilter, JobStatusRepository},
};
use health_tracker::jobs::{
    BloodPressureMeasurementImport, FoodItemImport, ImportWorkItem, MealFoodItemImport,
    PersonImport, PlannedMealImport, Worker,
};
use health_tracker::state::AppState;
use health_tracker::tasks::import::ImportProcessor;
use health_tracker::test_utils::*;

const PEOPLE: &str = "\"FirstNames\",\"Surname\",\"DateOfBirth\",\"Height\",\"Gender\"\n\
                      \"Ada\",\"Lovelace\",\"10/12/1815\",\"1.65\",\"F\"\n\
                      \"Alan\",\"Turing\",\"23/06/1912\",\"1.78\",\"M\"\n";

async fn run_import<T: ImportWorkItem>(state: &AppState, item: T) {
    state.queues.enqueue(item).unwrap();

    let worker = Worker::new(
        state.queues.get::<T>().unwrap(),
        ImportProcessor,
        state.db.clone(),
        state.queues.clone(),
    );
    assert!(worker.process_next().await);
}

async fn only_status(state: &AppState) -> health_tracker::db::entities::job_status::Model {
    let mut statuses = JobStatusRepository::new(&state.db)
        .list(&JobStatusFilter::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 1);
    statuses.remove(0)
}

#[tokio::test]
async fn test_person_import_stores_every_record() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    run_import(
        &state,
        PersonImport {
            content: PEOPLE.to_string(),
            ..Default::default()
        },
    )
    .await;

    let people = person::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(people.len(), 2);
    assert_eq!(people[0].full_name(), "Ada Lovelace");
    assert_eq!(people[1].full_name(), "Alan Turing");

    let status = only_status(&state).await;
    assert_eq!(status.name, "Person Import");
    assert!(status.succeeded());
    assert_eq!(status.records_processed, Some(2));
}

#[tokio::test]
async fn test_header_only_content_imports_nothing() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    run_import(
        &state,
        PersonImport {
            content: "\"FirstNames\",\"Surname\",\"DateOfBirth\",\"Height\",\"Gender\"\n\n"
                .to_string(),
            ..Default::default()
        },
    )
    .await;

    assert!(person::Entity::find().all(&state.db).await.unwrap().is_empty());

    let status = only_status(&state).await;
    assert!(status.succeeded());
    assert_eq!(status.records_processed, Some(0));
}

#[tokio::test]
async fn test_empty_content_imports_nothing() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    run_import(
        &state,
        FoodItemImport {
            content: String::new(),
            ..Default::default()
        },
    )
    .await;

    let status = only_status(&state).await;
    assert!(status.succeeded());
    assert_eq!(status.records_processed, Some(0));
}

#[tokio::test]
async fn test_trailing_blank_lines_are_not_counted() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    let content = "\"Name\",\"Portion\",\"Calories\",\"Fat\",\"Protein\",\"Carbohydrates\"\r\n\
                   \"Bread\",\"1\",\"250\",\"3.2\",\"9\",\"49\"\r\n\
                   \r\n   \n";
    run_import(
        &state,
        FoodItemImport {
            content: content.to_string(),
            ..Default::default()
        },
    )
    .await;

    let items = food_item::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].fat, Some(3.2));
    assert_eq!(only_status(&state).await.records_processed, Some(1));
}

#[tokio::test]
async fn test_malformed_record_rejects_the_whole_import() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    let content = format!("{}\"Grace\",\"Hopper\",\"not a date\",\"1.68\",\"F\"\n", PEOPLE);
    run_import(
        &state,
        PersonImport {
            content,
            ..Default::default()
        },
    )
    .await;

    assert!(person::Entity::find().all(&state.db).await.unwrap().is_empty());

    let status = only_status(&state).await;
    assert!(!status.succeeded());
    assert!(status.error.unwrap().contains("line 4"));
}

#[tokio::test]
async fn test_measurement_for_unknown_person_fails() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let person = create_test_person(&state.db, "Ada", "Lovelace").await;

    let content = format!(
        "\"PersonId\",\"Name\",\"Date\",\"Systolic\",\"Diastolic\"\n\
         \"{}\",\"Ada Lovelace\",\"01/03/2024 07:30:00\",\"118\",\"76\"\n\
         \"999\",\"Nobody\",\"01/03/2024 07:30:00\",\"120\",\"80\"\n",
        person.id
    );
    run_import(
        &state,
        BloodPressureMeasurementImport {
            content,
            ..Default::default()
        },
    )
    .await;

    // The valid first record is rolled back with the rest
    let measurements = blood_pressure_measurement::Entity::find()
        .all(&state.db)
        .await
        .unwrap();
    assert!(measurements.is_empty());

    let status = only_status(&state).await;
    assert_eq!(status.error.as_deref(), Some("Unknown person referenced: 999"));
}

#[tokio::test]
async fn test_meal_food_item_import_resolves_names() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    let meal = create_test_meal(&state.db, "Breakfast").await;
    let toast = create_test_food_item(&state.db, "Toast", 80.0, 3.0).await;

    let content = "\"Meal\",\"FoodItem\",\"Quantity\"\n\"Breakfast\",\"Toast\",\"2\"\n";
    run_import(
        &state,
        MealFoodItemImport {
            content: content.to_string(),
            ..Default::default()
        },
    )
    .await;

    let relationships = meal_food_item::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].meal_id, meal.id);
    assert_eq!(relationships[0].food_item_id, toast.id);
    assert_eq!(relationships[0].quantity, 2.0);
    assert!(only_status(&state).await.succeeded());
}

#[tokio::test]
async fn test_import_status_parameters_leave_out_the_uploaded_content() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    run_import(
        &state,
        PersonImport {
            content: PEOPLE.to_string(),
            ..Default::default()
        },
    )
    .await;

    let status = only_status(&state).await;
    assert!(status.succeeded());
    let parameters = status.parameters.unwrap();
    assert!(!parameters.contains("Lovelace"));
    assert!(!parameters.contains("content"));
}

#[tokio::test]
async fn test_planned_meal_import_resolves_meal_names() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let ada = create_test_person(&state.db, "Ada", "Lovelace").await;
    let stew = create_test_meal(&state.db, "Irish Stew").await;

    let content = format!(
        "\"PersonId\",\"MealType\",\"Date\",\"Meal\"\n\
         \"{id}\",\"Dinner\",\"05/01/2024\",\"Irish Stew\"\n\
         \"{id}\",\"Lunch\",\"05/01/2024\",\"Irish Stew\"\n",
        id = ada.id
    );
    run_import(
        &state,
        PlannedMealImport {
            content,
            ..Default::default()
        },
    )
    .await;

    let planned = planned_meal::Entity::find().all(&state.db).await.unwrap();
    assert_eq!(planned.len(), 2);
    assert!(planned.iter().all(|p| p.meal_id == stew.id && p.person_id == ada.id));
    assert!(planned.iter().all(|p| p.date == timestamp("2024-01-05 00:00:00")));
    assert_eq!(planned[0].meal_type, MealType::Dinner);
    assert_eq!(planned[1].meal_type, MealType::Lunch);

    let status = only_status(&state).await;
    assert_eq!(status.name, "Planned Meal Import");
    assert_eq!(status.records_processed, Some(2));
}

#[tokio::test]
async fn test_planned_meal_import_rejects_an_occupied_slot() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let ada = create_test_person(&state.db, "Ada", "Lovelace").await;
    let stew = create_test_meal(&state.db, "Irish Stew").await;
    create_test_planned_meal(&state.db, ada.id, stew.id, "2024-01-05 12:30:00").await;

    let content = format!(
        "\"PersonId\",\"MealType\",\"Date\",\"Meal\"\n\
         \"{id}\",\"Lunch\",\"05/01/2024\",\"Irish Stew\"\n",
        id = ada.id
    );
    run_import(
        &state,
        PlannedMealImport {
            content,
            ..Default::default()
        },
    )
    .await;

    assert_eq!(planned_meal::Entity::find().all(&state.db).await.unwrap().len(), 1);

    let status = only_status(&state).await;
    assert_eq!(
        status.error.as_deref(),
        Some(format!(
            "Duplicate planned meal: Lunch on 05/01/2024 already exists for person with ID {}",
            ada.id
        ))
        .as_deref()
    );
}

#[tokio::test]
async fn test_planned_meal_import_with_unknown_meal_fails() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let ada = create_test_person(&state.db, "Ada", "Lovelace").await;

    let content = format!(
        "\"PersonId\",\"MealType\",\"Date\",\"Meal\"\n\
         \"{}\",\"Breakfast\",\"05/01/2024\",\"Kedgeree\"\n",
        ada.id
    );
    run_import(
        &state,
        PlannedMealImport {
            content,
            ..Default::default()
        },
    )
    .await;

    assert!(planned_meal::Entity::find().all(&state.db).await.unwrap().is_empty());
    assert_eq!(
        only_status(&state).await.error.as_deref(),
        Some("Unknown meal referenced: Kedgeree")
    );
}
