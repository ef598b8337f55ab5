pub mod health;
pub mod jobs;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    jobs::{
        BloodPressureMeasurementExport, BloodPressureMeasurementImport, FoodItemExport,
        FoodItemImport, MealExport, MealFoodItemImport, MealImport, PersonExport, PersonImport,
        PlannedMealExport, PlannedMealImport, PurgePlannedMeals, RecalculateMealNutrition,
        WeightMeasurementExport, WeightMeasurementImport,
    },
    state::AppState,
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))

        // Export endpoints
        .route("/export/person", post(jobs::enqueue::<PersonExport>))
        .route("/export/weightmeasurement", post(jobs::enqueue::<WeightMeasurementExport>))
        .route(
            "/export/bloodpressuremeasurement",
            post(jobs::enqueue::<BloodPressureMeasurementExport>),
        )
        .route("/export/fooditem", post(jobs::enqueue::<FoodItemExport>))
        .route("/export/meal", post(jobs::enqueue::<MealExport>))
        .route("/export/plannedmeal", post(jobs::enqueue::<PlannedMealExport>))

        // Import endpoints
        .route("/import/person", post(jobs::enqueue::<PersonImport>))
        .route("/import/weightmeasurement", post(jobs::enqueue::<WeightMeasurementImport>))
        .route(
            "/import/bloodpressuremeasurement",
            post(jobs::enqueue::<BloodPressureMeasurementImport>),
        )
        .route("/import/fooditem", post(jobs::enqueue::<FoodItemImport>))
        .route("/import/meal", post(jobs::enqueue::<MealImport>))
        .route("/import/mealfooditem", post(jobs::enqueue::<MealFoodItemImport>))
        .route("/import/plannedmeal", post(jobs::enqueue::<PlannedMealImport>))

        // Maintenance endpoints
        .route("/meals/recalculate", post(jobs::enqueue::<RecalculateMealNutrition>))
        .route("/plannedmeals/purge", post(jobs::enqueue::<PurgePlannedMeals>))

        // Job status
        .route("/jobstatus", get(jobs::list_job_statuses))
}
