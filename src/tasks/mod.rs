use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    jobs::{
        BloodPressureMeasurementExport, BloodPressureMeasurementImport, FoodItemExport,
        FoodItemImport, JobProcessor, JobQueues, MealExport, MealFoodItemExport,
        MealFoodItemImport, MealImport, PersonExport, PersonImport, PlannedMealExport,
        PlannedMealImport, PurgePlannedMeals, RecalculateMealNutrition, WeightMeasurementExport,
        WeightMeasurementImport, WorkItem, Worker,
    },
    state::AppState,
};

pub mod export;
pub mod import;
pub mod purge;
pub mod recalculate;

use export::ExportProcessor;
use import::ImportProcessor;
use purge::PlannedMealPurgeProcessor;
use recalculate::MealNutritionProcessor;

/// Build the registry holding one queue per supported work item type.
pub fn job_queues() -> JobQueues {
    let mut queues = JobQueues::new();

    queues.register::<PersonExport>();
    queues.register::<WeightMeasurementExport>();
    queues.register::<BloodPressureMeasurementExport>();
    queues.register::<FoodItemExport>();
    queues.register::<MealExport>();
    queues.register::<MealFoodItemExport>();
    queues.register::<PlannedMealExport>();

    queues.register::<PersonImport>();
    queues.register::<WeightMeasurementImport>();
    queues.register::<BloodPressureMeasurementImport>();
    queues.register::<FoodItemImport>();
    queues.register::<MealImport>();
    queues.register::<MealFoodItemImport>();
    queues.register::<PlannedMealImport>();

    queues.register::<RecalculateMealNutrition>();
    queues.register::<PurgePlannedMeals>();

    queues
}

/// Spawn one worker per registered queue. Workers stop once `shutdown` is
/// cancelled.
pub fn start_workers(state: &AppState, shutdown: &CancellationToken) -> Result<Vec<JoinHandle<()>>> {
    let exports = ExportProcessor::new(state.config.export_path.clone());

    let handles = vec![
        spawn_worker::<PersonExport, _>(state, exports.clone(), shutdown)?,
        spawn_worker::<WeightMeasurementExport, _>(state, exports.clone(), shutdown)?,
        spawn_worker::<BloodPressureMeasurementExport, _>(state, exports.clone(), shutdown)?,
        spawn_worker::<FoodItemExport, _>(state, exports.clone(), shutdown)?,
        spawn_worker::<MealExport, _>(state, exports.clone(), shutdown)?,
        spawn_worker::<MealFoodItemExport, _>(state, exports.clone(), shutdown)?,
        spawn_worker::<PlannedMealExport, _>(state, exports, shutdown)?,
        spawn_worker::<PersonImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<WeightMeasurementImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<BloodPressureMeasurementImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<FoodItemImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<MealImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<MealFoodItemImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<PlannedMealImport, _>(state, ImportProcessor, shutdown)?,
        spawn_worker::<RecalculateMealNutrition, _>(state, MealNutritionProcessor, shutdown)?,
        spawn_worker::<PurgePlannedMeals, _>(state, PlannedMealPurgeProcessor, shutdown)?,
    ];

    tracing::info!("Started {} background workers", handles.len());
    Ok(handles)
}

fn spawn_worker<T, P>(
    state: &AppState,
    processor: P,
    shutdown: &CancellationToken,
) -> Result<JoinHandle<()>>
where
    T: WorkItem,
    P: JobProcessor<T>,
{
    let queue = state.queues.get::<T>()?;
    let worker = Worker::new(queue, processor, state.db.clone(), state.queues.clone())
        .with_poll_interval(Duration::from_millis(state.config.poll_interval_ms));

    Ok(tokio::spawn(worker.run(shutdown.clone())))
}
