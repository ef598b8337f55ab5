use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::{
    db::DateRange,
    error::ExchangeError,
    exchange::{
        records::{
            BloodPressureMeasurementRecord, FoodItemRecord, MealFoodItemRecord, MealRecord,
            PersonRecord, PlannedMealRecord, WeightMeasurementRecord,
        },
        write_csv,
    },
    jobs::{
        dependent_file_name, BloodPressureMeasurementExport, ExecutionContext, FoodItemExport,
        JobOutcome, JobProcessor, MealExport, MealFoodItemExport, PersonExport,
        PlannedMealExport, WeightMeasurementExport, WorkItem, FOOD_ITEMS_SUFFIX,
    },
};

/// Writes export files beneath a fixed directory.
#[derive(Debug, Clone)]
pub struct ExportProcessor {
    export_path: PathBuf,
}

impl ExportProcessor {
    pub fn new(export_path: impl Into<PathBuf>) -> Self {
        Self {
            export_path: export_path.into(),
        }
    }

    /// Resolve `file_name` beneath the export directory. Absolute names and
    /// names with `.`, `..` or prefix components are rejected.
    pub fn file_path(&self, file_name: &str) -> Result<PathBuf, ExchangeError> {
        let relative = Path::new(file_name);
        let mut components = relative.components().peekable();
        let contained = components.peek().is_some()
            && components.all(|component| matches!(component, Component::Normal(_)));

        if !contained {
            return Err(ExchangeError::FileName(file_name.to_string()));
        }

        Ok(self.export_path.join(relative))
    }
}

#[async_trait]
impl JobProcessor<PersonExport> for ExportProcessor {
    async fn process(
        &self,
        item: &PersonExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        tracing::info!("Retrieving people for export");
        let records: Vec<PersonRecord> = context
            .people()
            .list_all()
            .await?
            .iter()
            .map(PersonRecord::from)
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!("Exporting {} people to {}", records.len(), path.display());
        let written = write_csv(&path, &records).await?;

        Ok(JobOutcome::records(written))
    }
}

#[async_trait]
impl JobProcessor<WeightMeasurementExport> for ExportProcessor {
    async fn process(
        &self,
        item: &WeightMeasurementExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let range = DateRange::new(item.from, item.to);
        tracing::info!(
            "Retrieving weight measurements for person with ID {} {}",
            item.person_id,
            range.describe()
        );

        let name = context
            .people()
            .find_by_id(item.person_id)
            .await?
            .map(|person| person.full_name())
            .unwrap_or_default();

        let records: Vec<WeightMeasurementRecord> = context
            .weight_measurements()
            .list(item.person_id, &range)
            .await?
            .iter()
            .map(|measurement| WeightMeasurementRecord::new(&name, measurement))
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!(
            "Exporting {} weight measurements to {}",
            records.len(),
            path.display()
        );
        let written = write_csv(&path, &records).await?;

        Ok(JobOutcome::records(written))
    }
}

#[async_trait]
impl JobProcessor<BloodPressureMeasurementExport> for ExportProcessor {
    async fn process(
        &self,
        item: &BloodPressureMeasurementExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let range = DateRange::new(item.from, item.to);
        tracing::info!(
            "Retrieving blood pressure measurements for person with ID {} {}",
            item.person_id,
            range.describe()
        );

        let name = context
            .people()
            .find_by_id(item.person_id)
            .await?
            .map(|person| person.full_name())
            .unwrap_or_default();

        let records: Vec<BloodPressureMeasurementRecord> = context
            .blood_pressure_measurements()
            .list(item.person_id, &range)
            .await?
            .iter()
            .map(|measurement| BloodPressureMeasurementRecord::new(&name, measurement))
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!(
            "Exporting {} blood pressure measurements to {}",
            records.len(),
            path.display()
        );
        let written = write_csv(&path, &records).await?;

        Ok(JobOutcome::records(written))
    }
}

#[async_trait]
impl JobProcessor<FoodItemExport> for ExportProcessor {
    async fn process(
        &self,
        item: &FoodItemExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let records: Vec<FoodItemRecord> = context
            .food_items()
            .list_all()
            .await?
            .iter()
            .map(FoodItemRecord::from)
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!("Exporting {} food items to {}", records.len(), path.display());
        let written = write_csv(&path, &records).await?;

        Ok(JobOutcome::records(written))
    }
}

#[async_trait]
impl JobProcessor<PlannedMealExport> for ExportProcessor {
    async fn process(
        &self,
        item: &PlannedMealExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let range = DateRange::new(item.from, item.to);
        tracing::info!(
            "Retrieving planned meals for person with ID {} {}",
            item.person_id,
            range.describe()
        );

        let records: Vec<PlannedMealRecord> = context
            .planned_meals()
            .list_named(item.person_id, &range)
            .await?
            .iter()
            .map(|(planned, meal)| PlannedMealRecord::new(planned, meal))
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!(
            "Exporting {} planned meals to {}",
            records.len(),
            path.display()
        );
        let written = write_csv(&path, &records).await?;

        Ok(JobOutcome::records(written))
    }
}

#[async_trait]
impl JobProcessor<MealExport> for ExportProcessor {
    async fn process(
        &self,
        item: &MealExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        tracing::info!("Retrieving meals for export");
        let records: Vec<MealRecord> = context
            .meals()
            .list_all()
            .await?
            .iter()
            .map(MealRecord::from)
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!("Exporting {} meals to {}", records.len(), path.display());
        let written = write_csv(&path, &records).await?;

        let mut relationships = MealFoodItemExport {
            file_name: dependent_file_name(&item.file_name, FOOD_ITEMS_SUFFIX),
            ..Default::default()
        };
        relationships.set_job_name(MealFoodItemExport::JOB_NAME);
        tracing::info!(
            "Queueing export of meal/food item relationships to {}",
            relationships.file_name
        );

        Ok(JobOutcome::records(written).then_enqueue(relationships))
    }
}

#[async_trait]
impl JobProcessor<MealFoodItemExport> for ExportProcessor {
    async fn process(
        &self,
        item: &MealFoodItemExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let records: Vec<MealFoodItemRecord> = context
            .meal_food_items()
            .list_named()
            .await?
            .into_iter()
            .map(|(meal, food_item, quantity)| MealFoodItemRecord {
                meal,
                food_item,
                quantity,
            })
            .collect();

        let path = self.file_path(&item.file_name)?;
        tracing::info!(
            "Exporting {} meal/food item relationships to {}",
            records.len(),
            path.display()
        );
        let written = write_csv(&path, &records).await?;

        Ok(JobOutcome::records(written))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_resolve_inside_the_export_directory() {
        let exports = ExportProcessor::new("/data/exports");

        assert_eq!(
            exports.file_path("2024/meals.csv").unwrap(),
            PathBuf::from("/data/exports/2024/meals.csv")
        );
    }

    #[test]
    fn escaping_file_names_are_rejected() {
        let exports = ExportProcessor::new("/data/exports");

        for file_name in ["/etc/passwd", "../meals.csv", "2024/../../meals.csv", "./meals.csv", ""] {
            assert!(
                matches!(exports.file_path(file_name), Err(ExchangeError::FileName(_))),
                "{} was accepted",
                file_name
            );
        }
    }
}
