use async_trait::async_trait;

use crate::jobs::{ExecutionContext, JobOutcome, JobProcessor, RecalculateMealNutrition};

pub struct MealNutritionProcessor;

#[async_trait]
impl JobProcessor<RecalculateMealNutrition> for MealNutritionProcessor {
    async fn process(
        &self,
        _item: &RecalculateMealNutrition,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        tracing::info!("Recalculating nutritional values for all meals");
        let updated = context.meals().update_all_nutritional_values().await?;
        tracing::info!("Nutritional values updated for {} meal(s)", updated);

        Ok(JobOutcome::records(updated))
    }
}
