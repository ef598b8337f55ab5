use async_trait::async_trait;
use chrono::Local;

use crate::jobs::{ExecutionContext, JobOutcome, JobProcessor, PurgePlannedMeals};

pub struct PlannedMealPurgeProcessor;

#[async_trait]
impl JobProcessor<PurgePlannedMeals> for PlannedMealPurgeProcessor {
    async fn process(
        &self,
        item: &PurgePlannedMeals,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let report_cutoff = item
            .cutoff
            .map(|cutoff| cutoff.date().to_string())
            .unwrap_or_else(|| "today".to_string());
        tracing::info!(
            "Purging planned meals for person with ID {} scheduled before {}",
            item.person_id,
            report_cutoff
        );

        let cutoff = item.cutoff.unwrap_or_else(|| Local::now().naive_local());
        let purged = context
            .planned_meals()
            .purge(item.person_id, cutoff)
            .await?;
        tracing::info!("Purged {} planned meal(s)", purged);

        Ok(JobOutcome::records(purged))
    }
}
