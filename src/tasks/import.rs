use async_trait::async_trait;

use crate::{
    exchange::{CsvImporter, Importable},
    jobs::{ExecutionContext, ImportWorkItem, JobOutcome, JobProcessor},
};

/// Imports the CSV content carried by any import work item.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportProcessor;

/// Split raw content into lines, dropping those that are blank.
pub fn split_records(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[async_trait]
impl<T: ImportWorkItem> JobProcessor<T> for ImportProcessor {
    async fn process(
        &self,
        item: &T,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        let records = split_records(item.content());

        // The first line is the header
        let count = records.len().saturating_sub(1);
        if count == 0 {
            tracing::warn!("No records found to import");
            return Ok(JobOutcome::records(0));
        }

        let noun = if count == 1 {
            <T::Record as Importable>::SINGULAR
        } else {
            <T::Record as Importable>::PLURAL
        };
        tracing::info!("Importing {} {}", count, noun);

        let importer = CsvImporter::<T::Record>::new()?;
        let imported = importer.import(&records, context).await?;

        Ok(JobOutcome::records(imported))
    }
}
