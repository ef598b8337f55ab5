//! Integration tests for the generic worker
//!
//! Tests the worker loop against in-memory databases:
//! - One status record per processed item
//! - Failures and panics are isolated to their own item
//! - Execution scopes are released on every path
//! - Cooperative shutdown

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::EntityTrait;
use tokio_util::sync::CancellationToken;

use health_tracker::db::{
    entities::{job_status, person},
    enums::JobState,
    repositories::{JobStatusFilter, JobStatusRepository},
};
use health_tracker::jobs::{
    ExecutionContext, JobOutcome, JobProcessor, JobQueues, PersonExport, Worker, WorkItem,
};
use health_tracker::test_utils::*;

/// Stores a person for every item, then behaves according to the file name
struct ScriptedProcessor;

#[async_trait]
impl JobProcessor<PersonExport> for ScriptedProcessor {
    async fn process(
        &self,
        item: &PersonExport,
        context: &ExecutionContext,
    ) -> anyhow::Result<JobOutcome> {
        context
            .people()
            .create(
                "Scripted",
                &item.file_name,
                NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                1.8,
                "U",
            )
            .await?;

        match item.file_name.as_str() {
            "fail" => anyhow::bail!("export destination unavailable"),
            "panic" => panic!("processor exploded"),
            "chain" => Ok(JobOutcome::records(1).then_enqueue(export("chained"))),
            _ => Ok(JobOutcome::records(1)),
        }
    }
}

fn export(file_name: &str) -> PersonExport {
    let mut item = PersonExport {
        file_name: file_name.to_string(),
        ..Default::default()
    };
    item.set_job_name(PersonExport::JOB_NAME);
    item
}

async fn all_statuses(db: &sea_orm::DatabaseConnection) -> Vec<job_status::Model> {
    JobStatusRepository::new(db)
        .list(&JobStatusFilter::default(), 1, 100)
        .await
        .unwrap()
}

fn scripted_worker(
    db: &sea_orm::DatabaseConnection,
) -> (Worker<PersonExport, ScriptedProcessor>, Arc<JobQueues>) {
    let mut queues = JobQueues::new();
    let queue = queues.register::<PersonExport>();
    let queues = Arc::new(queues);

    let worker = Worker::new(queue, ScriptedProcessor, db.clone(), queues.clone())
        .with_poll_interval(Duration::from_millis(10));
    (worker, queues)
}

#[tokio::test]
async fn test_process_next_on_empty_queue() {
    let db = setup_test_db().await;
    let (worker, _queues) = scripted_worker(&db);

    assert!(!worker.process_next().await);
    assert!(all_statuses(&db).await.is_empty());
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let db = setup_test_db().await;
    let (worker, queues) = scripted_worker(&db);

    queues.enqueue(export("fail")).unwrap();
    queues.enqueue(export("panic")).unwrap();
    queues.enqueue(export("people.csv")).unwrap();

    assert!(worker.process_next().await);
    assert!(worker.process_next().await);
    assert!(worker.process_next().await);
    assert!(!worker.process_next().await);

    let statuses = all_statuses(&db).await;
    assert_eq!(statuses.len(), 3);
    assert!(statuses.iter().all(|s| s.name == "Person Export"));

    let failed: Vec<_> = statuses
        .iter()
        .filter(|s| JobState::of(s) == JobState::Failed)
        .collect();
    assert_eq!(failed.len(), 2);
    assert!(failed
        .iter()
        .any(|s| s.error.as_deref() == Some("export destination unavailable")));
    assert!(failed
        .iter()
        .any(|s| s.error.as_deref().unwrap_or_default().contains("processor exploded")));

    let succeeded: Vec<_> = statuses.iter().filter(|s| s.succeeded()).collect();
    assert_eq!(succeeded.len(), 1);
    assert_eq!(succeeded[0].records_processed, Some(1));

    // Work done by the failed items was rolled back
    let people = person::Entity::find().all(&db).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].surname, "people.csv");
}

#[tokio::test]
async fn test_follow_up_is_enqueued_once_the_item_commits() {
    let db = setup_test_db().await;
    let (worker, queues) = scripted_worker(&db);
    let queue = queues.get::<PersonExport>().unwrap();

    queues.enqueue(export("chain")).unwrap();
    assert!(worker.process_next().await);

    // The follow-up is queued and the data it builds on is already visible
    assert_eq!(queue.len(), 1);
    let people = person::Entity::find().all(&db).await.unwrap();
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].surname, "chain");

    assert!(worker.process_next().await);
    assert!(queue.is_empty());

    let statuses = all_statuses(&db).await;
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| JobState::of(s) == JobState::Succeeded));
}

#[tokio::test]
async fn test_scope_released_after_every_item() {
    let db = setup_test_db().await;
    let (worker, queues) = scripted_worker(&db);

    for file_name in ["fail", "ok.csv", "panic"] {
        queues.enqueue(export(file_name)).unwrap();
        assert!(worker.process_next().await);
        assert_eq!(worker.contexts().active_scopes(), 0);
    }
}

#[tokio::test]
async fn test_status_parameters_hold_the_work_item() {
    let db = setup_test_db().await;
    let (worker, queues) = scripted_worker(&db);

    queues.enqueue(export("people.csv")).unwrap();
    worker.process_next().await;

    let statuses = all_statuses(&db).await;
    let parameters: serde_json::Value =
        serde_json::from_str(statuses[0].parameters.as_deref().unwrap()).unwrap();
    assert_eq!(parameters["file_name"], "people.csv");
    assert_eq!(parameters["job_name"], "Person Export");
}

#[tokio::test]
async fn test_run_processes_items_until_shutdown() {
    let db = setup_test_db().await;
    let (worker, queues) = scripted_worker(&db);
    let shutdown = CancellationToken::new();

    queues.enqueue(export("first.csv")).unwrap();
    queues.enqueue(export("second.csv")).unwrap();

    let handle = tokio::spawn(worker.run(shutdown.clone()));

    let queue = queues.get::<PersonExport>().unwrap();
    for _ in 0..200 {
        if queue.is_empty() && all_statuses(&db).await.iter().all(|s| s.is_finished()) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop after shutdown")
        .unwrap();

    let statuses = all_statuses(&db).await;
    assert_eq!(statuses.len(), 2);
    assert!(statuses.iter().all(|s| s.succeeded()));
}

#[tokio::test]
async fn test_shutdown_interrupts_idle_wait() {
    let db = setup_test_db().await;
    let mut queues = JobQueues::new();
    let queue = queues.register::<PersonExport>();

    // A poll interval far longer than the test timeout
    let worker = Worker::new(queue, ScriptedProcessor, db.clone(), Arc::new(queues))
        .with_poll_interval(Duration::from_secs(3600));
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(worker.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("worker did not stop during idle wait")
        .unwrap();
}
