use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::jobs::JobQueues;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub queues: Arc<JobQueues>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, queues: JobQueues) -> Self {
        Self {
            db,
            config: Arc::new(config),
            queues: Arc::new(queues),
        }
    }
}
