//! Health Tracker Library
//!
//! Background job queues and workers for importing, exporting and
//! maintaining personal health data, plus the HTTP surface that feeds them.

pub mod config;
pub mod db;
pub mod error;
pub mod exchange;
pub mod handlers;
pub mod jobs;
pub mod state;
pub mod tasks;
pub mod test_utils;
