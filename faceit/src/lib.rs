pub mod api;
pub mod config;
pub mod models;

pub mod demos;
pub mod history;
pub mod summary;
pub mod tournament;

pub mod render;
pub mod report;
pub mod telemetry;

pub use api::{ApiError, Client};
pub use config::{Config, ConfigError};
