pub mod agent;
pub mod ai;
pub mod commands;
pub mod config;
pub mod database; // Gateway trait and materialized result types
pub mod database_postgresql; // PostgreSQL implementation
pub mod format;
pub mod schema;

pub use agent::{Agent, AgentBackends};
pub use commands::{RoutedCommand, route};
pub use config::Config;
pub use database::{DatabaseClient, QueryOutcome, QueryRows};
pub use format::format_rows;
