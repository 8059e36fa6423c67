//! Core module - configuration and the join-and-enrichment pipeline

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod links;
pub mod matcher;
pub mod pipeline;
pub mod status;

pub use aggregate::{AggregationReport, Aggregator, DataScope, PartialDataWarning, TestRailSource};
pub use config::{Config, ConfigError};
pub use links::LinkTemplates;
pub use matcher::{build_trace_rows, Coverage, MatchOptions};
pub use pipeline::build_matrix;
pub use status::StatusMap;
