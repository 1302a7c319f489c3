//! # Nation Points
//!
//! Points aggregation and rankings for a youth-group membership dashboard,
//! where nations compete on attendance-derived points.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (point records, nations, aggregates)
//! - **normalize**: Raw backend JSON to validated point records
//! - **calculate**: Aggregation, ranking, time buckets, filters, chart series
//! - **fetch**: Record source trait and REST client
//! - **pipeline**: Fetch, normalize and rank in one call
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod pipeline;

pub use calculate::{aggregate, default_bucket, distinct_buckets, rank};
pub use models::*;
pub use normalize::normalize;
