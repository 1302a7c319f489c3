//! Core data models for nation points.

mod aggregate;
mod bucket;
mod ids;
mod nation;
mod record;

pub use aggregate::*;
pub use bucket::*;
pub use ids::*;
pub use nation::*;
pub use record::*;
