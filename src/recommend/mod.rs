//! Household recommendation aggregator

mod engine;
mod modifiers;
mod output;

pub use engine::RecommendationEngine;
pub use output::{AgeGroupCount, Priority, Recommendation, RecommendationSet};
