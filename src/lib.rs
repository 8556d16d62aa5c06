//! Coverage Engine - Supplemental coverage recommendation and subsidy optimization
//!
//! This library provides:
//! - Age-indexed actuarial risk curves per coverage category
//! - Household-level recommendation aggregation with bundle pricing
//! - MAGI/subsidy analysis with breakpoints, cliff risk, and reduction strategies
//! - HSA contribution optimization and multi-year balance projection
//!
//! Every analysis is a pure function of its inputs: the same input record
//! always produces the same result.

pub mod curves;
pub mod error;
pub mod household;
pub mod hsa;
pub mod magi;
pub mod pricing;
pub mod recommend;
pub mod scenario;
pub mod tables;

// Re-export commonly used types
pub use curves::{Category, CurvePoint, RiskLevel};
pub use error::EngineError;
pub use household::{Household, Person, Preferences, PrimaryPlanContext, Residence};
pub use hsa::{HsaAnalysis, HsaInput, HsaOptimizer};
pub use magi::{MagiAnalysis, MagiInput, MagiOptimizer};
pub use recommend::{Recommendation, RecommendationEngine, RecommendationSet};
pub use scenario::{AnalysisRunner, HouseholdAnalysis};
pub use tables::EngineTables;
