//! HSA contribution and projection optimizer

mod limits;
mod optimizer;

pub use limits::{CoverageType, HsaContributionBreakdown};
pub use optimizer::{HsaAnalysis, HsaInput, HsaOptimizer, ProjectionRow, TaxSavings, FICA_RATE};
