//! MAGI / subsidy optimizer

mod optimizer;
mod strategies;
mod subsidy;

pub use optimizer::{
    Breakpoint, CliffRisk, MagiAnalysis, MagiInput, MagiOptimizer, MagiTier, OptimalTarget,
    BREAKPOINT_LEVELS, EFFECTIVE_CLIFF_FPL_PCT, STATUTORY_CLIFF_FPL_PCT,
};
pub use strategies::{Strategy, StrategyContext, StrategyKind};
pub use subsidy::{ContributionSchedule, SubsidyFigures};
