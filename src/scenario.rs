//! Analysis runner for efficient batch runs
//!
//! Pre-loads reference tables once, then allows running many analyses
//! without re-reading CSV files.

use std::error::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::household::{Household, Preferences, PrimaryPlanContext};
use crate::hsa::{HsaAnalysis, HsaInput, HsaOptimizer};
use crate::magi::{MagiAnalysis, MagiInput, MagiOptimizer};
use crate::recommend::{RecommendationEngine, RecommendationSet};
use crate::tables::EngineTables;

/// Combined output of a full household analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdAnalysis {
    pub recommendations: RecommendationSet,
    pub magi: MagiAnalysis,
    pub hsa: HsaAnalysis,
}

/// Pre-loaded analysis runner
///
/// # Example
/// ```ignore
/// let runner = AnalysisRunner::new();
/// let set = runner.run_recommendations(&household, &plan, &prefs)?;
/// let magi = runner.run_magi(&magi_input);
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisRunner {
    /// Pre-loaded reference tables
    tables: EngineTables,
}

impl AnalysisRunner {
    /// Create a runner with in-memory 2024 tables
    pub fn new() -> Self {
        Self {
            tables: EngineTables::default_2024(),
        }
    }

    /// Create a runner by loading tables from a CSV directory
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            tables: EngineTables::from_csv_path(path)?,
        })
    }

    /// Create a runner with pre-built tables
    pub fn with_tables(tables: EngineTables) -> Self {
        Self { tables }
    }

    /// Generate recommendations for one household
    pub fn run_recommendations(
        &self,
        household: &Household,
        primary_plan: &PrimaryPlanContext,
        preferences: &Preferences,
    ) -> Result<RecommendationSet, EngineError> {
        let engine = RecommendationEngine::new(self.tables.clone());
        engine.recommend(household, primary_plan, preferences)
    }

    /// Run the MAGI/subsidy analysis
    pub fn run_magi(&self, input: &MagiInput) -> MagiAnalysis {
        let optimizer = MagiOptimizer::new(self.tables.clone());
        optimizer.analyze(input)
    }

    /// Run the HSA analysis
    pub fn run_hsa(&self, input: &HsaInput) -> HsaAnalysis {
        let optimizer = HsaOptimizer::new(self.tables.clone());
        optimizer.optimize(input)
    }

    /// Run all three analyses for one household
    pub fn run_full(
        &self,
        household: &Household,
        primary_plan: &PrimaryPlanContext,
        preferences: &Preferences,
        magi_input: &MagiInput,
        hsa_input: &HsaInput,
    ) -> Result<HouseholdAnalysis, EngineError> {
        Ok(HouseholdAnalysis {
            recommendations: self.run_recommendations(household, primary_plan, preferences)?,
            magi: self.run_magi(magi_input),
            hsa: self.run_hsa(hsa_input),
        })
    }

    /// Generate recommendations for multiple households with one config
    pub fn run_batch(
        &self,
        households: &[Household],
        primary_plan: &PrimaryPlanContext,
        preferences: &Preferences,
    ) -> Vec<Result<RecommendationSet, EngineError>> {
        let engine = RecommendationEngine::new(self.tables.clone());
        households
            .iter()
            .map(|h| engine.recommend(h, primary_plan, preferences))
            .collect()
    }

    /// Get reference to the tables for inspection
    pub fn tables(&self) -> &EngineTables {
        &self.tables
    }

    /// Get mutable reference to the tables for customization
    pub fn tables_mut(&mut self) -> &mut EngineTables {
        &mut self.tables
    }
}

impl Default for AnalysisRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::{Person, Residence};

    fn household(age: f64) -> Household {
        Household::new(
            vec![Person::new(age)],
            vec![Residence::new("TX", 12.0)],
        )
        .with_annual_income(60_000.0)
    }

    #[test]
    fn test_runner_batch() {
        let runner = AnalysisRunner::new();
        let households = vec![household(30.0), household(55.0), household(75.0)];

        let results = runner.run_batch(
            &households,
            &PrimaryPlanContext::new(500.0),
            &Preferences::default(),
        );
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_ok()));

        // Older households carry more recommended categories
        let young = results[0].as_ref().unwrap().recommended_count();
        let senior = results[2].as_ref().unwrap().recommended_count();
        assert!(senior >= young);
    }

    #[test]
    fn test_runner_determinism() {
        // The engine is a pure function of its inputs
        let runner = AnalysisRunner::new();
        let h = household(48.0);
        let plan = PrimaryPlanContext::new(500.0);
        let prefs = Preferences::default();

        let a = runner.run_recommendations(&h, &plan, &prefs).unwrap();
        let b = runner.run_recommendations(&h, &plan, &prefs).unwrap();

        assert_eq!(a.recommendations.len(), b.recommendations.len());
        for (x, y) in a.recommendations.iter().zip(&b.recommendations) {
            assert_eq!(x.probability_score, y.probability_score);
            assert_eq!(x.household_cost_per_month, y.household_cost_per_month);
        }
    }
}
