//! HSA contribution limit breakdown

use serde::{Deserialize, Serialize};

use crate::tables::ContributionLimits;

/// HDHP coverage tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageType {
    Individual,
    Family,
}

impl CoverageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::Individual => "individual",
            CoverageType::Family => "family",
        }
    }
}

/// Contribution limit breakdown for one account holder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HsaContributionBreakdown {
    pub coverage: CoverageType,

    /// Base statutory limit for the coverage tier
    pub base_limit: f64,

    /// Catch-up addition (zero when not eligible)
    pub catch_up: f64,

    /// Whether the age-55 catch-up applies
    pub catch_up_eligible: bool,

    /// Base plus catch-up
    pub total_limit: f64,

    /// Employer contribution counted against the limit
    pub employer_contribution: f64,

    /// Remaining employee headroom, floored at zero
    pub max_employee_contribution: f64,
}

impl HsaContributionBreakdown {
    /// Compute the breakdown from the year's limit table
    pub fn compute(
        limits: &ContributionLimits,
        coverage: CoverageType,
        age: u8,
        employer_contribution: f64,
    ) -> Self {
        let base_limit = match coverage {
            CoverageType::Individual => limits.hsa_individual,
            CoverageType::Family => limits.hsa_family,
        };
        let catch_up_eligible = age >= limits.hsa_catch_up_age;
        let catch_up = if catch_up_eligible {
            limits.hsa_catch_up
        } else {
            0.0
        };
        let total_limit = base_limit + catch_up;

        Self {
            coverage,
            base_limit,
            catch_up,
            catch_up_eligible,
            total_limit,
            employer_contribution,
            max_employee_contribution: (total_limit - employer_contribution).max(0.0),
        }
    }
}
