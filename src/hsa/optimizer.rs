//! HSA optimization: recommended contribution, tax savings, and the
//! multi-year balance projection
//!
//! The projection order is load-bearing: contribution and investment growth
//! are both computed off the beginning-of-year balance, and expenses are
//! paid out of the resulting pool. Reversing that order changes the
//! compounding result.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::tables::EngineTables;

use super::limits::{CoverageType, HsaContributionBreakdown};

/// Combined FICA rate (Social Security + Medicare employee share)
pub const FICA_RATE: f64 = 0.0765;

/// Share of annual income considered affordable for HSA funding
const AFFORDABILITY_FRACTION: f64 = 0.10;

/// Input record for one HSA analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HsaInput {
    /// HDHP coverage tier
    pub coverage: CoverageType,

    /// Account holder age
    pub age: u8,

    /// Annual employer HSA contribution
    pub employer_contribution: f64,

    /// Current HSA balance
    pub current_balance: f64,

    /// Expected annual qualified medical expenses (year-1 dollars)
    pub expected_annual_expenses: f64,

    /// Annual household income
    pub annual_income: f64,

    /// Marginal federal income tax rate
    pub federal_tax_rate: f64,

    /// Marginal state income tax rate
    pub state_tax_rate: f64,

    /// Expected annual investment return on the balance
    pub expected_return: f64,

    /// Annual healthcare cost inflation applied from year 2 on
    pub healthcare_inflation: f64,

    /// Projection horizon in years
    pub projection_years: u32,
}

/// Tax savings on the recommended contribution
///
/// Components are rounded to whole dollars independently before summing so
/// the total always matches the displayed breakdown figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSavings {
    pub federal: f64,
    pub state: f64,
    pub fica: f64,
    pub total: f64,
}

impl TaxSavings {
    fn compute(contribution: f64, federal_rate: f64, state_rate: f64) -> Self {
        let federal = (contribution * federal_rate).round();
        let state = (contribution * state_rate).round();
        let fica = (contribution * FICA_RATE).round();
        Self {
            federal,
            state,
            fica,
            total: federal + state + fica,
        }
    }
}

/// One year of the balance projection
///
/// Each row derives purely from the prior row plus that year's assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRow {
    /// Projection year (1-indexed)
    pub year: u32,
    pub beginning_balance: f64,

    /// Employee plus employer contribution for the year
    pub contribution: f64,

    /// Growth on the beginning balance
    pub investment_growth: f64,

    /// Qualified expenses paid, capped at available funds
    pub expenses_paid: f64,
    pub ending_balance: f64,
}

/// Complete HSA analysis output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HsaAnalysis {
    pub limits: HsaContributionBreakdown,

    /// Recommended annual employee contribution
    pub recommended_contribution: f64,

    pub tax_savings: TaxSavings,
    pub projection: Vec<ProjectionRow>,
    pub recommendations: Vec<String>,

    /// Points in favor of the HSA in an HSA-vs-FSA comparison
    pub hsa_advantages: Vec<String>,

    /// Points in favor of an FSA in the same comparison
    pub fsa_advantages: Vec<String>,
}

/// HSA optimizer over a set of reference tables
pub struct HsaOptimizer {
    tables: EngineTables,
}

impl HsaOptimizer {
    pub fn new(tables: EngineTables) -> Self {
        Self { tables }
    }

    /// Run the full analysis for one account holder
    pub fn optimize(&self, input: &HsaInput) -> HsaAnalysis {
        let limits = HsaContributionBreakdown::compute(
            &self.tables.limits,
            input.coverage,
            input.age,
            input.employer_contribution,
        );

        let recommended = self.recommended_contribution(input, &limits);
        let tax_savings =
            TaxSavings::compute(recommended, input.federal_tax_rate, input.state_tax_rate);
        let projection = self.project(input, recommended);
        let recommendations = self.recommendations(input, &limits, recommended, &projection);

        debug!(
            "HSA {} age {}: recommending ${:.0} of ${:.0} headroom",
            limits.coverage.as_str(),
            input.age,
            recommended,
            limits.max_employee_contribution
        );

        HsaAnalysis {
            limits,
            recommended_contribution: recommended,
            tax_savings,
            projection,
            recommendations,
            hsa_advantages: hsa_advantages(),
            fsa_advantages: fsa_advantages(),
        }
    }

    /// Affordability heuristic for the recommended employee contribution
    ///
    /// If a tenth of income covers the full employee headroom, recommend the
    /// maximum; otherwise recommend the greater of expected expenses and the
    /// employer contribution, capped at the affordable amount and headroom.
    fn recommended_contribution(
        &self,
        input: &HsaInput,
        limits: &HsaContributionBreakdown,
    ) -> f64 {
        let affordable = input.annual_income * AFFORDABILITY_FRACTION;
        if affordable >= limits.max_employee_contribution {
            return limits.max_employee_contribution;
        }

        input
            .expected_annual_expenses
            .max(input.employer_contribution)
            .min(affordable)
            .min(limits.max_employee_contribution)
            .max(0.0)
    }

    /// Year-by-year balance projection
    fn project(&self, input: &HsaInput, employee_contribution: f64) -> Vec<ProjectionRow> {
        let annual_contribution = employee_contribution + input.employer_contribution;
        let mut rows = Vec::with_capacity(input.projection_years as usize);
        let mut beginning_balance = input.current_balance;

        for year in 1..=input.projection_years {
            let investment_growth = beginning_balance * input.expected_return;
            let available = beginning_balance + annual_contribution + investment_growth;

            // Year 1 uses the raw expense figure; inflation starts in year 2
            let inflated_expenses = input.expected_annual_expenses
                * (1.0 + input.healthcare_inflation).powi(year as i32 - 1);
            let expenses_paid = inflated_expenses.min(available).max(0.0);

            let ending_balance = available - expenses_paid;

            rows.push(ProjectionRow {
                year,
                beginning_balance,
                contribution: annual_contribution,
                investment_growth,
                expenses_paid,
                ending_balance,
            });

            beginning_balance = ending_balance;
        }

        rows
    }

    fn recommendations(
        &self,
        input: &HsaInput,
        limits: &HsaContributionBreakdown,
        recommended: f64,
        projection: &[ProjectionRow],
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if recommended >= limits.max_employee_contribution
            && limits.max_employee_contribution > 0.0
        {
            recommendations.push(format!(
                "Fund the full ${:.0} employee contribution; the triple tax advantage \
                 is unmatched by any other account",
                limits.max_employee_contribution
            ));
        } else if recommended < limits.max_employee_contribution {
            recommendations.push(format!(
                "${:.0} of employee headroom remains beyond the recommended ${:.0}; \
                 revisit if cash flow allows",
                limits.max_employee_contribution - recommended,
                recommended
            ));
        }

        if !limits.catch_up_eligible
            && input.age >= self.tables.limits.hsa_catch_up_age.saturating_sub(5)
        {
            recommendations.push(format!(
                "An extra ${:.0} catch-up contribution unlocks at age {}",
                self.tables.limits.hsa_catch_up,
                self.tables.limits.hsa_catch_up_age
            ));
        }

        if let Some(last) = projection.last() {
            if last.ending_balance > 0.0 {
                recommendations.push(format!(
                    "Projected balance of ${:.0} after {} years can be invested for \
                     tax-free growth toward retirement medical costs",
                    last.ending_balance, last.year
                ));
            }
        }

        let shortfall = projection.iter().any(|row| {
            let target = input.expected_annual_expenses
                * (1.0 + input.healthcare_inflation).powi(row.year as i32 - 1);
            row.expenses_paid < target - 1e-6
        });
        if shortfall {
            recommendations.push(
                "Projected expenses outrun available funds in some years; consider a \
                 higher contribution or a lower-deductible plan"
                    .to_string(),
            );
        }

        recommendations
    }
}

fn hsa_advantages() -> Vec<String> {
    [
        "Balances roll over year to year with no forfeiture",
        "Contributions, growth, and qualified withdrawals are all untaxed",
        "The account is portable across employers",
        "Balances can be invested once past the cash minimum",
        "After 65, withdrawals for any purpose are taxed like a traditional IRA",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn fsa_advantages() -> Vec<String> {
    [
        "The full annual election is available on day one",
        "No HDHP enrollment requirement",
        "Can pair with any health plan, including low-deductible coverage",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn optimizer() -> HsaOptimizer {
        HsaOptimizer::new(EngineTables::default_2024())
    }

    fn input() -> HsaInput {
        HsaInput {
            coverage: CoverageType::Individual,
            age: 40,
            employer_contribution: 500.0,
            current_balance: 2_000.0,
            expected_annual_expenses: 1_500.0,
            annual_income: 80_000.0,
            federal_tax_rate: 0.22,
            state_tax_rate: 0.05,
            expected_return: 0.05,
            healthcare_inflation: 0.055,
            projection_years: 10,
        }
    }

    #[test]
    fn test_limits_flow_through() {
        let analysis = optimizer().optimize(&input());
        assert_eq!(analysis.limits.total_limit, 4_150.0);
        assert_eq!(analysis.limits.max_employee_contribution, 3_650.0);
    }

    #[test]
    fn test_catch_up_at_55() {
        let mut hsa_input = input();
        hsa_input.age = 55;
        hsa_input.employer_contribution = 0.0;
        let analysis = optimizer().optimize(&hsa_input);
        assert_eq!(analysis.limits.total_limit, 5_150.0);
        assert!(analysis.limits.catch_up_eligible);
    }

    #[test]
    fn test_affordable_income_recommends_max() {
        // 10% of 80,000 covers the 3,650 employee headroom
        let analysis = optimizer().optimize(&input());
        assert_eq!(analysis.recommended_contribution, 3_650.0);
    }

    #[test]
    fn test_tight_income_caps_recommendation() {
        let mut hsa_input = input();
        hsa_input.annual_income = 20_000.0; // affordable = 2,000
        hsa_input.expected_annual_expenses = 2_800.0;
        let analysis = optimizer().optimize(&hsa_input);
        // Greater of (expenses 2,800, employer 500) capped at affordable 2,000
        assert_eq!(analysis.recommended_contribution, 2_000.0);
    }

    #[test]
    fn test_expenses_drive_recommendation_when_affordable() {
        let mut hsa_input = input();
        hsa_input.annual_income = 30_000.0; // affordable = 3,000
        hsa_input.expected_annual_expenses = 2_500.0;
        let analysis = optimizer().optimize(&hsa_input);
        assert_eq!(analysis.recommended_contribution, 2_500.0);
    }

    #[test]
    fn test_tax_savings_components_rounded_independently() {
        let savings = TaxSavings::compute(4_150.0, 0.22, 0.05);
        assert_eq!(savings.federal, 913.0);
        assert_eq!(savings.state, 208.0); // 207.5 rounds up
        assert_eq!(savings.fica, 317.0); // 317.475 rounds down
        assert_eq!(savings.total, 913.0 + 208.0 + 317.0);
    }

    #[test]
    fn test_projection_zero_expense_invariant() {
        let mut hsa_input = input();
        hsa_input.expected_annual_expenses = 0.0;
        let analysis = optimizer().optimize(&hsa_input);

        let first = &analysis.projection[0];
        let total_contribution = analysis.recommended_contribution + 500.0;
        assert_relative_eq!(
            first.ending_balance,
            2_000.0 * 1.05 + total_contribution,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_projection_inflates_expenses_from_year_two() {
        let analysis = optimizer().optimize(&input());

        let year1 = &analysis.projection[0];
        let year2 = &analysis.projection[1];
        // Year 1 pays the raw figure, year 2 the once-inflated figure
        assert_relative_eq!(year1.expenses_paid, 1_500.0, epsilon = 1e-9);
        assert_relative_eq!(year2.expenses_paid, 1_500.0 * 1.055, epsilon = 1e-9);
    }

    #[test]
    fn test_projection_rows_chain() {
        let analysis = optimizer().optimize(&input());
        assert_eq!(analysis.projection.len(), 10);

        for pair in analysis.projection.windows(2) {
            assert_relative_eq!(
                pair[1].beginning_balance,
                pair[0].ending_balance,
                epsilon = 1e-9
            );
        }

        for row in &analysis.projection {
            let available = row.beginning_balance + row.contribution + row.investment_growth;
            assert_relative_eq!(
                row.ending_balance,
                available - row.expenses_paid,
                epsilon = 1e-9
            );
            assert!(row.ending_balance >= -1e-9);
        }
    }

    #[test]
    fn test_expenses_capped_at_available_funds() {
        let mut hsa_input = input();
        hsa_input.current_balance = 0.0;
        hsa_input.annual_income = 10_000.0; // affordable = 1,000
        hsa_input.expected_annual_expenses = 50_000.0;
        let analysis = optimizer().optimize(&hsa_input);

        for row in &analysis.projection {
            let available = row.beginning_balance + row.contribution + row.investment_growth;
            assert!(row.expenses_paid <= available + 1e-9);
            assert!(row.ending_balance >= -1e-9);
        }
    }

    #[test]
    fn test_growth_computed_off_beginning_balance() {
        let analysis = optimizer().optimize(&input());
        for row in &analysis.projection {
            assert_relative_eq!(
                row.investment_growth,
                row.beginning_balance * 0.05,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_comparison_lists_present() {
        let analysis = optimizer().optimize(&input());
        assert!(!analysis.hsa_advantages.is_empty());
        assert!(!analysis.fsa_advantages.is_empty());
    }
}
