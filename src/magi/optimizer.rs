//! MAGI analysis: tier classification, breakpoints, optimal-income search,
//! and cliff risk
//!
//! The "optimization" here is a bounded discrete search over the fixed
//! breakpoint list — the breakpoint table is the policy-defined granularity,
//! so no continuous solver is involved.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::tables::EngineTables;

use super::strategies::{self, Strategy, StrategyContext};
use super::subsidy::{ContributionSchedule, SubsidyFigures};

/// Statutory subsidy eligibility line
pub const STATUTORY_CLIFF_FPL_PCT: f64 = 400.0;

/// Modeled cliff reflecting enhanced-subsidy tapering
///
/// Kept separate from the statutory line on purpose: tier classification and
/// the statutory delta use 400%, distance/headroom metrics use 450%.
pub const EFFECTIVE_CLIFF_FPL_PCT: f64 = 450.0;

/// FPL percentage below which Medicaid applies in expansion states
pub const MEDICAID_EXPANSION_FPL_PCT: f64 = 138.0;

/// Fixed FPL levels tabulated for reference and candidate search
pub const BREAKPOINT_LEVELS: [f64; 9] =
    [100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0];

/// Watch band around the statutory line that triggers `near_cliff`
const NEAR_CLIFF_BAND: (f64, f64) = (380.0, 420.0);

/// After-tax value of a dollar of forgone income
const AFTER_TAX_VALUE_OF_FORGONE_INCOME: f64 = 0.75;

/// Offset used to sample "just below" / "just above" the statutory line
const STATUTORY_LINE_EPSILON_PCT: f64 = 0.01;

/// Income tier relative to subsidy program boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagiTier {
    Medicaid,
    Subsidy,
    Cliff,
    AboveCliff,
}

impl MagiTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MagiTier::Medicaid => "medicaid",
            MagiTier::Subsidy => "subsidy",
            MagiTier::Cliff => "cliff",
            MagiTier::AboveCliff => "above_cliff",
        }
    }
}

/// Input record for one MAGI analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagiInput {
    /// Tax household size
    pub household_size: usize,

    /// Estimated MAGI for the coverage year
    pub magi: f64,

    /// Primary residence state (drives Medicaid expansion treatment)
    pub state: String,

    /// Benchmark (second-lowest silver) plan monthly premium
    pub benchmark_premium_monthly: f64,

    /// Facts for the reduction-strategy generator
    #[serde(default)]
    pub strategy: StrategyContext,
}

/// One row of the breakpoint reference table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breakpoint {
    pub fpl_percent: f64,
    pub income: f64,
    pub contribution_percent: f64,
    pub monthly_subsidy: f64,
    pub annual_subsidy: f64,
}

/// Best income target found by the discrete search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimalTarget {
    pub target_fpl_percent: f64,
    pub target_magi: f64,

    /// MAGI reduction required to reach the target
    pub reduction_needed: f64,

    pub annual_subsidy_at_target: f64,

    /// Annual subsidy gain over the current position
    pub subsidy_gain_annual: f64,

    /// Gain net of the after-tax value of the forgone income
    pub net_benefit_annual: f64,
}

/// Cliff proximity metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliffRisk {
    pub fpl_percent: f64,

    /// Within the watch band around the statutory line
    pub near_cliff: bool,

    /// Income headroom before the effective (450%) cliff; negative when past it
    pub distance_to_effective_cliff: f64,

    /// Annual subsidy change from just below to just above the statutory line
    pub statutory_delta_annual: f64,
}

/// Complete MAGI analysis output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagiAnalysis {
    pub tier: MagiTier,
    pub fpl_percent: f64,
    pub current: SubsidyFigures,
    pub breakpoints: Vec<Breakpoint>,
    pub optimal_target: Option<OptimalTarget>,
    pub strategies: Vec<Strategy>,
    pub cliff: CliffRisk,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// MAGI/subsidy optimizer over a set of reference tables
pub struct MagiOptimizer {
    tables: EngineTables,
    schedule: ContributionSchedule,
}

impl MagiOptimizer {
    pub fn new(tables: EngineTables) -> Self {
        Self {
            tables,
            schedule: ContributionSchedule::default(),
        }
    }

    /// Run the full analysis for one household income position
    pub fn analyze(&self, input: &MagiInput) -> MagiAnalysis {
        let fpl = &self.tables.fpl;
        let expansion = self.tables.expansion.contains(&input.state);

        let current = SubsidyFigures::compute(
            input.magi,
            input.household_size,
            input.benchmark_premium_monthly,
            fpl,
            &self.schedule,
        );
        let fpl_percent = current.fpl_percent;
        let tier = classify_tier(fpl_percent, expansion);

        let breakpoints = self.breakpoints(input);
        let optimal_target = self.search_optimal(input, &current, &breakpoints);
        let cliff = self.cliff_risk(input, fpl_percent);

        // Strategies target the optimal reduction when one exists; past the
        // statutory line the fallback target is getting back under it
        let reduction_target = match &optimal_target {
            Some(target) => target.reduction_needed,
            None if fpl_percent > STATUTORY_CLIFF_FPL_PCT => {
                input.magi
                    - fpl.income_at_percent(STATUTORY_CLIFF_FPL_PCT, input.household_size)
            }
            None => 0.0,
        };
        let strategies = strategies::generate(
            &input.strategy,
            &self.tables.limits,
            input.magi,
            reduction_target,
        );

        let warnings = self.warnings(tier, fpl_percent, expansion, &cliff);
        let recommendations =
            self.recommendations(tier, &current, &optimal_target, &strategies);

        debug!(
            "MAGI {:.0} (size {}) -> {:.1}% FPL, tier {}",
            input.magi,
            input.household_size,
            fpl_percent,
            tier.as_str()
        );

        MagiAnalysis {
            tier,
            fpl_percent,
            current,
            breakpoints,
            optimal_target,
            strategies,
            cliff,
            warnings,
            recommendations,
        }
    }

    /// Subsidy figures at each fixed breakpoint level
    fn breakpoints(&self, input: &MagiInput) -> Vec<Breakpoint> {
        BREAKPOINT_LEVELS
            .iter()
            .map(|&level| {
                let income = self
                    .tables
                    .fpl
                    .income_at_percent(level, input.household_size);
                let figures = SubsidyFigures::compute(
                    income,
                    input.household_size,
                    input.benchmark_premium_monthly,
                    &self.tables.fpl,
                    &self.schedule,
                );
                Breakpoint {
                    fpl_percent: level,
                    income,
                    contribution_percent: figures.contribution_percent,
                    monthly_subsidy: figures.monthly_subsidy,
                    annual_subsidy: figures.annual_subsidy,
                }
            })
            .collect()
    }

    /// Bounded discrete search over breakpoint levels below the current one
    ///
    /// A candidate is viable when its annual subsidy gain beats the
    /// after-tax value of the income given up; the winner is the viable
    /// candidate with the highest annual subsidy.
    fn search_optimal(
        &self,
        input: &MagiInput,
        current: &SubsidyFigures,
        breakpoints: &[Breakpoint],
    ) -> Option<OptimalTarget> {
        let mut best: Option<OptimalTarget> = None;

        for breakpoint in breakpoints {
            if breakpoint.fpl_percent >= current.fpl_percent {
                continue;
            }

            let reduction_needed = input.magi - breakpoint.income;
            let subsidy_gain = breakpoint.annual_subsidy - current.annual_subsidy;
            let net_benefit =
                subsidy_gain - reduction_needed * AFTER_TAX_VALUE_OF_FORGONE_INCOME;

            if net_benefit <= 0.0 {
                continue;
            }

            let candidate = OptimalTarget {
                target_fpl_percent: breakpoint.fpl_percent,
                target_magi: breakpoint.income,
                reduction_needed,
                annual_subsidy_at_target: breakpoint.annual_subsidy,
                subsidy_gain_annual: subsidy_gain,
                net_benefit_annual: net_benefit,
            };

            let better = best
                .as_ref()
                .map_or(true, |b| candidate.annual_subsidy_at_target > b.annual_subsidy_at_target);
            if better {
                best = Some(candidate);
            }
        }

        best
    }

    fn cliff_risk(&self, input: &MagiInput, fpl_percent: f64) -> CliffRisk {
        let fpl = &self.tables.fpl;
        let near_cliff =
            fpl_percent >= NEAR_CLIFF_BAND.0 && fpl_percent <= NEAR_CLIFF_BAND.1;

        let effective_cliff_income =
            fpl.income_at_percent(EFFECTIVE_CLIFF_FPL_PCT, input.household_size);
        let distance_to_effective_cliff = effective_cliff_income - input.magi;

        // Sample the statutory line from both sides
        let below = SubsidyFigures::compute(
            fpl.income_at_percent(
                STATUTORY_CLIFF_FPL_PCT - STATUTORY_LINE_EPSILON_PCT,
                input.household_size,
            ),
            input.household_size,
            input.benchmark_premium_monthly,
            fpl,
            &self.schedule,
        );
        let above = SubsidyFigures::compute(
            fpl.income_at_percent(
                STATUTORY_CLIFF_FPL_PCT + STATUTORY_LINE_EPSILON_PCT,
                input.household_size,
            ),
            input.household_size,
            input.benchmark_premium_monthly,
            fpl,
            &self.schedule,
        );

        CliffRisk {
            fpl_percent,
            near_cliff,
            distance_to_effective_cliff,
            statutory_delta_annual: below.annual_subsidy - above.annual_subsidy,
        }
    }

    fn warnings(
        &self,
        tier: MagiTier,
        fpl_percent: f64,
        expansion: bool,
        cliff: &CliffRisk,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        if fpl_percent < 100.0 && !expansion {
            warnings.push(
                "Income is below 100% FPL in a non-expansion state: the household may fall \
                 in the coverage gap with neither Medicaid nor subsidy eligibility"
                    .to_string(),
            );
        }

        if cliff.near_cliff {
            warnings.push(format!(
                "Income sits at {:.0}% FPL, inside the {:.0}-{:.0}% watch band around the \
                 statutory subsidy line",
                fpl_percent, NEAR_CLIFF_BAND.0, NEAR_CLIFF_BAND.1
            ));
        }

        if tier == MagiTier::AboveCliff {
            warnings.push(format!(
                "Income exceeds {:.0}% FPL; subsidy support has fully tapered at this level",
                EFFECTIVE_CLIFF_FPL_PCT
            ));
        }

        warnings
    }

    fn recommendations(
        &self,
        tier: MagiTier,
        current: &SubsidyFigures,
        optimal: &Option<OptimalTarget>,
        strategies: &[Strategy],
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        if let Some(target) = optimal {
            recommendations.push(format!(
                "Reducing MAGI by ${:.0} to ${:.0} ({:.0}% FPL) raises the annual subsidy \
                 by ${:.0} for a net benefit of ${:.0}",
                target.reduction_needed,
                target.target_magi,
                target.target_fpl_percent,
                target.subsidy_gain_annual,
                target.net_benefit_annual
            ));
        }

        if matches!(tier, MagiTier::Cliff | MagiTier::AboveCliff) {
            if let Some(best) = strategies
                .iter()
                .find(|s| s.applicable && s.max_reduction > 0.0)
            {
                recommendations.push(format!(
                    "{} offers up to ${:.0} of MAGI headroom toward moving below the \
                     statutory line",
                    best.name, best.max_reduction
                ));
            }
        }

        if tier == MagiTier::Medicaid {
            recommendations.push(
                "The household appears Medicaid-eligible; marketplace subsidies do not \
                 apply while Medicaid eligibility holds"
                    .to_string(),
            );
        }

        if current.monthly_subsidy > 0.0 {
            recommendations.push(format!(
                "Current position qualifies for ${:.0}/month (${:.0}/year) in premium subsidy",
                current.monthly_subsidy, current.annual_subsidy
            ));
        }

        recommendations
    }
}

/// Classify the subsidy tier for an FPL percentage
fn classify_tier(fpl_percent: f64, expansion_state: bool) -> MagiTier {
    if fpl_percent < MEDICAID_EXPANSION_FPL_PCT {
        // Below-100% households in non-expansion states still classify as
        // subsidy; the coverage-gap warning fires separately
        if expansion_state {
            MagiTier::Medicaid
        } else {
            MagiTier::Subsidy
        }
    } else if fpl_percent <= STATUTORY_CLIFF_FPL_PCT {
        MagiTier::Subsidy
    } else if fpl_percent <= EFFECTIVE_CLIFF_FPL_PCT {
        MagiTier::Cliff
    } else {
        MagiTier::AboveCliff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer() -> MagiOptimizer {
        MagiOptimizer::new(EngineTables::default_2024())
    }

    fn input(magi: f64, state: &str) -> MagiInput {
        MagiInput {
            household_size: 2,
            magi,
            state: state.to_string(),
            benchmark_premium_monthly: 650.0,
            strategy: StrategyContext {
                oldest_adult_age: 45,
                has_employer_plan: true,
                hdhp_enrolled: true,
                hsa_family_coverage: true,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_tier_classification_boundaries() {
        assert_eq!(classify_tier(50.0, true), MagiTier::Medicaid);
        assert_eq!(classify_tier(50.0, false), MagiTier::Subsidy);
        assert_eq!(classify_tier(120.0, true), MagiTier::Medicaid);
        assert_eq!(classify_tier(120.0, false), MagiTier::Subsidy);
        assert_eq!(classify_tier(138.0, true), MagiTier::Subsidy);
        assert_eq!(classify_tier(250.0, false), MagiTier::Subsidy);
        assert_eq!(classify_tier(400.0, false), MagiTier::Subsidy);
        assert_eq!(classify_tier(400.1, false), MagiTier::Cliff);
        assert_eq!(classify_tier(450.0, false), MagiTier::Cliff);
        assert_eq!(classify_tier(450.1, false), MagiTier::AboveCliff);
    }

    #[test]
    fn test_two_person_household_at_2x_fpl() {
        let analysis = optimizer().analyze(&input(39_440.0, "CA"));
        assert!((analysis.fpl_percent - 200.0).abs() < 1e-9);
        assert_eq!(analysis.tier, MagiTier::Subsidy);
    }

    #[test]
    fn test_cliff_tier_at_82k() {
        // 82,000 / 19,720 is roughly 415.8% FPL
        let analysis = optimizer().analyze(&input(82_000.0, "CA"));
        assert_eq!(analysis.tier, MagiTier::Cliff);
        assert!((analysis.fpl_percent - 415.8).abs() < 0.1);
        assert!(analysis.cliff.near_cliff);
    }

    #[test]
    fn test_breakpoint_table_levels_and_monotonicity() {
        let analysis = optimizer().analyze(&input(60_000.0, "CA"));
        assert_eq!(analysis.breakpoints.len(), BREAKPOINT_LEVELS.len());

        for (row, level) in analysis.breakpoints.iter().zip(BREAKPOINT_LEVELS) {
            assert_eq!(row.fpl_percent, level);
        }

        // Annual subsidy is non-increasing as the level rises
        for pair in analysis.breakpoints.windows(2) {
            assert!(pair[0].annual_subsidy >= pair[1].annual_subsidy - 1e-9);
        }
    }

    #[test]
    fn test_coverage_gap_warning_in_non_expansion_state() {
        let analysis = optimizer().analyze(&input(15_000.0, "TX"));
        // 15,000 / 19,720 is ~76% FPL
        assert_eq!(analysis.tier, MagiTier::Subsidy);
        assert!(analysis
            .warnings
            .iter()
            .any(|w| w.contains("coverage gap")));

        // Expansion state: Medicaid tier, no gap warning
        let expansion = optimizer().analyze(&input(15_000.0, "CA"));
        assert_eq!(expansion.tier, MagiTier::Medicaid);
        assert!(!expansion.warnings.iter().any(|w| w.contains("coverage gap")));
    }

    #[test]
    fn test_near_cliff_band() {
        let near = optimizer().analyze(&input(79_000.0, "CA")); // ~400.6%
        assert!(near.cliff.near_cliff);

        let far = optimizer().analyze(&input(60_000.0, "CA")); // ~304%
        assert!(!far.cliff.near_cliff);
    }

    #[test]
    fn test_distance_to_effective_cliff() {
        let analysis = optimizer().analyze(&input(82_000.0, "CA"));
        // Effective cliff for size 2 is 450% of 19,720 = 88,740
        assert!((analysis.cliff.distance_to_effective_cliff - (88_740.0 - 82_000.0)).abs() < 1e-6);

        let past = optimizer().analyze(&input(95_000.0, "CA"));
        assert!(past.cliff.distance_to_effective_cliff < 0.0);
    }

    #[test]
    fn test_statutory_delta_small_under_flat_schedule() {
        // With the contribution percentage flat at 8.5% across the statutory
        // line, crossing it moves the subsidy only marginally
        let analysis = optimizer().analyze(&input(82_000.0, "CA"));
        assert!(analysis.cliff.statutory_delta_annual.abs() < 50.0);
    }

    #[test]
    fn test_optimal_search_requires_positive_net_benefit() {
        // With the smooth schedule, breakpoint-sized reductions cost more in
        // after-tax income than they recover in subsidy
        let analysis = optimizer().analyze(&input(82_000.0, "CA"));
        assert!(analysis.optimal_target.is_none());
    }

    #[test]
    fn test_optimal_search_only_considers_lower_levels() {
        let analysis = optimizer().analyze(&input(45_000.0, "CA")); // ~228%
        if let Some(target) = &analysis.optimal_target {
            assert!(target.target_fpl_percent < analysis.fpl_percent);
            assert!(target.net_benefit_annual > 0.0);
        }
    }

    #[test]
    fn test_cliff_fallback_reduction_target() {
        // Past the statutory line with no viable optimal target, strategies
        // aim at getting back under 400% FPL
        let analysis = optimizer().analyze(&input(82_000.0, "CA"));
        assert!(analysis.optimal_target.is_none());

        let statutory_income = 19_720.0 * 4.0;
        let needed = 82_000.0 - statutory_income;
        let allocated: f64 = analysis
            .strategies
            .iter()
            .map(|s| s.recommended_reduction)
            .sum();
        assert!((allocated - needed).abs() < 1e-6);
    }

    #[test]
    fn test_strategies_sorted_and_gated() {
        let mut magi_input = input(82_000.0, "CA");
        magi_input.strategy.has_employer_plan = false;

        let analysis = optimizer().analyze(&magi_input);
        for pair in analysis.strategies.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
        }

        let k401 = analysis
            .strategies
            .iter()
            .find(|s| s.kind == crate::magi::StrategyKind::Retirement401k)
            .unwrap();
        assert!(!k401.applicable);
        assert_eq!(k401.recommended_reduction, 0.0);
    }

    #[test]
    fn test_above_cliff_warning() {
        let analysis = optimizer().analyze(&input(95_000.0, "CA")); // ~482%
        assert_eq!(analysis.tier, MagiTier::AboveCliff);
        assert!(!analysis.warnings.is_empty());
    }
}
