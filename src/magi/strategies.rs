//! MAGI reduction strategies
//!
//! Each lever computes its remaining headroom from the year's
//! contribution-limit table and current usage. Inapplicability is a modeled
//! data outcome (`applicable = false` plus a reason), never an error.

use serde::{Deserialize, Serialize};

use crate::tables::ContributionLimits;

/// Fraction of MAGI that can realistically be shifted across year-end
const INCOME_TIMING_FRACTION: f64 = 0.10;

/// Cap on income shifted via timing alone
const INCOME_TIMING_CAP: f64 = 20_000.0;

/// SEP-style deduction fraction of self-employment income
const SELF_EMPLOYMENT_DEDUCTION_FRACTION: f64 = 0.20;

/// Reduction lever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Retirement401k,
    Hsa,
    TraditionalIra,
    SelfEmploymentDeduction,
    IncomeTiming,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Retirement401k => "Pre-tax 401(k) contributions",
            StrategyKind::Hsa => "HSA contributions",
            StrategyKind::TraditionalIra => "Traditional IRA contributions",
            StrategyKind::SelfEmploymentDeduction => "Self-employment deductions",
            StrategyKind::IncomeTiming => "Income timing",
        }
    }

    /// Rank for ascending sort; lower ranks are pulled first when
    /// allocating a reduction target
    pub fn priority_rank(&self) -> u8 {
        match self {
            StrategyKind::Retirement401k => 1,
            StrategyKind::Hsa => 2,
            StrategyKind::TraditionalIra => 3,
            StrategyKind::SelfEmploymentDeduction => 4,
            StrategyKind::IncomeTiming => 5,
        }
    }
}

/// Household facts the strategy generator needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrategyContext {
    /// Age of the oldest adult (drives catch-up eligibility)
    pub oldest_adult_age: u8,

    /// Access to an employer-sponsored retirement plan
    pub has_employer_plan: bool,

    /// Pre-tax 401(k) contributions already elected this year
    pub current_401k_contribution: f64,

    /// Traditional IRA contributions already made this year
    pub current_ira_contribution: f64,

    /// Enrolled in an HSA-qualified high-deductible health plan
    pub hdhp_enrolled: bool,

    /// HDHP covers the family rather than self-only
    pub hsa_family_coverage: bool,

    /// HSA contributions already made this year
    pub current_hsa_contribution: f64,

    /// Net self-employment income, if any
    pub self_employment_income: f64,
}

/// One applicability-gated reduction strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub name: String,
    pub description: String,

    /// Remaining headroom under the year's limits
    pub max_reduction: f64,

    /// Portion of the reduction target allocated to this lever
    pub recommended_reduction: f64,

    /// Whether the household can use this lever at all
    pub applicable: bool,

    /// Why the lever is unavailable, when it is
    pub inapplicable_reason: Option<String>,

    /// Ascending priority rank
    pub priority: u8,
}

/// Generate all strategies, sorted ascending by priority, with the
/// reduction target allocated greedily across applicable levers
pub fn generate(
    context: &StrategyContext,
    limits: &ContributionLimits,
    magi: f64,
    reduction_target: f64,
) -> Vec<Strategy> {
    let mut strategies = vec![
        retirement_401k(context, limits),
        hsa(context, limits),
        traditional_ira(context, limits),
        self_employment(context),
        income_timing(magi),
    ];

    strategies.sort_by_key(|s| s.priority);

    // Greedy allocation in priority order; inapplicable levers get nothing
    let mut remaining = reduction_target.max(0.0);
    for strategy in &mut strategies {
        if !strategy.applicable || remaining <= 0.0 {
            continue;
        }
        let take = strategy.max_reduction.min(remaining);
        strategy.recommended_reduction = take;
        remaining -= take;
    }

    strategies
}

fn retirement_401k(context: &StrategyContext, limits: &ContributionLimits) -> Strategy {
    let kind = StrategyKind::Retirement401k;
    let limit = limits.limit_401k(context.oldest_adult_age);
    let max_reduction = (limit - context.current_401k_contribution).max(0.0);
    let applicable = context.has_employer_plan;

    Strategy {
        kind,
        name: kind.name().to_string(),
        description: format!(
            "Elective deferrals up to ${:.0} reduce MAGI dollar-for-dollar",
            limit
        ),
        max_reduction: if applicable { max_reduction } else { 0.0 },
        recommended_reduction: 0.0,
        applicable,
        inapplicable_reason: (!applicable)
            .then(|| "No employer-sponsored retirement plan available".to_string()),
        priority: kind.priority_rank(),
    }
}

fn hsa(context: &StrategyContext, limits: &ContributionLimits) -> Strategy {
    let kind = StrategyKind::Hsa;
    let base = if context.hsa_family_coverage {
        limits.hsa_family
    } else {
        limits.hsa_individual
    };
    let catch_up = if context.oldest_adult_age >= limits.hsa_catch_up_age {
        limits.hsa_catch_up
    } else {
        0.0
    };
    let max_reduction = (base + catch_up - context.current_hsa_contribution).max(0.0);
    let applicable = context.hdhp_enrolled;

    Strategy {
        kind,
        name: kind.name().to_string(),
        description: "HSA contributions reduce MAGI and are never taxed when spent on care"
            .to_string(),
        max_reduction: if applicable { max_reduction } else { 0.0 },
        recommended_reduction: 0.0,
        applicable,
        inapplicable_reason: (!applicable)
            .then(|| "Not enrolled in an HSA-qualified high-deductible plan".to_string()),
        priority: kind.priority_rank(),
    }
}

fn traditional_ira(context: &StrategyContext, limits: &ContributionLimits) -> Strategy {
    let kind = StrategyKind::TraditionalIra;
    let limit = limits.limit_ira(context.oldest_adult_age);
    let max_reduction = (limit - context.current_ira_contribution).max(0.0);

    Strategy {
        kind,
        name: kind.name().to_string(),
        description: format!(
            "Deductible IRA contributions up to ${:.0} reduce MAGI",
            limit
        ),
        max_reduction,
        recommended_reduction: 0.0,
        applicable: true,
        inapplicable_reason: None,
        priority: kind.priority_rank(),
    }
}

fn self_employment(context: &StrategyContext) -> Strategy {
    let kind = StrategyKind::SelfEmploymentDeduction;
    let applicable = context.self_employment_income > 0.0;
    let max_reduction = if applicable {
        context.self_employment_income * SELF_EMPLOYMENT_DEDUCTION_FRACTION
    } else {
        0.0
    };

    Strategy {
        kind,
        name: kind.name().to_string(),
        description: "SEP-style retirement deductions shelter a share of self-employment income"
            .to_string(),
        max_reduction,
        recommended_reduction: 0.0,
        applicable,
        inapplicable_reason: (!applicable)
            .then(|| "No self-employment income reported".to_string()),
        priority: kind.priority_rank(),
    }
}

fn income_timing(magi: f64) -> Strategy {
    let kind = StrategyKind::IncomeTiming;
    let max_reduction = (magi * INCOME_TIMING_FRACTION).min(INCOME_TIMING_CAP).max(0.0);

    Strategy {
        kind,
        name: kind.name().to_string(),
        description: "Deferring year-end bonuses or invoices shifts income into next year"
            .to_string(),
        max_reduction,
        recommended_reduction: 0.0,
        applicable: true,
        inapplicable_reason: None,
        priority: kind.priority_rank(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> StrategyContext {
        StrategyContext {
            oldest_adult_age: 45,
            has_employer_plan: true,
            current_401k_contribution: 5_000.0,
            current_ira_contribution: 0.0,
            hdhp_enrolled: true,
            hsa_family_coverage: true,
            current_hsa_contribution: 1_000.0,
            self_employment_income: 0.0,
        }
    }

    #[test]
    fn test_strategies_sorted_ascending_by_priority() {
        let limits = ContributionLimits::default_2024();
        let strategies = generate(&context(), &limits, 90_000.0, 10_000.0);
        for pair in strategies.windows(2) {
            assert!(pair[0].priority <= pair[1].priority);
        }
    }

    #[test]
    fn test_401k_headroom() {
        let limits = ContributionLimits::default_2024();
        let strategies = generate(&context(), &limits, 90_000.0, 0.0);
        let k401 = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::Retirement401k)
            .unwrap();
        assert!(k401.applicable);
        assert_eq!(k401.max_reduction, 23_000.0 - 5_000.0);
    }

    #[test]
    fn test_401k_catch_up_at_50() {
        let limits = ContributionLimits::default_2024();
        let mut ctx = context();
        ctx.oldest_adult_age = 52;
        let strategies = generate(&ctx, &limits, 90_000.0, 0.0);
        let k401 = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::Retirement401k)
            .unwrap();
        assert_eq!(k401.max_reduction, 30_500.0 - 5_000.0);
    }

    #[test]
    fn test_inapplicable_levers_carry_reasons() {
        let limits = ContributionLimits::default_2024();
        let mut ctx = context();
        ctx.has_employer_plan = false;
        ctx.hdhp_enrolled = false;

        let strategies = generate(&ctx, &limits, 90_000.0, 10_000.0);

        let k401 = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::Retirement401k)
            .unwrap();
        assert!(!k401.applicable);
        assert!(k401.inapplicable_reason.is_some());
        assert_eq!(k401.recommended_reduction, 0.0);

        let hsa = strategies.iter().find(|s| s.kind == StrategyKind::Hsa).unwrap();
        assert!(!hsa.applicable);
        assert!(hsa
            .inapplicable_reason
            .as_deref()
            .unwrap()
            .contains("high-deductible"));
    }

    #[test]
    fn test_greedy_allocation_follows_priority() {
        let limits = ContributionLimits::default_2024();
        let strategies = generate(&context(), &limits, 90_000.0, 20_000.0);

        // 401(k) headroom is 18,000; HSA picks up the remaining 2,000
        let k401 = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::Retirement401k)
            .unwrap();
        assert_eq!(k401.recommended_reduction, 18_000.0);

        let hsa = strategies.iter().find(|s| s.kind == StrategyKind::Hsa).unwrap();
        assert_eq!(hsa.recommended_reduction, 2_000.0);

        let ira = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::TraditionalIra)
            .unwrap();
        assert_eq!(ira.recommended_reduction, 0.0);
    }

    #[test]
    fn test_zero_target_allocates_nothing() {
        let limits = ContributionLimits::default_2024();
        let strategies = generate(&context(), &limits, 90_000.0, 0.0);
        assert!(strategies.iter().all(|s| s.recommended_reduction == 0.0));
    }

    #[test]
    fn test_self_employment_gated_on_income() {
        let limits = ContributionLimits::default_2024();
        let mut ctx = context();
        ctx.self_employment_income = 40_000.0;

        let strategies = generate(&ctx, &limits, 90_000.0, 0.0);
        let se = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::SelfEmploymentDeduction)
            .unwrap();
        assert!(se.applicable);
        assert_eq!(se.max_reduction, 8_000.0);
    }

    #[test]
    fn test_income_timing_capped() {
        let limits = ContributionLimits::default_2024();
        let strategies = generate(&context(), &limits, 400_000.0, 0.0);
        let timing = strategies
            .iter()
            .find(|s| s.kind == StrategyKind::IncomeTiming)
            .unwrap();
        assert_eq!(timing.max_reduction, INCOME_TIMING_CAP);
    }
}
