//! Premium subsidy formula
//!
//! The expected household contribution is a percentage of MAGI, linearly
//! interpolated inside fixed FPL brackets; the subsidy is whatever the
//! benchmark premium costs beyond that contribution.

use serde::{Deserialize, Serialize};

use crate::tables::FplTable;

/// Applicable contribution percentage by FPL bracket
///
/// Anchors are (FPL %, fraction of MAGI); between anchors the percentage
/// grades linearly, below the first anchor it is 0, above the last it is
/// flat at the last value.
#[derive(Debug, Clone)]
pub struct ContributionSchedule {
    anchors: Vec<(f64, f64)>,
}

impl Default for ContributionSchedule {
    fn default() -> Self {
        Self {
            anchors: vec![
                (100.0, 0.0),
                (150.0, 0.0),
                (200.0, 0.02),
                (250.0, 0.04),
                (300.0, 0.06),
                (400.0, 0.085),
            ],
        }
    }
}

impl ContributionSchedule {
    /// Expected contribution as a fraction of MAGI for an FPL percentage
    pub fn applicable_percentage(&self, fpl_percent: f64) -> f64 {
        let first = match self.anchors.first() {
            Some(&(pct, value)) => (pct, value),
            None => return 0.0,
        };
        if fpl_percent < first.0 {
            return 0.0;
        }

        for pair in self.anchors.windows(2) {
            let (p0, v0) = pair[0];
            let (p1, v1) = pair[1];
            if fpl_percent <= p1 {
                let t = (fpl_percent - p0) / (p1 - p0);
                return v0 + (v1 - v0) * t;
            }
        }

        // Above the last anchor the percentage stays flat
        self.anchors.last().map(|&(_, v)| v).unwrap_or(0.0)
    }
}

/// Subsidy figures at one income point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsidyFigures {
    /// MAGI as a percentage of FPL
    pub fpl_percent: f64,

    /// Expected contribution as a fraction of MAGI
    pub contribution_percent: f64,

    /// Expected monthly household contribution toward the benchmark plan
    pub expected_monthly_contribution: f64,

    /// Monthly subsidy (never negative)
    pub monthly_subsidy: f64,

    /// Annual subsidy
    pub annual_subsidy: f64,

    /// Benchmark plan monthly premium the subsidy is measured against
    pub benchmark_premium_monthly: f64,
}

impl SubsidyFigures {
    /// Compute subsidy figures for a MAGI level
    pub fn compute(
        magi: f64,
        household_size: usize,
        benchmark_premium_monthly: f64,
        fpl: &FplTable,
        schedule: &ContributionSchedule,
    ) -> Self {
        let fpl_percent = fpl.percent_of_fpl(magi, household_size);
        let contribution_percent = schedule.applicable_percentage(fpl_percent);
        let expected_monthly_contribution = magi * contribution_percent / 12.0;
        let monthly_subsidy =
            (benchmark_premium_monthly - expected_monthly_contribution).max(0.0);

        Self {
            fpl_percent,
            contribution_percent,
            expected_monthly_contribution,
            monthly_subsidy,
            annual_subsidy: monthly_subsidy * 12.0,
            benchmark_premium_monthly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_schedule_bracket_endpoints() {
        let schedule = ContributionSchedule::default();
        assert_eq!(schedule.applicable_percentage(100.0), 0.0);
        assert_eq!(schedule.applicable_percentage(150.0), 0.0);
        assert_relative_eq!(schedule.applicable_percentage(200.0), 0.02);
        assert_relative_eq!(schedule.applicable_percentage(250.0), 0.04);
        assert_relative_eq!(schedule.applicable_percentage(300.0), 0.06);
        assert_relative_eq!(schedule.applicable_percentage(400.0), 0.085);
    }

    #[test]
    fn test_schedule_interpolates_within_brackets() {
        let schedule = ContributionSchedule::default();
        assert_relative_eq!(schedule.applicable_percentage(175.0), 0.01);
        assert_relative_eq!(schedule.applicable_percentage(225.0), 0.03);
        assert_relative_eq!(schedule.applicable_percentage(350.0), 0.0725);
    }

    #[test]
    fn test_schedule_flat_above_400() {
        let schedule = ContributionSchedule::default();
        assert_relative_eq!(schedule.applicable_percentage(450.0), 0.085);
        assert_relative_eq!(schedule.applicable_percentage(600.0), 0.085);
    }

    #[test]
    fn test_schedule_zero_below_100() {
        let schedule = ContributionSchedule::default();
        assert_eq!(schedule.applicable_percentage(80.0), 0.0);
    }

    #[test]
    fn test_subsidy_at_200_percent() {
        let fpl = FplTable::default_2024_coverage_year();
        let schedule = ContributionSchedule::default();

        // Household of 2 at exactly 2x FPL
        let figures = SubsidyFigures::compute(39_440.0, 2, 600.0, &fpl, &schedule);
        assert_relative_eq!(figures.fpl_percent, 200.0);
        assert_relative_eq!(figures.contribution_percent, 0.02);
        // Contribution 39,440 * 2% / 12 = 65.73/month
        assert_relative_eq!(figures.expected_monthly_contribution, 65.733333333, epsilon = 1e-6);
        assert_relative_eq!(figures.monthly_subsidy, 600.0 - 65.733333333, epsilon = 1e-6);
        assert_relative_eq!(figures.annual_subsidy, figures.monthly_subsidy * 12.0);
    }

    #[test]
    fn test_subsidy_floors_at_zero() {
        let fpl = FplTable::default_2024_coverage_year();
        let schedule = ContributionSchedule::default();

        // High income, cheap benchmark: contribution exceeds the premium
        let figures = SubsidyFigures::compute(200_000.0, 2, 300.0, &fpl, &schedule);
        assert_eq!(figures.monthly_subsidy, 0.0);
        assert_eq!(figures.annual_subsidy, 0.0);
    }

    #[test]
    fn test_subsidy_monotone_non_increasing_in_magi() {
        let fpl = FplTable::default_2024_coverage_year();
        let schedule = ContributionSchedule::default();

        let mut prev = f64::INFINITY;
        let mut magi = 15_000.0;
        while magi <= 120_000.0 {
            let figures = SubsidyFigures::compute(magi, 2, 700.0, &fpl, &schedule);
            assert!(
                figures.monthly_subsidy <= prev + 1e-9,
                "subsidy increased at MAGI {}",
                magi
            );
            prev = figures.monthly_subsidy;
            magi += 500.0;
        }
    }
}
