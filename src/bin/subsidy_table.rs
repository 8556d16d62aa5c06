//! Generate the subsidy breakpoint grid across household sizes
//!
//! Writes a reference CSV used to sanity-check subsidy figures against
//! published calculators when table years change.

use std::fs::File;
use std::io::Write;

use coverage_engine::magi::{ContributionSchedule, SubsidyFigures, BREAKPOINT_LEVELS};
use coverage_engine::tables::FplTable;

fn main() {
    env_logger::init();

    let benchmark: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(650.0);

    let fpl = FplTable::default_2024_coverage_year();
    let schedule = ContributionSchedule::default();

    let output_path = "subsidy_breakpoints.csv";
    let mut file = File::create(output_path).expect("Failed to create output file");

    writeln!(
        file,
        "HouseholdSize,FplPercent,Income,ContributionPercent,MonthlyContribution,MonthlySubsidy,AnnualSubsidy"
    )
    .unwrap();

    for size in 1..=6usize {
        for &level in &BREAKPOINT_LEVELS {
            let income = fpl.income_at_percent(level, size);
            let figures = SubsidyFigures::compute(income, size, benchmark, &fpl, &schedule);

            writeln!(
                file,
                "{},{:.0},{:.2},{:.4},{:.2},{:.2},{:.2}",
                size,
                level,
                income,
                figures.contribution_percent,
                figures.expected_monthly_contribution,
                figures.monthly_subsidy,
                figures.annual_subsidy,
            )
            .unwrap();
        }
    }

    println!(
        "Breakpoint grid for benchmark ${:.2}/month written to {}",
        benchmark, output_path
    );
}
