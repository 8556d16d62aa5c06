//! Run the recommendation and MAGI analyses for an entire household block
//!
//! Reads a household batch CSV, analyzes every household in parallel, and
//! writes per-category aggregates for comparison across table years.

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use rayon::prelude::*;

use coverage_engine::curves::Category;
use coverage_engine::household::load_households;
use coverage_engine::magi::{MagiInput, MagiTier, StrategyContext};
use coverage_engine::recommend::Priority;
use coverage_engine::{AnalysisRunner, Preferences, PrimaryPlanContext};

/// Aggregated results across all households
#[derive(Debug, Clone, Default)]
struct CategoryAggregate {
    recommended: usize,
    high_priority: usize,
    total_monthly_cost: f64,
    score_sum: f64,
}

fn main() {
    env_logger::init();

    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "households.csv".to_string());

    let start = Instant::now();
    println!("Loading households from {}...", input_path);

    let households = load_households(&input_path).expect("Failed to load households");
    println!("Loaded {} households in {:?}", households.len(), start.elapsed());

    let runner = AnalysisRunner::new();
    let plan = PrimaryPlanContext::new(500.0);
    let preferences = Preferences::default();

    println!("Running analyses...");
    let analysis_start = Instant::now();

    // Analyses are independent per household, so the block parallelizes
    // trivially
    let results: Vec<_> = households
        .par_iter()
        .map(|household| {
            let set = runner
                .run_recommendations(household, &plan, &preferences)
                .expect("recommendation run failed");

            let magi_input = MagiInput {
                household_size: household.size(),
                magi: household.annual_income,
                state: household
                    .residences
                    .first()
                    .map(|r| r.state.clone())
                    .unwrap_or_default(),
                benchmark_premium_monthly: 650.0,
                strategy: StrategyContext {
                    oldest_adult_age: household.oldest_adult_age().unwrap_or(40),
                    has_employer_plan: true,
                    ..Default::default()
                },
            };
            let magi = runner.run_magi(&magi_input);

            (set, magi.tier)
        })
        .collect();

    println!("Analyses complete in {:?}", analysis_start.elapsed());

    // Aggregate by category
    let mut aggregates: Vec<(Category, CategoryAggregate)> = Category::ALL
        .iter()
        .map(|&c| (c, CategoryAggregate::default()))
        .collect();
    let mut tier_counts = [0usize; 4];

    for (set, tier) in &results {
        for rec in &set.recommendations {
            let entry = aggregates
                .iter_mut()
                .find(|(c, _)| *c == rec.category)
                .map(|(_, agg)| agg)
                .expect("closed category set");
            entry.recommended += 1;
            if rec.priority == Priority::High {
                entry.high_priority += 1;
            }
            entry.total_monthly_cost += rec.household_cost_per_month;
            entry.score_sum += rec.probability_score;
        }

        let tier_idx = match tier {
            MagiTier::Medicaid => 0,
            MagiTier::Subsidy => 1,
            MagiTier::Cliff => 2,
            MagiTier::AboveCliff => 3,
        };
        tier_counts[tier_idx] += 1;
    }

    // Write output
    let output_path = "block_analysis_output.csv";
    let mut file = File::create(output_path).expect("Failed to create output file");

    writeln!(
        file,
        "Category,Recommended,HighPriority,TotalMonthlyCost,AvgScore"
    )
    .unwrap();
    for (category, agg) in &aggregates {
        let avg_score = if agg.recommended > 0 {
            agg.score_sum / agg.recommended as f64
        } else {
            0.0
        };
        writeln!(
            file,
            "{},{},{},{:.2},{:.2}",
            category.as_str(),
            agg.recommended,
            agg.high_priority,
            agg.total_monthly_cost,
            avg_score,
        )
        .unwrap();
    }

    println!("Output written to {}", output_path);

    println!("\nBlock Summary:");
    println!("  Households analyzed: {}", results.len());
    println!(
        "  MAGI tiers: medicaid={}, subsidy={}, cliff={}, above_cliff={}",
        tier_counts[0], tier_counts[1], tier_counts[2], tier_counts[3]
    );
    for (category, agg) in &aggregates {
        if agg.recommended > 0 {
            println!(
                "  {:<20} recommended for {:>5} households (${:.0}/month total)",
                category.display_name(),
                agg.recommended,
                agg.total_monthly_cost
            );
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
}
