//! Coverage Engine CLI
//!
//! Builds a household from command-line arguments, runs the full analysis,
//! and prints the recommendation, subsidy, and HSA results.

use std::fs::File;
use std::io::Write;

use anyhow::{bail, Context};
use clap::Parser;

use coverage_engine::household::BudgetLevel;
use coverage_engine::hsa::{CoverageType, HsaInput};
use coverage_engine::magi::{MagiInput, StrategyContext};
use coverage_engine::{
    AnalysisRunner, Household, Person, Preferences, PrimaryPlanContext, Residence,
};

#[derive(Parser, Debug)]
#[command(name = "coverage_engine", about = "Household supplemental coverage analysis")]
struct Args {
    /// Member ages, comma separated (e.g. "38,36,6")
    #[arg(long, default_value = "38,36,6")]
    ages: String,

    /// Residence state code
    #[arg(long, default_value = "TX")]
    state: String,

    /// Estimated annual MAGI
    #[arg(long, default_value_t = 85_000.0)]
    income: f64,

    /// Benchmark plan monthly premium
    #[arg(long, default_value_t = 650.0)]
    benchmark: f64,

    /// Primary plan monthly premium
    #[arg(long, default_value_t = 450.0)]
    premium: f64,

    /// Budget posture: low, moderate, flexible
    #[arg(long, default_value = "moderate")]
    budget: String,

    /// Household includes a Medicare-eligible member
    #[arg(long)]
    medicare: bool,

    /// Enrolled in an HSA-qualified high-deductible plan
    #[arg(long)]
    hdhp: bool,

    /// Expected annual medical expenses
    #[arg(long, default_value_t = 2_000.0)]
    expenses: f64,

    /// Include below-threshold recommendations
    #[arg(long)]
    show_all: bool,

    /// Emit the full analysis as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Write the recommendation rows to a CSV file
    #[arg(long)]
    output: Option<String>,

    /// Load reference tables from a CSV directory
    #[arg(long)]
    tables: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let ages: Vec<f64> = args
        .ages
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .context("failed to parse --ages")?;
    if ages.is_empty() {
        bail!("--ages must list at least one member");
    }

    let budget = match args.budget.as_str() {
        "low" => BudgetLevel::Low,
        "moderate" => BudgetLevel::Moderate,
        "flexible" => BudgetLevel::Flexible,
        other => bail!("unknown budget level: {}", other),
    };

    let household = Household::new(
        ages.iter().map(|&a| Person::new(a)).collect(),
        vec![Residence::new(&args.state, 12.0)],
    )
    .with_medicare_eligible(args.medicare)
    .with_budget(budget)
    .with_annual_income(args.income);

    let runner = match &args.tables {
        Some(dir) => AnalysisRunner::from_csv_path(std::path::Path::new(dir))
            .map_err(|e| anyhow::anyhow!("failed to load tables from {}: {}", dir, e))?,
        None => AnalysisRunner::new(),
    };

    let plan = PrimaryPlanContext::new(args.premium);
    let preferences = Preferences {
        show_all: args.show_all,
        ..Default::default()
    };

    let oldest_adult = household.oldest_adult_age().unwrap_or(40);
    let family_coverage = household.size() > 1;

    let magi_input = MagiInput {
        household_size: household.size(),
        magi: args.income,
        state: args.state.clone(),
        benchmark_premium_monthly: args.benchmark,
        strategy: StrategyContext {
            oldest_adult_age: oldest_adult,
            has_employer_plan: true,
            hdhp_enrolled: args.hdhp,
            hsa_family_coverage: family_coverage,
            ..Default::default()
        },
    };

    let hsa_input = HsaInput {
        coverage: if family_coverage {
            CoverageType::Family
        } else {
            CoverageType::Individual
        },
        age: oldest_adult,
        employer_contribution: 0.0,
        current_balance: 0.0,
        expected_annual_expenses: args.expenses,
        annual_income: args.income,
        federal_tax_rate: 0.22,
        state_tax_rate: 0.05,
        expected_return: 0.05,
        healthcare_inflation: 0.055,
        projection_years: 10,
    };

    let analysis = runner
        .run_full(&household, &plan, &preferences, &magi_input, &hsa_input)
        .context("analysis failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Coverage Engine v0.1.0");
    println!("======================\n");

    println!("Household:");
    for (group, count) in household.age_groups() {
        println!("  {}: {}", group.label(), count);
    }
    println!("  State: {}  Income: ${:.0}  Budget: {}\n", args.state, args.income, budget.as_str());

    let set = &analysis.recommendations;
    println!("Recommendations ({}):", set.recommendations.len());
    println!(
        "{:<20} {:>8} {:>6} {:>10} {:>10} {:>12} {:>8}",
        "Category", "Priority", "Score", "Risk", "$/person", "$/household", "Members"
    );
    println!("{}", "-".repeat(80));
    for rec in &set.recommendations {
        println!(
            "{:<20} {:>8} {:>6.1} {:>10} {:>10.2} {:>12.2} {:>8}",
            rec.category.display_name(),
            rec.priority.as_str(),
            rec.probability_score,
            rec.risk_level.as_str(),
            rec.adjusted_cost_per_month,
            rec.household_cost_per_month,
            rec.applicable_members,
        );
    }
    println!(
        "\n  High priority total: ${:.2}/month",
        set.total_monthly_high_priority
    );
    println!(
        "  All recommended:     ${:.2}/month\n",
        set.total_monthly_all_recommended
    );

    let magi = &analysis.magi;
    println!("MAGI Analysis:");
    println!(
        "  Tier: {}  ({:.1}% FPL for household of {})",
        magi.tier.as_str(),
        magi.fpl_percent,
        magi_input.household_size
    );
    println!(
        "  Subsidy: ${:.2}/month (${:.2}/year) against a ${:.2} benchmark",
        magi.current.monthly_subsidy, magi.current.annual_subsidy, args.benchmark
    );

    println!("\n  Breakpoints:");
    println!(
        "  {:>6} {:>12} {:>8} {:>12} {:>12}",
        "FPL%", "Income", "Contr%", "Subsidy/mo", "Subsidy/yr"
    );
    for row in &magi.breakpoints {
        println!(
            "  {:>6.0} {:>12.0} {:>8.2} {:>12.2} {:>12.2}",
            row.fpl_percent,
            row.income,
            row.contribution_percent * 100.0,
            row.monthly_subsidy,
            row.annual_subsidy
        );
    }

    if let Some(target) = &magi.optimal_target {
        println!(
            "\n  Optimal target: ${:.0} ({:.0}% FPL), net benefit ${:.0}/year",
            target.target_magi, target.target_fpl_percent, target.net_benefit_annual
        );
    }

    for warning in &magi.warnings {
        println!("  ! {}", warning);
    }
    for recommendation in &magi.recommendations {
        println!("  * {}", recommendation);
    }

    println!("\n  Reduction strategies:");
    for strategy in &magi.strategies {
        if strategy.applicable {
            println!(
                "  [{}] {:<34} max ${:>9.0}  recommended ${:>9.0}",
                strategy.priority, strategy.name, strategy.max_reduction,
                strategy.recommended_reduction
            );
        } else {
            println!(
                "  [{}] {:<34} n/a ({})",
                strategy.priority,
                strategy.name,
                strategy.inapplicable_reason.as_deref().unwrap_or("")
            );
        }
    }

    let hsa = &analysis.hsa;
    println!("\nHSA Analysis ({} coverage):", hsa.limits.coverage.as_str());
    println!(
        "  Limit: ${:.0} (base ${:.0} + catch-up ${:.0}), employee headroom ${:.0}",
        hsa.limits.total_limit,
        hsa.limits.base_limit,
        hsa.limits.catch_up,
        hsa.limits.max_employee_contribution
    );
    println!(
        "  Recommended contribution: ${:.0}  (tax savings ${:.0}: fed ${:.0}, state ${:.0}, FICA ${:.0})",
        hsa.recommended_contribution,
        hsa.tax_savings.total,
        hsa.tax_savings.federal,
        hsa.tax_savings.state,
        hsa.tax_savings.fica
    );

    println!("\n  {:>4} {:>12} {:>12} {:>10} {:>10} {:>12}", "Year", "Begin", "Contrib", "Growth", "Expenses", "End");
    for row in &hsa.projection {
        println!(
            "  {:>4} {:>12.2} {:>12.2} {:>10.2} {:>10.2} {:>12.2}",
            row.year,
            row.beginning_balance,
            row.contribution,
            row.investment_growth,
            row.expenses_paid,
            row.ending_balance
        );
    }
    for recommendation in &hsa.recommendations {
        println!("  * {}", recommendation);
    }

    if let Some(path) = &args.output {
        let mut file = File::create(path).context("unable to create CSV file")?;
        writeln!(
            file,
            "InsuranceId,Category,Priority,Score,RiskLevel,AdjustedCostPerMonth,HouseholdCostPerMonth,ApplicableMembers,AgeGroup"
        )?;
        for rec in &set.recommendations {
            writeln!(
                file,
                "{},{},{},{:.2},{},{:.2},{:.2},{},{}",
                rec.insurance_id,
                rec.category.as_str(),
                rec.priority.as_str(),
                rec.probability_score,
                rec.risk_level.as_str(),
                rec.adjusted_cost_per_month,
                rec.household_cost_per_month,
                rec.applicable_members,
                rec.age_group,
            )?;
        }
        println!("\nRecommendations written to: {}", path);
    }

    Ok(())
}
