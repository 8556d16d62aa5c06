//! CSV-based reference table loader
//!
//! Loads year-versioned tables from CSV files in a configuration directory,
//! so historical table sets can live side by side (e.g. `data/tables/2024`).

use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::path::Path;

use crate::curves::Category;

/// Default path to the reference table directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

/// Load category base costs from CSV
/// Columns: category, monthly_cost
pub fn load_category_costs(path: &Path) -> Result<Vec<(Category, f64)>, Box<dyn Error>> {
    let file = File::open(path.join("category_costs.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut costs = Vec::new();
    for result in reader.records() {
        let record = result?;
        let category = Category::parse(&record[0])?;
        let cost: f64 = record[1].parse()?;
        costs.push((category, cost));
    }

    Ok(costs)
}

/// Load per-state cost multipliers from CSV
/// Columns: state, factor
pub fn load_state_factors(path: &Path) -> Result<Vec<(String, f64)>, Box<dyn Error>> {
    let file = File::open(path.join("state_factors.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut factors = Vec::new();
    for result in reader.records() {
        let record = result?;
        let state = record[0].to_string();
        let factor: f64 = record[1].parse()?;
        factors.push((state, factor));
    }

    Ok(factors)
}

/// Load federal poverty guidelines from CSV
/// Columns: household_size, annual_income
pub fn load_fpl_rows(path: &Path) -> Result<Vec<(usize, f64)>, Box<dyn Error>> {
    let file = File::open(path.join("fpl.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let size: usize = record[0].parse()?;
        let amount: f64 = record[1].parse()?;
        rows.push((size, amount));
    }

    Ok(rows)
}

/// Load contribution limits from CSV
/// Columns: limit_name, amount (e.g. "hsa_individual,4150")
pub fn load_contribution_limits(path: &Path) -> Result<HashMap<String, f64>, Box<dyn Error>> {
    let file = File::open(path.join("contribution_limits.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut limits = HashMap::new();
    for result in reader.records() {
        let record = result?;
        let name = record[0].to_string();
        let amount: f64 = record[1].parse()?;
        limits.insert(name, amount);
    }

    Ok(limits)
}

/// Load Medicaid expansion state codes from CSV
/// Columns: state
pub fn load_expansion_states(path: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let file = File::open(path.join("medicaid_expansion_states.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut states = Vec::new();
    for result in reader.records() {
        let record = result?;
        states.push(record[0].to_string());
    }

    Ok(states)
}

/// All reference tables loaded from one directory
pub struct LoadedTables {
    pub category_costs: Vec<(Category, f64)>,
    pub state_factors: Vec<(String, f64)>,
    pub fpl_rows: Vec<(usize, f64)>,
    pub contribution_limits: HashMap<String, f64>,
    pub expansion_states: Vec<String>,
}

impl LoadedTables {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(DEFAULT_TABLES_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            category_costs: load_category_costs(path)?,
            state_factors: load_state_factors(path)?,
            fpl_rows: load_fpl_rows(path)?,
            contribution_limits: load_contribution_limits(path)?,
            expansion_states: load_expansion_states(path)?,
        })
    }
}
