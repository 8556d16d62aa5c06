//! Year-versioned reference tables
//!
//! Federal poverty guidelines, contribution limits, and the Medicaid
//! expansion state set. These are configuration data passed into the engine,
//! never module-level mutable state, so historical years can be swapped in
//! for comparisons and testing.

pub mod loader;

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::path::Path;

use crate::pricing::{CategoryCosts, StateFactors};

/// Federal poverty level by household size
#[derive(Debug, Clone)]
pub struct FplTable {
    /// Annual FPL income by household size (index 0 = size 1)
    base_amounts: Vec<f64>,

    /// Increment per person beyond the largest tabulated size
    additional_person: f64,
}

impl FplTable {
    /// Guidelines in force for the 2024 coverage year
    ///
    /// These are the 2023 guideline values: subsidy determinations for a
    /// coverage year use the guidelines published the prior January.
    pub fn default_2024_coverage_year() -> Self {
        Self {
            base_amounts: vec![
                14_580.0, // 1
                19_720.0, // 2
                24_860.0, // 3
                30_000.0, // 4
                35_140.0, // 5
                40_280.0, // 6
                45_420.0, // 7
                50_560.0, // 8
            ],
            additional_person: 5_140.0,
        }
    }

    /// Create from loaded CSV rows (size, amount), sorted by size
    pub fn from_loaded(rows: &[(usize, f64)]) -> Self {
        let mut sorted: Vec<_> = rows.to_vec();
        sorted.sort_by_key(|&(size, _)| size);
        let base_amounts: Vec<f64> = sorted.iter().map(|&(_, amount)| amount).collect();

        // Per-additional-person increment from the last tabulated step
        let additional_person = if base_amounts.len() >= 2 {
            base_amounts[base_amounts.len() - 1] - base_amounts[base_amounts.len() - 2]
        } else {
            5_140.0
        };

        Self {
            base_amounts,
            additional_person,
        }
    }

    /// Annual FPL income for a household size
    ///
    /// Size 0 is normalized to 1; sizes beyond the table extend by the
    /// fixed per-additional-person increment.
    pub fn annual_income(&self, household_size: usize) -> f64 {
        let size = household_size.max(1);
        if size <= self.base_amounts.len() {
            self.base_amounts[size - 1]
        } else {
            let last = *self.base_amounts.last().unwrap_or(&0.0);
            last + self.additional_person * (size - self.base_amounts.len()) as f64
        }
    }

    /// MAGI expressed as a percentage of FPL (e.g. 200.0 for 2x FPL)
    pub fn percent_of_fpl(&self, magi: f64, household_size: usize) -> f64 {
        magi / self.annual_income(household_size) * 100.0
    }

    /// Income corresponding to a given FPL percentage
    pub fn income_at_percent(&self, fpl_percent: f64, household_size: usize) -> f64 {
        self.annual_income(household_size) * fpl_percent / 100.0
    }
}

/// Tax-advantaged contribution limits for one plan year
#[derive(Debug, Clone)]
pub struct ContributionLimits {
    /// HSA base limit, self-only HDHP coverage
    pub hsa_individual: f64,
    /// HSA base limit, family HDHP coverage
    pub hsa_family: f64,
    /// HSA catch-up addition at `hsa_catch_up_age` and older
    pub hsa_catch_up: f64,
    /// Age at which the HSA catch-up applies
    pub hsa_catch_up_age: u8,

    /// 401(k) elective deferral limit
    pub retirement_401k: f64,
    /// 401(k) catch-up addition at `retirement_catch_up_age` and older
    pub retirement_401k_catch_up: f64,

    /// Traditional IRA contribution limit
    pub ira: f64,
    /// IRA catch-up addition at `retirement_catch_up_age` and older
    pub ira_catch_up: f64,

    /// Age at which retirement-account catch-ups apply
    pub retirement_catch_up_age: u8,
}

impl ContributionLimits {
    /// 2024 limits
    pub fn default_2024() -> Self {
        Self {
            hsa_individual: 4_150.0,
            hsa_family: 8_300.0,
            hsa_catch_up: 1_000.0,
            hsa_catch_up_age: 55,
            retirement_401k: 23_000.0,
            retirement_401k_catch_up: 7_500.0,
            ira: 7_000.0,
            ira_catch_up: 1_000.0,
            retirement_catch_up_age: 50,
        }
    }

    /// Build from loaded CSV key/value rows, defaults for absent keys
    pub fn from_loaded(values: &HashMap<String, f64>) -> Self {
        let defaults = Self::default_2024();
        let get = |key: &str, fallback: f64| values.get(key).copied().unwrap_or(fallback);
        Self {
            hsa_individual: get("hsa_individual", defaults.hsa_individual),
            hsa_family: get("hsa_family", defaults.hsa_family),
            hsa_catch_up: get("hsa_catch_up", defaults.hsa_catch_up),
            hsa_catch_up_age: get("hsa_catch_up_age", defaults.hsa_catch_up_age as f64) as u8,
            retirement_401k: get("retirement_401k", defaults.retirement_401k),
            retirement_401k_catch_up: get(
                "retirement_401k_catch_up",
                defaults.retirement_401k_catch_up,
            ),
            ira: get("ira", defaults.ira),
            ira_catch_up: get("ira_catch_up", defaults.ira_catch_up),
            retirement_catch_up_age: get(
                "retirement_catch_up_age",
                defaults.retirement_catch_up_age as f64,
            ) as u8,
        }
    }

    /// 401(k) limit including catch-up where the age qualifies
    pub fn limit_401k(&self, age: u8) -> f64 {
        if age >= self.retirement_catch_up_age {
            self.retirement_401k + self.retirement_401k_catch_up
        } else {
            self.retirement_401k
        }
    }

    /// IRA limit including catch-up where the age qualifies
    pub fn limit_ira(&self, age: u8) -> f64 {
        if age >= self.retirement_catch_up_age {
            self.ira + self.ira_catch_up
        } else {
            self.ira
        }
    }
}

/// States that adopted Medicaid expansion
#[derive(Debug, Clone)]
pub struct ExpansionStates {
    states: HashSet<String>,
}

impl ExpansionStates {
    /// Expansion status as of the 2024 coverage year
    pub fn default_2024() -> Self {
        // Non-expansion as of 2024: AL, FL, GA, KS, MS, SC, TN, TX, WI, WY
        let states = [
            "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "HI", "ID", "IL", "IN", "IA", "KY",
            "LA", "ME", "MD", "MA", "MI", "MN", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
            "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SD", "UT", "VT", "VA", "WA", "WV",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        Self { states }
    }

    /// Create from loaded CSV rows
    pub fn from_loaded(codes: &[String]) -> Self {
        Self {
            states: codes.iter().cloned().collect(),
        }
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains(state)
    }
}

/// Container for all reference tables one analysis run consumes
#[derive(Debug, Clone)]
pub struct EngineTables {
    pub costs: CategoryCosts,
    pub state_factors: StateFactors,
    pub fpl: FplTable,
    pub limits: ContributionLimits,
    pub expansion: ExpansionStates,
}

impl EngineTables {
    /// In-memory defaults for the 2024 coverage year
    pub fn default_2024() -> Self {
        Self {
            costs: CategoryCosts::default_2024(),
            state_factors: StateFactors::default_2024(),
            fpl: FplTable::default_2024_coverage_year(),
            limits: ContributionLimits::default_2024(),
            expansion: ExpansionStates::default_2024(),
        }
    }

    /// Load tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let loaded = loader::LoadedTables::load_from(path)?;

        Ok(Self {
            costs: CategoryCosts::from_loaded(&loaded.category_costs),
            state_factors: StateFactors::from_loaded(&loaded.state_factors),
            fpl: FplTable::from_loaded(&loaded.fpl_rows),
            limits: ContributionLimits::from_loaded(&loaded.contribution_limits),
            expansion: ExpansionStates::from_loaded(&loaded.expansion_states),
        })
    }
}
