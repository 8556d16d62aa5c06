//! Load household batch input from CSV
//!
//! List-valued columns (ages, tobacco flags, states) use `|`-separated
//! entries so one CSV row describes one household.

use std::error::Error;
use std::path::Path;

use csv::Reader;

use super::{BudgetLevel, Household, Person, Residence};

/// Raw CSV row matching the household batch format
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "HouseholdId")]
    _household_id: u32,
    #[serde(rename = "MemberAges")]
    member_ages: String,
    #[serde(rename = "TobaccoFlags", default)]
    tobacco_flags: String,
    #[serde(rename = "ChronicConditions", default)]
    chronic_conditions: String,
    #[serde(rename = "States")]
    states: String,
    #[serde(rename = "MonthsPerYear")]
    months_per_year: String,
    #[serde(rename = "MedicareEligible")]
    medicare_eligible: String,
    #[serde(rename = "Budget")]
    budget: String,
    #[serde(rename = "AnnualIncome")]
    annual_income: f64,
    #[serde(rename = "ExistingCoverage", default)]
    existing_coverage: String,
}

fn parse_flag(value: &str) -> Result<bool, Box<dyn Error>> {
    match value.trim() {
        "Y" | "y" | "1" | "true" => Ok(true),
        "N" | "n" | "0" | "false" | "" => Ok(false),
        other => Err(format!("Unknown flag value: {}", other).into()),
    }
}

impl CsvRow {
    fn to_household(self) -> Result<Household, Box<dyn Error>> {
        let ages: Vec<f64> = self
            .member_ages
            .split('|')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<f64>())
            .collect::<Result<_, _>>()?;

        let tobacco: Vec<bool> = if self.tobacco_flags.trim().is_empty() {
            vec![false; ages.len()]
        } else {
            self.tobacco_flags
                .split('|')
                .map(parse_flag)
                .collect::<Result<_, _>>()?
        };
        if tobacco.len() != ages.len() {
            return Err(format!(
                "TobaccoFlags count {} does not match MemberAges count {}",
                tobacco.len(),
                ages.len()
            )
            .into());
        }

        // Chronic conditions per member: ";"-separated within a member,
        // "|"-separated across members. Empty column means none anywhere.
        let chronic: Vec<Vec<String>> = if self.chronic_conditions.trim().is_empty() {
            vec![Vec::new(); ages.len()]
        } else {
            let per_member: Vec<Vec<String>> = self
                .chronic_conditions
                .split('|')
                .map(|entry| {
                    entry
                        .split(';')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .collect();
            if per_member.len() != ages.len() {
                return Err(format!(
                    "ChronicConditions count {} does not match MemberAges count {}",
                    per_member.len(),
                    ages.len()
                )
                .into());
            }
            per_member
        };

        let members = ages
            .iter()
            .zip(tobacco)
            .zip(chronic)
            .map(|((&age, tobacco_use), conditions)| {
                Person::new(age)
                    .with_tobacco(tobacco_use)
                    .with_chronic_conditions(conditions)
            })
            .collect();

        let states: Vec<&str> = self
            .states
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let months: Vec<f64> = self
            .months_per_year
            .split('|')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<f64>())
            .collect::<Result<_, _>>()?;
        if states.len() != months.len() {
            return Err(format!(
                "States count {} does not match MonthsPerYear count {}",
                states.len(),
                months.len()
            )
            .into());
        }
        let residences = states
            .iter()
            .zip(months)
            .map(|(state, m)| Residence::new(state, m))
            .collect();

        let budget = match self.budget.trim() {
            "low" => BudgetLevel::Low,
            "moderate" => BudgetLevel::Moderate,
            "flexible" => BudgetLevel::Flexible,
            other => return Err(format!("Unknown Budget: {}", other).into()),
        };

        Ok(Household {
            members,
            residences,
            medicare_eligible: parse_flag(&self.medicare_eligible)?,
            budget,
            annual_income: self.annual_income,
            has_existing_coverage: parse_flag(&self.existing_coverage)?,
        })
    }
}

/// Load all households from a CSV file
pub fn load_households<P: AsRef<Path>>(path: P) -> Result<Vec<Household>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut households = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        households.push(row.to_household()?);
    }

    Ok(households)
}

/// Load households from any reader (e.g., string buffer)
pub fn load_households_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<Vec<Household>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut households = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        households.push(row.to_household()?);
    }

    Ok(households)
}
