//! Household data structures consumed by the analysis engines
//!
//! All records here are value objects: constructed from validated input,
//! consumed by pure functions, discarded after the caller reads results.
//! Bounds enforcement (member counts, residence counts, ZIP/state
//! consistency) is the external validator's contract; the engine only
//! normalizes ages defensively.

use serde::{Deserialize, Serialize};

use crate::curves::{clamp_age, Category};

/// A single household member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Age in whole years, clamped to [0, 120]
    pub age: u8,

    /// Tobacco use flag
    #[serde(default)]
    pub tobacco_use: bool,

    /// Diagnosed chronic conditions (free-form codes, e.g. "diabetes")
    #[serde(default)]
    pub chronic_conditions: Vec<String>,
}

impl Person {
    /// Create a person; fractional ages round to the nearest year and the
    /// result is clamped into [0, 120]
    pub fn new(age_years: f64) -> Self {
        Self {
            age: clamp_age(age_years),
            tobacco_use: false,
            chronic_conditions: Vec::new(),
        }
    }

    pub fn with_tobacco(mut self, tobacco_use: bool) -> Self {
        self.tobacco_use = tobacco_use;
        self
    }

    pub fn with_chronic_conditions(mut self, conditions: Vec<String>) -> Self {
        self.chronic_conditions = conditions;
        self
    }

    pub fn has_chronic_conditions(&self) -> bool {
        !self.chronic_conditions.is_empty()
    }

    pub fn is_adult(&self) -> bool {
        self.age >= 18
    }
}

/// A residence with its share of the year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Residence {
    /// Two-letter state code
    pub state: String,

    /// Months per year spent at this residence (total across residences <= 12)
    pub months_per_year: f64,
}

impl Residence {
    pub fn new(state: &str, months_per_year: f64) -> Self {
        Self {
            state: state.to_string(),
            months_per_year,
        }
    }
}

/// Household budget posture for supplemental coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    /// Tight budget: de-prioritize the more expensive categories
    Low,
    Moderate,
    Flexible,
}

impl BudgetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Low => "low",
            BudgetLevel::Moderate => "moderate",
            BudgetLevel::Flexible => "flexible",
        }
    }
}

/// Display-only age grouping
///
/// Used for labels and result grouping, never for scoring: scoring is
/// continuous in age via the curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Children,
    YoungAdults,
    MidCareer,
    PreRetirement,
    Seniors65To74,
    Seniors75Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 6] = [
        AgeGroup::Children,
        AgeGroup::YoungAdults,
        AgeGroup::MidCareer,
        AgeGroup::PreRetirement,
        AgeGroup::Seniors65To74,
        AgeGroup::Seniors75Plus,
    ];

    /// Bucket an age for display
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=17 => AgeGroup::Children,
            18..=30 => AgeGroup::YoungAdults,
            31..=49 => AgeGroup::MidCareer,
            50..=64 => AgeGroup::PreRetirement,
            65..=74 => AgeGroup::Seniors65To74,
            _ => AgeGroup::Seniors75Plus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Children => "Children (0-17)",
            AgeGroup::YoungAdults => "Young Adults (18-30)",
            AgeGroup::MidCareer => "Mid-Career (31-49)",
            AgeGroup::PreRetirement => "Pre-Retirement (50-64)",
            AgeGroup::Seniors65To74 => "Seniors (65-74)",
            AgeGroup::Seniors75Plus => "Seniors (75+)",
        }
    }
}

/// A household submitted for analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    /// Members, adults and children in any order
    pub members: Vec<Person>,

    /// Residences with month weights
    pub residences: Vec<Residence>,

    /// Whether any member is Medicare-eligible
    #[serde(default)]
    pub medicare_eligible: bool,

    /// Budget posture
    pub budget: BudgetLevel,

    /// Estimated annual household income (MAGI basis)
    pub annual_income: f64,

    /// Whether the household already carries supplemental coverage
    #[serde(default)]
    pub has_existing_coverage: bool,
}

impl Household {
    pub fn new(members: Vec<Person>, residences: Vec<Residence>) -> Self {
        Self {
            members,
            residences,
            medicare_eligible: false,
            budget: BudgetLevel::Moderate,
            annual_income: 0.0,
            has_existing_coverage: false,
        }
    }

    pub fn with_medicare_eligible(mut self, eligible: bool) -> Self {
        self.medicare_eligible = eligible;
        self
    }

    pub fn with_budget(mut self, budget: BudgetLevel) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_annual_income(mut self, income: f64) -> Self {
        self.annual_income = income;
        self
    }

    pub fn with_existing_coverage(mut self, existing: bool) -> Self {
        self.has_existing_coverage = existing;
        self
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the household splits the year across more than one residence
    pub fn is_multi_residence(&self) -> bool {
        self.residences.len() > 1
    }

    /// Oldest adult age, if any adult is present
    pub fn oldest_adult_age(&self) -> Option<u8> {
        self.members
            .iter()
            .filter(|m| m.is_adult())
            .map(|m| m.age)
            .max()
    }

    /// Member counts per display age group, zero-count groups omitted,
    /// in fixed display order
    pub fn age_groups(&self) -> Vec<(AgeGroup, usize)> {
        AgeGroup::ALL
            .iter()
            .filter_map(|&group| {
                let count = self
                    .members
                    .iter()
                    .filter(|m| AgeGroup::from_age(m.age) == group)
                    .count();
                (count > 0).then_some((group, count))
            })
            .collect()
    }
}

/// Primary plan context record
///
/// Supplied by the surrounding application; the engine only reads the
/// premium, it never re-derives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimaryPlanContext {
    /// Monthly premium of the household's primary medical plan
    pub monthly_premium: f64,
}

impl PrimaryPlanContext {
    pub fn new(monthly_premium: f64) -> Self {
        Self { monthly_premium }
    }
}

/// Recommendation run preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Categories removed before scoring (not filtered after)
    #[serde(default)]
    pub exclude_categories: Vec<Category>,

    /// Include below-threshold recommendations in the output
    #[serde(default)]
    pub show_all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_age_normalization() {
        assert_eq!(Person::new(-4.0).age, 0);
        assert_eq!(Person::new(34.4).age, 34);
        assert_eq!(Person::new(34.6).age, 35);
        assert_eq!(Person::new(130.0).age, 120);
    }

    #[test]
    fn test_age_group_boundaries() {
        assert_eq!(AgeGroup::from_age(0), AgeGroup::Children);
        assert_eq!(AgeGroup::from_age(17), AgeGroup::Children);
        assert_eq!(AgeGroup::from_age(18), AgeGroup::YoungAdults);
        assert_eq!(AgeGroup::from_age(30), AgeGroup::YoungAdults);
        assert_eq!(AgeGroup::from_age(31), AgeGroup::MidCareer);
        assert_eq!(AgeGroup::from_age(50), AgeGroup::PreRetirement);
        assert_eq!(AgeGroup::from_age(65), AgeGroup::Seniors65To74);
        assert_eq!(AgeGroup::from_age(75), AgeGroup::Seniors75Plus);
        assert_eq!(AgeGroup::from_age(120), AgeGroup::Seniors75Plus);
    }

    #[test]
    fn test_household_age_groups() {
        let household = Household::new(
            vec![Person::new(34.0), Person::new(32.0), Person::new(4.0)],
            vec![Residence::new("TX", 12.0)],
        );

        let groups = household.age_groups();
        assert_eq!(
            groups,
            vec![(AgeGroup::Children, 1), (AgeGroup::MidCareer, 2)]
        );
    }

    #[test]
    fn test_oldest_adult_age() {
        let household = Household::new(
            vec![Person::new(58.0), Person::new(61.0), Person::new(16.0)],
            vec![],
        );
        assert_eq!(household.oldest_adult_age(), Some(61));

        let children_only = Household::new(vec![Person::new(10.0)], vec![]);
        assert_eq!(children_only.oldest_adult_age(), None);
    }

    #[test]
    fn test_multi_residence() {
        let mut household = Household::new(
            vec![Person::new(70.0)],
            vec![Residence::new("FL", 7.0), Residence::new("MI", 5.0)],
        );
        assert!(household.is_multi_residence());

        household.residences.pop();
        assert!(!household.is_multi_residence());
    }
}
