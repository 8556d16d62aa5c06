//! Cost and discount tables
//!
//! Base monthly costs per coverage category, per-state cost multipliers, and
//! the household bundle discount. State lookups fail fast on unknown codes;
//! a silent default multiplier would corrupt every downstream price.

use std::collections::HashMap;

use crate::curves::Category;
use crate::error::EngineError;
use crate::household::Residence;

/// Categories bundled together at or above this count earn the discount
pub const BUNDLE_MIN_CATEGORIES: usize = 3;

/// Multiplier applied uniformly to household costs when bundling
pub const BUNDLE_DISCOUNT: f64 = 0.95;

/// Bundle discount factor for a recommended-category count
///
/// Decided once across the whole recommendation set, never per category.
pub fn bundle_discount(recommended_count: usize) -> f64 {
    if recommended_count >= BUNDLE_MIN_CATEGORIES {
        BUNDLE_DISCOUNT
    } else {
        1.0
    }
}

/// Base monthly cost per coverage category (one covered person, 1.0x state)
#[derive(Debug, Clone)]
pub struct CategoryCosts {
    costs: HashMap<Category, f64>,
}

impl CategoryCosts {
    /// 2024 base rate card
    pub fn default_2024() -> Self {
        let mut costs = HashMap::new();
        costs.insert(Category::Dental, 35.0);
        costs.insert(Category::Vision, 15.0);
        costs.insert(Category::Accident, 25.0);
        costs.insert(Category::CriticalIllness, 40.0);
        costs.insert(Category::HospitalIndemnity, 30.0);
        costs.insert(Category::Disability, 45.0);
        costs.insert(Category::LongTermCare, 120.0);
        costs.insert(Category::Life, 50.0);
        Self { costs }
    }

    /// Build from loaded CSV rows, falling back to the default card for
    /// categories the file does not override
    pub fn from_loaded(rows: &[(Category, f64)]) -> Self {
        let mut table = Self::default_2024();
        for (category, cost) in rows {
            table.costs.insert(*category, *cost);
        }
        table
    }

    /// Base monthly cost for a category
    pub fn base_monthly_cost(&self, category: Category) -> f64 {
        // The default card covers the closed enum, so the lookup is total
        self.costs.get(&category).copied().unwrap_or(0.0)
    }
}

/// Per-state cost multipliers
#[derive(Debug, Clone)]
pub struct StateFactors {
    factors: HashMap<String, f64>,
}

impl StateFactors {
    /// 2024 state factor table (1.0 = national baseline)
    pub fn default_2024() -> Self {
        let mut factors = HashMap::new();
        for (code, factor) in [
            ("AL", 0.91), ("AK", 1.28), ("AZ", 0.97), ("AR", 0.90), ("CA", 1.18),
            ("CO", 1.04), ("CT", 1.15), ("DE", 1.05), ("DC", 1.12), ("FL", 1.08),
            ("GA", 0.98), ("HI", 1.10), ("ID", 0.93), ("IL", 1.02), ("IN", 0.95),
            ("IA", 0.92), ("KS", 0.94), ("KY", 0.96), ("LA", 1.01), ("ME", 1.03),
            ("MD", 1.07), ("MA", 1.16), ("MI", 0.99), ("MN", 1.01), ("MS", 0.89),
            ("MO", 0.94), ("MT", 0.98), ("NE", 0.93), ("NV", 1.03), ("NH", 1.06),
            ("NJ", 1.14), ("NM", 0.95), ("NY", 1.20), ("NC", 0.97), ("ND", 0.94),
            ("OH", 0.96), ("OK", 0.92), ("OR", 1.05), ("PA", 1.02), ("RI", 1.09),
            ("SC", 0.95), ("SD", 0.93), ("TN", 0.94), ("TX", 1.00), ("UT", 0.96),
            ("VT", 1.08), ("VA", 1.01), ("WA", 1.09), ("WV", 0.97), ("WI", 0.98),
            ("WY", 1.02),
        ] {
            factors.insert(code.to_string(), factor);
        }
        Self { factors }
    }

    /// Build from loaded CSV rows (replaces the default table entirely)
    pub fn from_loaded(rows: &[(String, f64)]) -> Self {
        let mut factors = HashMap::new();
        for (code, factor) in rows {
            factors.insert(code.clone(), *factor);
        }
        Self { factors }
    }

    /// Cost multiplier for a state code; unknown codes are a hard error
    pub fn multiplier(&self, state: &str) -> Result<f64, EngineError> {
        self.factors
            .get(state)
            .copied()
            .ok_or_else(|| EngineError::UnknownState(state.to_string()))
    }

    /// Month-weighted average multiplier across a household's residences
    ///
    /// Households with no residence on file price at the national baseline.
    pub fn weighted_multiplier(&self, residences: &[Residence]) -> Result<f64, EngineError> {
        let total_months: f64 = residences.iter().map(|r| r.months_per_year).sum();
        if residences.is_empty() || total_months <= 0.0 {
            return Ok(1.0);
        }

        let mut weighted = 0.0;
        for residence in residences {
            let factor = self.multiplier(&residence.state)?;
            weighted += factor * residence.months_per_year;
        }
        Ok(weighted / total_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_discount_boundary() {
        assert_eq!(bundle_discount(0), 1.0);
        assert_eq!(bundle_discount(2), 1.0);
        assert_eq!(bundle_discount(3), BUNDLE_DISCOUNT);
        assert_eq!(bundle_discount(8), BUNDLE_DISCOUNT);
    }

    #[test]
    fn test_bundle_discount_worked_example() {
        // Three categories at $50, $25, $100 bundle to $166/month
        let total = (50.0 + 25.0 + 100.0) * bundle_discount(3);
        assert_eq!(total.round(), 166.0);
    }

    #[test]
    fn test_unknown_state_fails_fast() {
        let factors = StateFactors::default_2024();
        let err = factors.multiplier("ZZ").unwrap_err();
        assert_eq!(err, EngineError::UnknownState("ZZ".to_string()));
    }

    #[test]
    fn test_weighted_multiplier() {
        let factors = StateFactors::default_2024();

        let single = vec![Residence::new("TX", 12.0)];
        assert!((factors.weighted_multiplier(&single).unwrap() - 1.0).abs() < 1e-12);

        // 9 months NY (1.20), 3 months FL (1.08) -> 1.17
        let split = vec![Residence::new("NY", 9.0), Residence::new("FL", 3.0)];
        let expected = (1.20 * 9.0 + 1.08 * 3.0) / 12.0;
        assert!((factors.weighted_multiplier(&split).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_multiplier_empty_residences() {
        let factors = StateFactors::default_2024();
        assert_eq!(factors.weighted_multiplier(&[]).unwrap(), 1.0);
    }

    #[test]
    fn test_weighted_multiplier_propagates_unknown_state() {
        let factors = StateFactors::default_2024();
        let residences = vec![Residence::new("CA", 6.0), Residence::new("XX", 6.0)];
        assert!(factors.weighted_multiplier(&residences).is_err());
    }

    #[test]
    fn test_category_costs_cover_all_categories() {
        let costs = CategoryCosts::default_2024();
        for category in Category::ALL {
            assert!(costs.base_monthly_cost(category) > 0.0);
        }
    }

    #[test]
    fn test_category_costs_override() {
        let costs = CategoryCosts::from_loaded(&[(Category::Dental, 42.0)]);
        assert_eq!(costs.base_monthly_cost(Category::Dental), 42.0);
        // Non-overridden categories keep default pricing
        assert_eq!(costs.base_monthly_cost(Category::Vision), 15.0);
    }
}
