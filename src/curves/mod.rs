//! Age-indexed actuarial risk curves for supplemental coverage categories
//!
//! Each coverage category maps an attained age to a probability-of-need
//! score, a risk level, an expected utilization rate, and a cost multiplier.
//! Curves are pure functions over piecewise-linear anchor tables; ages are
//! rounded and clamped before lookup, never rejected.

mod shapes;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Highest age any curve is defined for; older ages clamp to this
pub const MAX_CURVE_AGE: u8 = 120;

/// Supplemental coverage category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dental,
    Vision,
    Accident,
    CriticalIllness,
    HospitalIndemnity,
    Disability,
    LongTermCare,
    Life,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 8] = [
        Category::Dental,
        Category::Vision,
        Category::Accident,
        Category::CriticalIllness,
        Category::HospitalIndemnity,
        Category::Disability,
        Category::LongTermCare,
        Category::Life,
    ];

    /// Stable identifier used in table files and CSV output
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dental => "dental",
            Category::Vision => "vision",
            Category::Accident => "accident",
            Category::CriticalIllness => "critical_illness",
            Category::HospitalIndemnity => "hospital_indemnity",
            Category::Disability => "disability",
            Category::LongTermCare => "long_term_care",
            Category::Life => "life",
        }
    }

    /// Human-readable product name
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Dental => "Dental",
            Category::Vision => "Vision",
            Category::Accident => "Accident",
            Category::CriticalIllness => "Critical Illness",
            Category::HospitalIndemnity => "Hospital Indemnity",
            Category::Disability => "Disability",
            Category::LongTermCare => "Long-Term Care",
            Category::Life => "Life",
        }
    }

    /// Product identifier carried on recommendations
    pub fn insurance_id(&self) -> String {
        format!("supp-{}", self.as_str().replace('_', "-"))
    }

    /// Parse a table-file identifier
    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s {
            "dental" => Ok(Category::Dental),
            "vision" => Ok(Category::Vision),
            "accident" => Ok(Category::Accident),
            "critical_illness" => Ok(Category::CriticalIllness),
            "hospital_indemnity" => Ok(Category::HospitalIndemnity),
            "disability" => Ok(Category::Disability),
            "long_term_care" => Ok(Category::LongTermCare),
            "life" => Ok(Category::Life),
            other => Err(EngineError::UnknownCategory(other.to_string())),
        }
    }
}

/// Ordered risk classification derived from the probability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Classify a probability score (0-100)
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            RiskLevel::VeryHigh
        } else if score >= 70.0 {
            RiskLevel::High
        } else if score >= 45.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
        }
    }
}

/// Curve evaluation result for one (age, category) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Probability-of-need score in [0, 100]
    pub probability_score: f64,

    /// Risk classification derived from the score
    pub risk_level: RiskLevel,

    /// Expected annual utilization rate in [0, 1]
    pub utilization_rate: f64,

    /// Pricing multiplier applied on top of the category base cost (> 0)
    pub cost_multiplier: f64,

    /// Human-readable justification for the score
    pub reasoning: String,
}

/// Round a fractional age to the nearest year and clamp into [0, 120]
///
/// Clamping is the defined policy for out-of-range input, not an error:
/// negative ages evaluate as age 0 and ages above 120 as age 120.
pub fn clamp_age(age_years: f64) -> u8 {
    if age_years.is_nan() || age_years <= 0.0 {
        return 0;
    }
    let rounded = age_years.round();
    if rounded >= MAX_CURVE_AGE as f64 {
        MAX_CURVE_AGE
    } else {
        rounded as u8
    }
}

/// Evaluate the risk curve for a category at a given age
///
/// Total and side-effect-free: any finite age produces a point. Fractional
/// ages round to the nearest integer before lookup.
pub fn evaluate(age_years: f64, category: Category) -> CurvePoint {
    let age = clamp_age(age_years);
    match category {
        Category::Dental => shapes::dental(age),
        Category::Vision => shapes::vision(age),
        Category::Accident => shapes::accident(age),
        Category::CriticalIllness => shapes::critical_illness(age),
        Category::HospitalIndemnity => shapes::hospital_indemnity(age),
        Category::Disability => shapes::disability(age),
        Category::LongTermCare => shapes::long_term_care(age),
        Category::Life => shapes::life(age),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_and_rates_in_bounds() {
        for category in Category::ALL {
            for age in 0..=120u8 {
                let point = evaluate(age as f64, category);
                assert!(
                    (0.0..=100.0).contains(&point.probability_score),
                    "{:?} age {}: score {} out of bounds",
                    category,
                    age,
                    point.probability_score
                );
                assert!(
                    (0.0..=1.0).contains(&point.utilization_rate),
                    "{:?} age {}: utilization {} out of bounds",
                    category,
                    age,
                    point.utilization_rate
                );
                assert!(
                    point.cost_multiplier > 0.0,
                    "{:?} age {}: non-positive multiplier",
                    category,
                    age
                );
                assert!(!point.reasoning.is_empty());
            }
        }
    }

    #[test]
    fn test_adjacent_age_jump_bound() {
        for category in Category::ALL {
            for age in 0..120u8 {
                let a = evaluate(age as f64, category).probability_score;
                let b = evaluate((age + 1) as f64, category).probability_score;
                assert!(
                    (b - a).abs() < 30.0,
                    "{:?}: score jump {} -> {} at age {}",
                    category,
                    a,
                    b,
                    age
                );
            }
        }
    }

    #[test]
    fn test_out_of_range_ages_clamp() {
        for category in Category::ALL {
            let low = evaluate(-5.0, category);
            let zero = evaluate(0.0, category);
            assert_eq!(low.probability_score, zero.probability_score);

            let high = evaluate(150.0, category);
            let max = evaluate(120.0, category);
            assert_eq!(high.probability_score, max.probability_score);
        }
    }

    #[test]
    fn test_fractional_ages_round_to_nearest() {
        for category in Category::ALL {
            let down = evaluate(40.4, category);
            let at = evaluate(40.0, category);
            assert_eq!(down.probability_score, at.probability_score);

            let up = evaluate(40.6, category);
            let next = evaluate(41.0, category);
            assert_eq!(up.probability_score, next.probability_score);
        }
    }

    #[test]
    fn test_monotone_categories_rise_with_age() {
        for category in [Category::CriticalIllness, Category::LongTermCare] {
            let mut prev = evaluate(0.0, category).probability_score;
            for age in 1..=120u8 {
                let score = evaluate(age as f64, category).probability_score;
                assert!(
                    score >= prev - 1e-9,
                    "{:?}: score decreased at age {}",
                    category,
                    age
                );
                prev = score;
            }
        }
    }

    #[test]
    fn test_landmark_scores() {
        // Pediatric dental/vision coverage is a strong recommendation
        assert!(evaluate(0.0, Category::Dental).probability_score > 50.0);
        assert!(evaluate(0.0, Category::Vision).probability_score > 50.0);

        // Extreme old age: LTC and critical illness dominate
        assert!(evaluate(120.0, Category::LongTermCare).probability_score > 80.0);
        assert!(evaluate(120.0, Category::CriticalIllness).probability_score > 80.0);

        // Disability risk concentrates in working years
        let working = evaluate(40.0, Category::Disability).probability_score;
        let retired = evaluate(70.0, Category::Disability).probability_score;
        assert!(working > retired);

        // Life insurance need peaks at earning ages
        let peak = evaluate(38.0, Category::Life).probability_score;
        assert!(peak > evaluate(75.0, Category::Life).probability_score);
        assert!(peak > evaluate(18.0, Category::Life).probability_score);
    }

    #[test]
    fn test_risk_level_thresholds() {
        assert_eq!(RiskLevel::from_score(10.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(45.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(85.0), RiskLevel::VeryHigh);
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::VeryHigh);
    }

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()).unwrap(), category);
        }
        assert!(Category::parse("pet_insurance").is_err());
    }

    #[test]
    fn test_clamp_age() {
        assert_eq!(clamp_age(-3.0), 0);
        assert_eq!(clamp_age(0.0), 0);
        assert_eq!(clamp_age(64.4), 64);
        assert_eq!(clamp_age(64.5), 65);
        assert_eq!(clamp_age(120.0), 120);
        assert_eq!(clamp_age(500.0), 120);
        assert_eq!(clamp_age(f64::NAN), 0);
    }
}
