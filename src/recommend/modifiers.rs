//! Per-person score modifiers
//!
//! Applied on top of the raw curve score in a fixed order: tobacco, chronic
//! conditions, Medicare gaps, multi-residence travel exposure, then budget
//! de-prioritization. The score is clamped back into [0, 100] after each
//! step so a stack of boosts cannot escape the curve domain.

use crate::curves::{Category, CurvePoint};
use crate::household::{BudgetLevel, Household, Person};

/// Tobacco boost for the underwriting-sensitive categories
const TOBACCO_BOOST: f64 = 6.0;

/// Boost per diagnosed chronic condition
const CHRONIC_BOOST_PER_CONDITION: f64 = 6.0;

/// Cap on the total chronic-condition boost
const CHRONIC_BOOST_CAP: f64 = 15.0;

/// Boost for categories that fill Medicare coverage gaps
const MEDICARE_GAP_BOOST: f64 = 10.0;

/// Accident boost for households splitting the year across residences
const TRAVEL_BOOST: f64 = 8.0;

/// Score multiplier for expensive categories under a tight budget
const LOW_BUDGET_FACTOR: f64 = 0.85;

/// Base monthly cost at which budget de-prioritization kicks in
const LOW_BUDGET_COST_THRESHOLD: f64 = 40.0;

/// Primary premium above which a moderate budget is treated as strained
const PREMIUM_STRAIN_THRESHOLD: f64 = 900.0;

/// Modified score plus the reasons the modifiers contributed
pub(super) struct AdjustedScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Apply all modifiers for one (member, category) pair
pub(super) fn apply(
    point: &CurvePoint,
    person: &Person,
    household: &Household,
    category: Category,
    base_monthly_cost: f64,
    primary_premium: f64,
) -> AdjustedScore {
    let mut score = point.probability_score;
    let mut reasons = Vec::new();

    // 1. Tobacco use raises critical-illness and life exposure
    if person.tobacco_use
        && matches!(category, Category::CriticalIllness | Category::Life)
    {
        score = (score + TOBACCO_BOOST).clamp(0.0, 100.0);
        reasons.push("Tobacco use increases claim likelihood for this coverage".to_string());
    }

    // 2. Chronic conditions raise illness/hospitalization/disability exposure
    if person.has_chronic_conditions()
        && matches!(
            category,
            Category::CriticalIllness | Category::HospitalIndemnity | Category::Disability
        )
    {
        let boost = (person.chronic_conditions.len() as f64 * CHRONIC_BOOST_PER_CONDITION)
            .min(CHRONIC_BOOST_CAP);
        score = (score + boost).clamp(0.0, 100.0);
        reasons.push(format!(
            "{} chronic condition(s) on file raise expected utilization",
            person.chronic_conditions.len()
        ));
    }

    // 3. Medicare does not cover routine dental, vision, or daily hospital cash
    if household.medicare_eligible
        && person.age >= 65
        && matches!(
            category,
            Category::Dental | Category::Vision | Category::HospitalIndemnity
        )
    {
        score = (score + MEDICARE_GAP_BOOST).clamp(0.0, 100.0);
        reasons.push("Original Medicare leaves this coverage gap unfilled".to_string());
    }

    // 4. Multi-residence households carry extra travel/transit exposure
    if household.is_multi_residence() && category == Category::Accident {
        score = (score + TRAVEL_BOOST).clamp(0.0, 100.0);
        reasons.push("Time split across residences adds travel accident exposure".to_string());
    }

    // 5. Tight budgets de-prioritize the expensive categories; a moderate
    //    budget already strained by the primary premium is treated the same
    let budget_strained = household.budget == BudgetLevel::Low
        || (household.budget == BudgetLevel::Moderate
            && primary_premium > PREMIUM_STRAIN_THRESHOLD);
    if budget_strained && base_monthly_cost >= LOW_BUDGET_COST_THRESHOLD {
        score = (score * LOW_BUDGET_FACTOR).clamp(0.0, 100.0);
        reasons.push("De-prioritized to fit the household budget".to_string());
    }

    AdjustedScore { score, reasons }
}

/// Relevance floor: members scoring at or above this count toward
/// `applicable_members` for the category
pub(super) fn relevance_floor(category: Category) -> f64 {
    match category {
        Category::Dental | Category::Vision => 40.0,
        _ => 45.0,
    }
}
