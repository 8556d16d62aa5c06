//! Recommendation output records

use serde::{Deserialize, Serialize};

use crate::curves::{Category, RiskLevel};
use crate::household::AgeGroup;

/// Priority tier derived from the household probability score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Below the default-view threshold; only shown with `show_all`
    Low,
    /// Score in [50, 75)
    Medium,
    /// Score >= 75
    High,
}

impl Priority {
    /// Classification threshold for the high tier
    pub const HIGH_THRESHOLD: f64 = 75.0;

    /// Classification threshold for the medium tier (default-view floor)
    pub const MEDIUM_THRESHOLD: f64 = 50.0;

    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Priority::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

/// A single priced household recommendation
///
/// Created fresh per recommendation run and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Product identifier (e.g. "supp-dental")
    pub insurance_id: String,

    /// Coverage category
    pub category: Category,

    /// Priority tier
    pub priority: Priority,

    /// Household probability score (max across members, after modifiers)
    pub probability_score: f64,

    /// Risk level of the driving member's curve point
    pub risk_level: RiskLevel,

    /// Per-person monthly cost after state multiplier and curve multiplier
    pub adjusted_cost_per_month: f64,

    /// Monthly cost across applicable members after the bundle discount
    pub household_cost_per_month: f64,

    /// Members at or above the category relevance floor
    pub applicable_members: usize,

    /// Ordered human-readable justifications (curve reasoning first)
    pub reasons: Vec<String>,

    /// Display age-group label of the driving member
    pub age_group: String,
}

/// Member count for one display age group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeGroupCount {
    pub group: AgeGroup,
    pub label: String,
    pub count: usize,
}

/// Complete output of one recommendation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSet {
    /// All produced recommendations, sorted by score descending
    pub recommendations: Vec<Recommendation>,

    /// Monthly total across high-priority recommendations
    pub total_monthly_high_priority: f64,

    /// Monthly total across all recommended (high + medium) rows
    pub total_monthly_all_recommended: f64,

    /// Household composition for display grouping
    pub household_age_groups: Vec<AgeGroupCount>,
}

impl RecommendationSet {
    /// Empty result for an empty household
    pub fn empty() -> Self {
        Self {
            recommendations: Vec::new(),
            total_monthly_high_priority: 0.0,
            total_monthly_all_recommended: 0.0,
            household_age_groups: Vec::new(),
        }
    }

    /// High-priority recommendations in score order
    pub fn high_priority(&self) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .collect()
    }

    /// Medium-priority recommendations in score order
    pub fn medium_priority(&self) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.priority == Priority::Medium)
            .collect()
    }

    /// Count of recommended (high or medium) categories
    pub fn recommended_count(&self) -> usize {
        self.recommendations
            .iter()
            .filter(|r| r.priority >= Priority::Medium)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(Priority::from_score(75.0), Priority::High);
        assert_eq!(Priority::from_score(74.9), Priority::Medium);
        assert_eq!(Priority::from_score(50.0), Priority::Medium);
        assert_eq!(Priority::from_score(49.9), Priority::Low);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }
}
