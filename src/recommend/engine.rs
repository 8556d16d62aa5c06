//! Recommendation engine
//!
//! Scores every (member, category) pair through the curves and modifiers,
//! collapses to household-level recommendations, prices them with state and
//! bundle adjustments, and classifies priority tiers.

use log::debug;

use crate::curves::{self, Category, CurvePoint};
use crate::error::EngineError;
use crate::household::{AgeGroup, Household, Preferences, PrimaryPlanContext};
use crate::pricing::bundle_discount;
use crate::tables::EngineTables;

use super::modifiers;
use super::output::{AgeGroupCount, Priority, Recommendation, RecommendationSet};

/// One category's household-level score before pricing
struct CategoryScore {
    category: Category,
    score: f64,
    driving_point: CurvePoint,
    driving_age: u8,
    reasons: Vec<String>,
    applicable_members: usize,
}

/// Household recommendation engine over a set of reference tables
pub struct RecommendationEngine {
    tables: EngineTables,
}

impl RecommendationEngine {
    pub fn new(tables: EngineTables) -> Self {
        Self { tables }
    }

    /// Generate priced, tiered recommendations for a household
    ///
    /// An empty household yields an empty set, not an error. The only
    /// failure path is an unknown state code in the residence list.
    pub fn recommend(
        &self,
        household: &Household,
        primary_plan: &PrimaryPlanContext,
        preferences: &Preferences,
    ) -> Result<RecommendationSet, EngineError> {
        if household.is_empty() {
            return Ok(RecommendationSet::empty());
        }

        let state_multiplier = self
            .tables
            .state_factors
            .weighted_multiplier(&household.residences)?;

        // Excluded categories are removed before scoring, not filtered
        // after, so they never enter the bundle count or totals
        let categories: Vec<Category> = Category::ALL
            .iter()
            .copied()
            .filter(|c| !preferences.exclude_categories.contains(c))
            .collect();

        let scored: Vec<CategoryScore> = categories
            .iter()
            .filter_map(|&category| self.score_category(category, household, primary_plan))
            .collect();

        // Bundle discount is decided once from the recommended-category
        // count and applied uniformly to every priced row
        let recommended_count = scored
            .iter()
            .filter(|s| s.score >= Priority::MEDIUM_THRESHOLD)
            .count();
        let discount = bundle_discount(recommended_count);

        let mut recommendations: Vec<Recommendation> = Vec::new();
        for entry in scored {
            let priority = Priority::from_score(entry.score);
            if priority == Priority::Low && !preferences.show_all {
                continue;
            }

            let base_cost = self.tables.costs.base_monthly_cost(entry.category);
            let adjusted_cost =
                base_cost * state_multiplier * entry.driving_point.cost_multiplier;
            let household_cost = adjusted_cost * entry.applicable_members as f64 * discount;

            debug!(
                "category {} scored {:.1} ({} applicable), ${:.2}/mo household",
                entry.category.as_str(),
                entry.score,
                entry.applicable_members,
                household_cost
            );

            recommendations.push(Recommendation {
                insurance_id: entry.category.insurance_id(),
                category: entry.category,
                priority,
                probability_score: entry.score,
                risk_level: entry.driving_point.risk_level,
                adjusted_cost_per_month: adjusted_cost,
                household_cost_per_month: household_cost,
                applicable_members: entry.applicable_members,
                reasons: entry.reasons,
                age_group: AgeGroup::from_age(entry.driving_age).label().to_string(),
            });
        }

        recommendations.sort_by(|a, b| {
            b.probability_score
                .partial_cmp(&a.probability_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_monthly_high_priority = recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .map(|r| r.household_cost_per_month)
            .sum();
        let total_monthly_all_recommended = recommendations
            .iter()
            .filter(|r| r.priority >= Priority::Medium)
            .map(|r| r.household_cost_per_month)
            .sum();

        let household_age_groups = household
            .age_groups()
            .into_iter()
            .map(|(group, count)| AgeGroupCount {
                group,
                label: group.label().to_string(),
                count,
            })
            .collect();

        Ok(RecommendationSet {
            recommendations,
            total_monthly_high_priority,
            total_monthly_all_recommended,
            household_age_groups,
        })
    }

    /// Score one category across all members
    ///
    /// The household score is the maximum member score: the category is
    /// worth recommending if any member has elevated risk. Members at or
    /// above the relevance floor count as applicable.
    fn score_category(
        &self,
        category: Category,
        household: &Household,
        primary_plan: &PrimaryPlanContext,
    ) -> Option<CategoryScore> {
        let base_cost = self.tables.costs.base_monthly_cost(category);
        let floor = modifiers::relevance_floor(category);

        let mut best_score = f64::NEG_INFINITY;
        let mut best_point: Option<CurvePoint> = None;
        let mut best_age = 0u8;
        let mut best_reasons: Vec<String> = Vec::new();
        let mut applicable_members = 0usize;

        for member in &household.members {
            let point = curves::evaluate(member.age as f64, category);
            let adjusted = modifiers::apply(
                &point,
                member,
                household,
                category,
                base_cost,
                primary_plan.monthly_premium,
            );

            if adjusted.score >= floor {
                applicable_members += 1;
            }

            if adjusted.score > best_score {
                best_score = adjusted.score;
                best_age = member.age;
                let mut reasons = vec![point.reasoning.clone()];
                reasons.extend(adjusted.reasons);
                best_reasons = reasons;
                best_point = Some(point);
            }
        }

        // No members means no driving point and nothing to recommend
        let driving_point = best_point?;

        Some(CategoryScore {
            category,
            score: best_score,
            driving_point,
            driving_age: best_age,
            reasons: best_reasons,
            applicable_members,
        })
    }
}
