//! Per-category curve definitions
//!
//! Each category is a small standalone function over piecewise-linear anchor
//! tables, so its shape can be unit-tested against the bounds and jump
//! properties independently. Anchor ages must be strictly increasing.

use super::{CurvePoint, RiskLevel};

/// Linear interpolation over (age, value) anchors, flat beyond the ends
fn grade(anchors: &[(u8, f64)], age: u8) -> f64 {
    debug_assert!(!anchors.is_empty());

    let (first_age, first_value) = anchors[0];
    if age <= first_age {
        return first_value;
    }

    for pair in anchors.windows(2) {
        let (a0, v0) = pair[0];
        let (a1, v1) = pair[1];
        if age <= a1 {
            let span = (a1 - a0) as f64;
            let t = (age - a0) as f64 / span;
            return v0 + (v1 - v0) * t;
        }
    }

    anchors.last().map(|&(_, v)| v).unwrap_or(first_value)
}

fn point(score: f64, utilization: f64, multiplier: f64, reasoning: String) -> CurvePoint {
    let score = score.clamp(0.0, 100.0);
    CurvePoint {
        probability_score: score,
        risk_level: RiskLevel::from_score(score),
        utilization_rate: utilization.clamp(0.0, 1.0),
        cost_multiplier: multiplier,
        reasoning,
    }
}

/// Dental: near-flat-high across all ages with a pediatric bump
pub(super) fn dental(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 72.0),
            (2, 78.0),
            (6, 82.0),
            (12, 80.0),
            (18, 68.0),
            (30, 64.0),
            (45, 68.0),
            (60, 76.0),
            (75, 84.0),
            (120, 86.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.62), (6, 0.75), (18, 0.58), (40, 0.60), (65, 0.72), (120, 0.74)],
        age,
    );
    let multiplier = grade(&[(0, 1.05), (18, 1.0), (50, 1.1), (70, 1.25), (120, 1.3)], age);

    let reasoning = match age {
        0..=12 => "Pediatric dental care (sealants, orthodontic screening) drives high utilization through age 12".to_string(),
        13..=29 => "Routine cleanings and wisdom-tooth extractions keep dental utilization steady".to_string(),
        30..=59 => "Restorative work (crowns, root canals) becomes more likely from mid-career onward".to_string(),
        _ => "Periodontal disease and tooth replacement needs rise sharply for seniors".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Vision: flat-high with a pediatric screening bump, rising after 40
pub(super) fn vision(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 68.0),
            (4, 74.0),
            (8, 72.0),
            (18, 60.0),
            (40, 62.0),
            (50, 74.0),
            (60, 82.0),
            (75, 88.0),
            (120, 90.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.50), (8, 0.60), (18, 0.45), (45, 0.65), (60, 0.80), (120, 0.85)],
        age,
    );
    let multiplier = grade(&[(0, 1.0), (40, 1.05), (60, 1.2), (120, 1.25)], age);

    let reasoning = match age {
        0..=12 => "Early vision screening catches amblyopia and refractive errors in children".to_string(),
        13..=39 => "Corrective lenses are common but exam needs are stable in young adulthood".to_string(),
        40..=59 => "Presbyopia onset after 40 makes annual exams and progressive lenses likely".to_string(),
        _ => "Cataract, glaucoma, and macular degeneration risk makes senior eye care near-certain".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Accident: peaks in young adulthood, late-life uptick from fall risk
pub(super) fn accident(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 58.0),
            (10, 64.0),
            (16, 72.0),
            (22, 76.0),
            (30, 70.0),
            (45, 56.0),
            (60, 48.0),
            (70, 52.0),
            (80, 64.0),
            (120, 68.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.30), (20, 0.40), (45, 0.25), (75, 0.35), (120, 0.40)],
        age,
    );
    let multiplier = grade(&[(0, 1.0), (22, 1.15), (50, 1.0), (80, 1.2), (120, 1.25)], age);

    let reasoning = match age {
        0..=15 => "Playground and sports injuries make accident claims common for children".to_string(),
        16..=34 => "Injury rates peak for young adults (driving, sports, occupational exposure)".to_string(),
        35..=64 => "Accident frequency declines through mid-life as activity risk drops".to_string(),
        _ => "Fall-related injuries push accident risk back up for seniors".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Critical illness: monotone rising, accelerating after age 50
pub(super) fn critical_illness(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 8.0),
            (18, 14.0),
            (30, 24.0),
            (40, 34.0),
            (50, 46.0),
            (60, 62.0),
            (70, 76.0),
            (80, 86.0),
            (90, 92.0),
            (105, 95.0),
            (120, 97.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.02), (40, 0.08), (60, 0.25), (80, 0.45), (120, 0.60)],
        age,
    );
    let multiplier = grade(&[(0, 1.0), (50, 1.3), (70, 1.9), (120, 2.6)], age);

    let reasoning = match age {
        0..=39 => "Cancer, heart attack, and stroke incidence is low before age 40".to_string(),
        40..=54 => "Critical illness incidence begins climbing through the 40s and 50s".to_string(),
        55..=69 => "Incidence accelerates after 55; a lump-sum benefit covers income gaps during treatment".to_string(),
        _ => "The majority of critical illness diagnoses occur at age 70 and beyond".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Hospital indemnity: rises steadily with admission probability
pub(super) fn hospital_indemnity(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 36.0),
            (5, 30.0),
            (18, 26.0),
            (30, 34.0),
            (40, 40.0),
            (50, 50.0),
            (60, 62.0),
            (70, 74.0),
            (80, 85.0),
            (90, 90.0),
            (120, 93.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.08), (30, 0.10), (60, 0.25), (85, 0.50), (120, 0.60)],
        age,
    );
    let multiplier = grade(&[(0, 1.0), (50, 1.2), (75, 1.7), (120, 2.1)], age);

    let reasoning = match age {
        0..=4 => "Newborn and early-childhood admissions are more frequent than for older children".to_string(),
        5..=39 => "Hospitalization rates are low through young adulthood".to_string(),
        40..=64 => "Admission probability rises with chronic disease onset in mid-life".to_string(),
        _ => "Seniors face the highest admission rates and the longest average stays".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Disability: working-years exposure, falling away at retirement
pub(super) fn disability(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 5.0),
            (14, 10.0),
            (18, 38.0),
            (25, 60.0),
            (35, 70.0),
            (50, 72.0),
            (55, 66.0),
            (62, 44.0),
            (67, 18.0),
            (75, 10.0),
            (120, 6.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.01), (18, 0.10), (40, 0.18), (55, 0.22), (67, 0.05), (120, 0.02)],
        age,
    );
    let multiplier = grade(
        &[(0, 1.0), (30, 1.05), (50, 1.35), (60, 1.4), (67, 1.1), (120, 1.0)],
        age,
    );

    let reasoning = match age {
        0..=17 => "Income-replacement coverage is not relevant before working age".to_string(),
        18..=49 => "A quarter of workers experience a disability lasting 90+ days before retirement".to_string(),
        50..=64 => "Disability incidence is highest late-career, when recovery also takes longest".to_string(),
        _ => "Income-replacement need largely ends at retirement age".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Long-term care: monotone rising, accelerating after age 50
pub(super) fn long_term_care(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 3.0),
            (30, 8.0),
            (40, 14.0),
            (50, 24.0),
            (60, 42.0),
            (70, 62.0),
            (75, 74.0),
            (80, 83.0),
            (85, 90.0),
            (95, 95.0),
            (120, 98.0),
        ],
        age,
    );
    let utilization = grade(
        &[(0, 0.0), (50, 0.03), (65, 0.10), (75, 0.25), (85, 0.50), (120, 0.75)],
        age,
    );
    let multiplier = grade(&[(0, 1.0), (50, 1.2), (65, 1.7), (80, 2.4), (120, 3.0)], age);

    let reasoning = match age {
        0..=44 => "Long-term care need is remote at younger ages; premiums are cheapest here".to_string(),
        45..=59 => "Buying in the 50s locks lower premiums before underwriting tightens".to_string(),
        60..=74 => "Roughly 70% of people turning 65 will need some form of long-term care".to_string(),
        _ => "Assisted-living or nursing care becomes near-certain at advanced ages".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}

/// Life: peaks at child-rearing/peak-earning ages, declines afterward
pub(super) fn life(age: u8) -> CurvePoint {
    let score = grade(
        &[
            (0, 12.0),
            (18, 36.0),
            (28, 62.0),
            (35, 74.0),
            (45, 72.0),
            (55, 60.0),
            (65, 44.0),
            (75, 30.0),
            (85, 22.0),
            (120, 16.0),
        ],
        age,
    );
    let utilization = grade(&[(0, 0.01), (30, 0.04), (50, 0.06), (120, 0.08)], age);
    let multiplier = grade(&[(0, 1.0), (30, 1.1), (45, 1.2), (60, 1.1), (120, 1.0)], age);

    let reasoning = match age {
        0..=17 => "Dependents rarely rely on a child's income; need is minimal".to_string(),
        18..=49 => "Mortgage and dependent obligations make income protection most valuable now".to_string(),
        50..=64 => "Coverage need tapers as dependents become self-sufficient".to_string(),
        _ => "With obligations retired, life coverage shifts to final-expense sizing".to_string(),
    };

    point(score, utilization, multiplier, reasoning)
}
