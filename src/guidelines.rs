// 📏 Weight-Gain Guidelines
//
// Reference data that supplies target ranges to the calculator.
// Figures follow the IOM 2009 recommendations for singleton pregnancies.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Weeks covered by the first-trimester allowance
const FIRST_TRIMESTER_WEEKS: i64 = 13;

/// Total first-trimester gain, every category
const FIRST_TRIMESTER_GAIN_KG: (f64, f64) = (0.5, 2.0);

// ============================================================================
// BMI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// Body-mass index from pre-pregnancy weight and height
pub fn bmi(weight_kg: f64, height_m: f64) -> Result<f64> {
    if !(height_m > 0.0) || !(weight_kg > 0.0) {
        return Err(Error::InvalidInput(format!(
            "weight {} kg / height {} m must both be positive",
            weight_kg, height_m
        )));
    }
    Ok(weight_kg / (height_m * height_m))
}

// ============================================================================
// GUIDELINE
// ============================================================================

/// Recommended gain for one BMI category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightGainGuideline {
    pub category: BmiCategory,
    /// Total gain over the pregnancy (kg)
    pub total_min_kg: f64,
    pub total_max_kg: f64,
    /// Weekly gain in the 2nd and 3rd trimesters (kg/week)
    pub weekly_min_kg: f64,
    pub weekly_max_kg: f64,
}

impl WeightGainGuideline {
    pub fn for_category(category: BmiCategory) -> Self {
        let (total_min_kg, total_max_kg, weekly_min_kg, weekly_max_kg) = match category {
            BmiCategory::Underweight => (12.5, 18.0, 0.44, 0.58),
            BmiCategory::Normal => (11.5, 16.0, 0.35, 0.50),
            BmiCategory::Overweight => (7.0, 11.5, 0.23, 0.33),
            BmiCategory::Obese => (5.0, 9.0, 0.17, 0.27),
        };

        WeightGainGuideline {
            category,
            total_min_kg,
            total_max_kg,
            weekly_min_kg,
            weekly_max_kg,
        }
    }

    pub fn for_bmi(bmi: f64) -> Self {
        Self::for_category(BmiCategory::from_bmi(bmi))
    }

    /// Target (min, max) cumulative gain at a gestational week.
    ///
    /// Weeks 0..=13 prorate the first-trimester allowance; later weeks add
    /// the weekly rate. Both bounds are capped at the total maximum.
    pub fn target_range_at_week(&self, week: i64) -> (f64, f64) {
        let week = week.max(0);

        let (min, max) = if week <= FIRST_TRIMESTER_WEEKS {
            let fraction = week as f64 / FIRST_TRIMESTER_WEEKS as f64;
            (
                FIRST_TRIMESTER_GAIN_KG.0 * fraction,
                FIRST_TRIMESTER_GAIN_KG.1 * fraction,
            )
        } else {
            let extra_weeks = (week - FIRST_TRIMESTER_WEEKS) as f64;
            (
                FIRST_TRIMESTER_GAIN_KG.0 + self.weekly_min_kg * extra_weeks,
                FIRST_TRIMESTER_GAIN_KG.1 + self.weekly_max_kg * extra_weeks,
            )
        };

        (min.min(self.total_max_kg), max.min(self.total_max_kg))
    }
}
