//! Ranks catalogue foods by how closely they match a macro target.

use serde::{Deserialize, Serialize};

use super::repo_types::Food;

/// Score of a candidate when the target names no metric at all.
pub const NO_METRIC_SCORE: f64 = 999.0;
pub const DEFAULT_LIMIT: usize = 8;
pub const MAX_LIMIT: usize = 25;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MacroTarget {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredFood {
    #[serde(flatten)]
    pub food: Food,
    pub score: f64,
}

/// Mean relative distance over the metrics the target sets.
pub fn score(food: &Food, target: &MacroTarget) -> f64 {
    let pairs = [
        (target.calories, food.calories),
        (target.protein, food.protein),
        (target.carbs, food.carbs),
        (target.fats, food.fats),
    ];
    let parts: Vec<f64> = pairs
        .iter()
        .filter_map(|(want, have)| {
            want.map(|want| (f64::from(*have) - want).abs() / want.max(1.0))
        })
        .collect();
    if parts.is_empty() {
        return NO_METRIC_SCORE;
    }
    parts.iter().sum::<f64>() / parts.len() as f64
}

/// Clamps a requested limit into `[1, MAX_LIMIT]`.
pub fn clamp_limit(requested: Option<f64>) -> usize {
    match requested {
        Some(n) if n.is_finite() => n.clamp(1.0, MAX_LIMIT as f64) as usize,
        _ => DEFAULT_LIMIT,
    }
}

/// Best matches first. Equal scores keep their input order.
pub fn rank(candidates: Vec<Food>, target: &MacroTarget, limit: usize) -> Vec<ScoredFood> {
    let mut scored: Vec<ScoredFood> = candidates
        .into_iter()
        .map(|food| ScoredFood {
            score: score(&food, target),
            food,
        })
        .collect();
    scored.sort_by(|a, b| a.score.total_cmp(&b.score));
    scored.truncate(limit.clamp(1, MAX_LIMIT));
    scored
}

/// Calorie window the candidates are drawn from, as whole calories.
pub fn calorie_window(target_calories: Option<f64>, tolerance: Option<f64>) -> (i32, i32) {
    let tol = tolerance
        .filter(|t| t.is_finite())
        .unwrap_or(120.0)
        .max(25.0);
    match target_calories {
        Some(c) => ((c - tol).max(0.0).floor() as i32, (c + tol).ceil() as i32),
        None => (0, 5000),
    }
}
