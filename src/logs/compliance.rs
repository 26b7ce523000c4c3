use super::reconcile::ReconciledItem;
use super::repo_types::{ComplianceStatus, MealStatus};

/// Classifies consumption against the plan.
///
/// `UNKNOWN` when there is no positive plan or no consumption figure;
/// otherwise the ratio `consumed / planned` is `UNDER` below 0.9, `MET` in
/// `[0.9, 1.1]` and `OVER` above 1.1. Compared in integers so the bounds are
/// exact.
pub fn classify(planned: Option<i32>, consumed: Option<i32>) -> ComplianceStatus {
    let (Some(planned), Some(consumed)) = (planned, consumed) else {
        return ComplianceStatus::Unknown;
    };
    if planned <= 0 {
        return ComplianceStatus::Unknown;
    }
    let planned = i64::from(planned);
    let consumed = i64::from(consumed);
    if consumed * 10 < planned * 9 {
        ComplianceStatus::Under
    } else if consumed * 10 <= planned * 11 {
        ComplianceStatus::Met
    } else {
        ComplianceStatus::Over
    }
}

/// Status used when the client does not declare one: `SKIPPED` if nothing was
/// marked consumed, `EATEN` otherwise.
pub fn derive_status(items: &[ReconciledItem]) -> MealStatus {
    let ate_something = items.iter().any(|i| {
        [
            i.consumed_calories,
            i.consumed_protein,
            i.consumed_carbs,
            i.consumed_fats,
        ]
        .into_iter()
        .flatten()
        .any(|v| v > 0)
    });
    if ate_something {
        MealStatus::Eaten
    } else {
        MealStatus::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComplianceStatus::*;

    #[test]
    fn boundaries() {
        assert_eq!(classify(Some(100), Some(89)), Under);
        assert_eq!(classify(Some(100), Some(90)), Met);
        assert_eq!(classify(Some(100), Some(110)), Met);
        assert_eq!(classify(Some(100), Some(111)), Over);
    }

    #[test]
    fn unknown_without_plan_or_consumption() {
        assert_eq!(classify(Some(0), Some(50)), Unknown);
        assert_eq!(classify(Some(100), None), Unknown);
        assert_eq!(classify(None, Some(100)), Unknown);
        assert_eq!(classify(Some(-5), Some(10)), Unknown);
    }

    #[test]
    fn nothing_eaten_against_a_plan_is_under() {
        assert_eq!(classify(Some(510), Some(0)), Under);
    }

    #[test]
    fn fractional_bounds_are_exact() {
        // 0.9 * 511 = 459.9
        assert_eq!(classify(Some(511), Some(459)), Under);
        assert_eq!(classify(Some(511), Some(460)), Met);
        // 1.1 * 511 = 562.1
        assert_eq!(classify(Some(511), Some(562)), Met);
        assert_eq!(classify(Some(511), Some(563)), Over);
    }

    fn item(calories: Option<i32>) -> ReconciledItem {
        ReconciledItem {
            meal_plan_food_id: None,
            name: "x".into(),
            planned_quantity: None,
            planned_unit: None,
            planned_calories: None,
            planned_protein: None,
            planned_carbs: None,
            planned_fats: None,
            consumed_quantity: None,
            consumed_calories: calories,
            consumed_protein: Some(0),
            consumed_carbs: None,
            consumed_fats: None,
            is_extra: true,
        }
    }

    #[test]
    fn derived_status() {
        assert_eq!(derive_status(&[]), MealStatus::Skipped);
        assert_eq!(derive_status(&[item(Some(0)), item(None)]), MealStatus::Skipped);
        assert_eq!(derive_status(&[item(Some(0)), item(Some(120))]), MealStatus::Eaten);
    }
}
