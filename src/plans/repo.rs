use std::collections::HashMap;

use sqlx::PgConnection;
use time::Date;
use uuid::Uuid;

use super::repo_types::{Assignment, MealPlan, MealWithPlan, PlanDay, PlanMeal, PlannedFood};
use super::rotation::current_assignment;

/// Assignments of a client that started on or before `date`.
pub async fn assignments_started_by(
    conn: &mut PgConnection,
    client_id: Uuid,
    date: Date,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        r#"
        SELECT id, meal_plan_id, client_id, start_date, end_date, created_at
        FROM meal_plan_assignments
        WHERE client_id = $1 AND start_date <= $2
        ORDER BY start_date DESC, created_at DESC
        "#,
    )
    .bind(client_id)
    .bind(date)
    .fetch_all(&mut *conn)
    .await
}

/// The client's assignment in force on `date`, if any.
pub async fn current_for_client(
    conn: &mut PgConnection,
    client_id: Uuid,
    date: Date,
) -> Result<Option<Assignment>, sqlx::Error> {
    let all = assignments_started_by(conn, client_id, date).await?;
    Ok(current_assignment(&all, date).cloned())
}

/// The client's assignment of one particular plan in force on `date`.
pub async fn current_for_plan(
    conn: &mut PgConnection,
    client_id: Uuid,
    plan_id: Uuid,
    date: Date,
) -> Result<Option<Assignment>, sqlx::Error> {
    let all = assignments_started_by(conn, client_id, date).await?;
    Ok(current_assignment(all.iter().filter(|a| a.meal_plan_id == plan_id), date).cloned())
}

/// A plan with its days, meals and foods, each level in display order.
pub async fn load_plan(
    conn: &mut PgConnection,
    plan_id: Uuid,
) -> Result<Option<MealPlan>, sqlx::Error> {
    let Some(plan) = sqlx::query_as::<_, MealPlan>(
        r#"SELECT id, coach_id, name, status FROM meal_plans WHERE id = $1"#,
    )
    .bind(plan_id)
    .fetch_optional(&mut *conn)
    .await?
    else {
        return Ok(None);
    };

    let days = sqlx::query_as::<_, PlanDay>(
        r#"
        SELECT id, meal_plan_id, day_index, title
        FROM meal_plan_days
        WHERE meal_plan_id = $1
        ORDER BY day_index ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(&mut *conn)
    .await?;

    let meals = sqlx::query_as::<_, PlanMeal>(
        r#"
        SELECT m.id, m.meal_plan_day_id, m.name, m.time_label, m.sort_order
        FROM meal_plan_meals m
        JOIN meal_plan_days d ON d.id = m.meal_plan_day_id
        WHERE d.meal_plan_id = $1
        ORDER BY m.sort_order ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(&mut *conn)
    .await?;

    let foods = sqlx::query_as::<_, PlannedFood>(
        r#"
        SELECT f.id, f.meal_plan_meal_id, f.name, f.quantity, f.unit,
               f.calories, f.protein, f.carbs, f.fats
        FROM meal_plan_foods f
        JOIN meal_plan_meals m ON m.id = f.meal_plan_meal_id
        JOIN meal_plan_days d ON d.id = m.meal_plan_day_id
        WHERE d.meal_plan_id = $1
        ORDER BY f.created_at ASC
        "#,
    )
    .bind(plan_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(assemble_plan(plan, days, meals, foods)))
}

/// A single meal with its foods and owning plan id.
pub async fn find_meal(
    conn: &mut PgConnection,
    meal_id: Uuid,
) -> Result<Option<MealWithPlan>, sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct MealRow {
        meal_plan_id: Uuid,
        #[sqlx(flatten)]
        meal: PlanMeal,
    }

    let row = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT d.meal_plan_id, m.id, m.meal_plan_day_id, m.name, m.time_label, m.sort_order
        FROM meal_plan_meals m
        JOIN meal_plan_days d ON d.id = m.meal_plan_day_id
        WHERE m.id = $1
        "#,
    )
    .bind(meal_id)
    .fetch_optional(&mut *conn)
    .await?;
    let Some(MealRow {
        meal_plan_id,
        mut meal,
    }) = row
    else {
        return Ok(None);
    };

    meal.foods = sqlx::query_as::<_, PlannedFood>(
        r#"
        SELECT id, meal_plan_meal_id, name, quantity, unit, calories, protein, carbs, fats
        FROM meal_plan_foods
        WHERE meal_plan_meal_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(meal_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(MealWithPlan { meal, meal_plan_id }))
}

/// Nests flat rows into the plan tree, keeping the order each list arrived in.
pub fn assemble_plan(
    mut plan: MealPlan,
    mut days: Vec<PlanDay>,
    meals: Vec<PlanMeal>,
    foods: Vec<PlannedFood>,
) -> MealPlan {
    let mut foods_by_meal: HashMap<Uuid, Vec<PlannedFood>> = HashMap::new();
    for food in foods {
        foods_by_meal.entry(food.meal_plan_meal_id).or_default().push(food);
    }

    let mut meals_by_day: HashMap<Uuid, Vec<PlanMeal>> = HashMap::new();
    for mut meal in meals {
        meal.foods = foods_by_meal.remove(&meal.id).unwrap_or_default();
        meals_by_day.entry(meal.meal_plan_day_id).or_default().push(meal);
    }

    for day in &mut days {
        day.meals = meals_by_day.remove(&day.id).unwrap_or_default();
    }
    plan.days = days;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::repo_types::{MealName, PlanStatus};

    #[test]
    fn assemble_nests_rows_in_order() {
        let plan = MealPlan {
            id: Uuid::new_v4(),
            coach_id: Uuid::new_v4(),
            name: "Cut".into(),
            status: PlanStatus::Active,
            days: Vec::new(),
        };
        let day0 = PlanDay {
            id: Uuid::new_v4(),
            meal_plan_id: plan.id,
            day_index: 0,
            title: "Mon".into(),
            meals: Vec::new(),
        };
        let day1 = PlanDay {
            id: Uuid::new_v4(),
            meal_plan_id: plan.id,
            day_index: 1,
            title: "Tue".into(),
            meals: Vec::new(),
        };
        let meal = |day: &PlanDay, name, order| PlanMeal {
            id: Uuid::new_v4(),
            meal_plan_day_id: day.id,
            name,
            time_label: None,
            sort_order: order,
            foods: Vec::new(),
        };
        let breakfast = meal(&day0, MealName::Breakfast, 0);
        let lunch = meal(&day0, MealName::Lunch, 1);
        let dinner = meal(&day1, MealName::Dinner, 0);
        let food = |m: &PlanMeal, name: &str, kcal| PlannedFood {
            id: Uuid::new_v4(),
            meal_plan_meal_id: m.id,
            name: name.into(),
            quantity: 100.0,
            unit: "g".into(),
            calories: kcal,
            protein: 0,
            carbs: 0,
            fats: 0,
        };
        let foods = vec![
            food(&breakfast, "Oats", 300),
            food(&dinner, "Rice", 200),
            food(&breakfast, "Eggs", 210),
        ];

        let plan = assemble_plan(
            plan,
            vec![day0, day1],
            vec![breakfast, lunch, dinner],
            foods,
        );

        assert_eq!(plan.days.len(), 2);
        let d0 = &plan.days[0];
        assert_eq!(d0.meals.len(), 2);
        assert_eq!(d0.meals[0].name, MealName::Breakfast);
        let names: Vec<_> = d0.meals[0].foods.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Oats", "Eggs"]);
        let kcal: i32 = d0.meals[0].foods.iter().map(|f| f.calories).sum();
        assert_eq!(kcal, 510);
        assert!(d0.meals[1].foods.is_empty());
        assert_eq!(plan.days[1].meals[0].foods[0].name, "Rice");
    }
}
