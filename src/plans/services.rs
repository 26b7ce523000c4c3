use sqlx::PgConnection;
use time::Date;
use tracing::debug;
use uuid::Uuid;

use super::repo;
use super::repo_types::{Assignment, MealPlan, PlanDay};
use super::rotation::resolve_day;
use crate::error::{AppError, AppResult};

/// What a client is meant to eat on a date.
#[derive(Debug, Clone)]
pub enum DayPlan {
    /// No assignment covers the date; anything logged is an extra meal.
    NoPlan,
    Planned {
        assignment: Assignment,
        plan: MealPlan,
    },
}

impl DayPlan {
    /// The resolved plan day, if there is a plan and it has any days.
    pub fn day(&self, date: Date) -> Option<&PlanDay> {
        match self {
            DayPlan::NoPlan => None,
            DayPlan::Planned { assignment, plan } => {
                resolve_day(assignment.start_date, &plan.days, date)
            }
        }
    }
}

pub async fn plan_for_date(
    conn: &mut PgConnection,
    client_id: Uuid,
    date: Date,
) -> AppResult<DayPlan> {
    let Some(assignment) = repo::current_for_client(conn, client_id, date).await? else {
        debug!(%client_id, %date, "no active assignment");
        return Ok(DayPlan::NoPlan);
    };
    let plan = repo::load_plan(conn, assignment.meal_plan_id)
        .await?
        .ok_or(AppError::NotFound("Meal plan"))?;
    Ok(DayPlan::Planned { assignment, plan })
}
