//! Which plan-day applies to a client on a given date.
//!
//! Everything here is pure: the same assignment, days and date always resolve
//! to the same day, so logs can be recomputed at any time.

use time::Date;

use super::repo_types::{Assignment, PlanDay};

/// The assignment in force on `date`: among those covering the date, the one
/// with the latest start date (ties go to the most recently created).
pub fn current_assignment<'a, I>(assignments: I, date: Date) -> Option<&'a Assignment>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    assignments
        .into_iter()
        .filter(|a| a.covers(date))
        .max_by_key(|a| (a.start_date, a.created_at))
}

/// Position in a `day_count`-day rotation reached on `target` when the
/// rotation began on `start`. Always in `[0, max(day_count, 1))`; dates before
/// the start wrap backwards.
pub fn rotation_index(start: Date, target: Date, day_count: usize) -> usize {
    let count = day_count.max(1) as i64;
    let elapsed = (target - start).whole_days();
    elapsed.rem_euclid(count) as usize
}

/// The plan day for `target`. When no day carries the rotation index (sparse
/// indices) the lowest-indexed day is used; `None` only for a plan without
/// days.
pub fn resolve_day(start: Date, days: &[PlanDay], target: Date) -> Option<&PlanDay> {
    let index = rotation_index(start, target, days.len());
    days.iter()
        .find(|d| usize::try_from(d.day_index).ok() == Some(index))
        .or_else(|| days.iter().min_by_key(|d| d.day_index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::Duration;
    use uuid::Uuid;

    fn day(index: i32) -> PlanDay {
        PlanDay {
            id: Uuid::new_v4(),
            meal_plan_id: Uuid::nil(),
            day_index: index,
            title: format!("Day {}", index + 1),
            meals: Vec::new(),
        }
    }

    fn assignment(start: Date, end: Option<Date>) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            meal_plan_id: Uuid::new_v4(),
            client_id: Uuid::nil(),
            start_date: start,
            end_date: end,
            created_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn three_day_rotation_repeats() {
        let start = date!(2024 - 05 - 01);
        let days = vec![day(0), day(1), day(2)];
        for offset in 0..30i64 {
            let target = start + Duration::days(offset);
            let resolved = resolve_day(start, &days, target).unwrap();
            assert_eq!(resolved.day_index as i64, offset % 3, "offset {offset}");
        }
    }

    #[test]
    fn rotation_index_stays_in_range_and_wraps_backwards() {
        let start = date!(2024 - 05 - 10);
        for offset in -20i64..20 {
            let idx = rotation_index(start, start + Duration::days(offset), 4);
            assert!(idx < 4);
        }
        assert_eq!(rotation_index(start, date!(2024 - 05 - 09), 3), 2);
        assert_eq!(rotation_index(start, date!(2024 - 05 - 07), 3), 0);
    }

    #[test]
    fn zero_days_treated_as_one() {
        let start = date!(2024 - 05 - 10);
        assert_eq!(rotation_index(start, date!(2024 - 06 - 01), 0), 0);
        assert!(resolve_day(start, &[], date!(2024 - 06 - 01)).is_none());
    }

    #[test]
    fn resolution_is_deterministic() {
        let start = date!(2024 - 01 - 01);
        let days = vec![day(0), day(1), day(2), day(3), day(4)];
        let target = date!(2024 - 03 - 17);
        let a = resolve_day(start, &days, target).map(|d| d.id);
        let b = resolve_day(start, &days, target).map(|d| d.id);
        assert_eq!(a, b);
    }

    #[test]
    fn sparse_indices_fall_back_to_lowest_day() {
        let start = date!(2024 - 01 - 01);
        let days = vec![day(5), day(2)];
        // Two days -> rotation index 1, which no day carries.
        let resolved = resolve_day(start, &days, date!(2024 - 01 - 02)).unwrap();
        assert_eq!(resolved.day_index, 2);
    }

    #[test]
    fn latest_start_wins_among_overlaps() {
        let older = assignment(date!(2024 - 01 - 01), None);
        let newer = assignment(date!(2024 - 02 - 01), None);
        let future = assignment(date!(2024 - 06 - 01), None);
        let all = vec![older.clone(), newer.clone(), future];
        let picked = current_assignment(&all, date!(2024 - 03 - 01)).unwrap();
        assert_eq!(picked.id, newer.id);

        let picked = current_assignment(&all, date!(2024 - 01 - 15)).unwrap();
        assert_eq!(picked.id, older.id);
    }

    #[test]
    fn closed_assignments_stop_covering_after_end_date() {
        let closed = assignment(date!(2024 - 01 - 01), Some(date!(2024 - 01 - 31)));
        let all = vec![closed];
        assert!(current_assignment(&all, date!(2024 - 01 - 31)).is_some());
        assert!(current_assignment(&all, date!(2024 - 02 - 01)).is_none());
        assert!(current_assignment(&all, date!(2023 - 12 - 31)).is_none());
    }
}
