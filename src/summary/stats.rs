//! Rollups over a window of meal logs. Inputs are already limited to the
//! window by the caller; everything here works on calendar dates.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use time::{Date, Duration};
use uuid::Uuid;

use crate::logs::repo_types::{ComplianceStatus, LogFact};

pub type ClientId = Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub days_logged: u32,
    pub compliance_rate: u32,
    pub streak: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRecap {
    pub meal_count: u32,
    pub average_calories: i64,
    pub compliance_rate: u32,
}

/// Everything logged by one client on one date.
#[derive(Debug, Clone, Default)]
pub struct DayAccumulator {
    pub meals: u32,
    pub calories: i64,
    pub statuses: Vec<ComplianceStatus>,
}

impl DayAccumulator {
    fn add(&mut self, fact: &LogFact) {
        self.meals += 1;
        self.calories += i64::from(fact.consumed_calories_total.unwrap_or(0));
        self.statuses.push(fact.compliance_status);
    }
}

/// Groups facts by client and date.
pub fn group_by_client_day(facts: &[LogFact]) -> BTreeMap<(ClientId, Date), DayAccumulator> {
    let mut groups: BTreeMap<(ClientId, Date), DayAccumulator> = BTreeMap::new();
    for fact in facts {
        groups
            .entry((fact.client_id, fact.date))
            .or_default()
            .add(fact);
    }
    groups
}

/// Percentage of `MET` among the statuses that are not `UNKNOWN`, rounded;
/// 0 when every status is unknown.
pub fn compliance_rate<I>(statuses: I) -> u32
where
    I: IntoIterator<Item = ComplianceStatus>,
{
    let (met, known) = statuses
        .into_iter()
        .filter(|s| *s != ComplianceStatus::Unknown)
        .fold((0u64, 0u64), |(met, known), s| {
            (met + u64::from(s == ComplianceStatus::Met), known + 1)
        });
    if known == 0 {
        return 0;
    }
    (100.0 * met as f64 / known as f64).round() as u32
}

/// Consecutive logged dates ending at `today` (inclusive).
pub fn streak(logged: &BTreeSet<Date>, today: Date) -> u32 {
    let mut count = 0;
    let mut cursor = today;
    while logged.contains(&cursor) {
        count += 1;
        cursor -= Duration::days(1);
    }
    count
}

/// Logged dates and statuses of one client over the window.
#[derive(Debug, Clone, Default)]
pub struct ClientAccumulator {
    pub dates: BTreeSet<Date>,
    pub statuses: Vec<ComplianceStatus>,
}

impl ClientAccumulator {
    fn summarize(self, today: Date) -> ComplianceSummary {
        ComplianceSummary {
            days_logged: self.dates.len() as u32,
            compliance_rate: compliance_rate(self.statuses),
            streak: streak(&self.dates, today),
        }
    }
}

/// Days logged, compliance rate and streak for each client in `facts`.
/// Facts dated after `today` are ignored.
pub fn summaries_by_client(
    facts: &[LogFact],
    today: Date,
) -> HashMap<ClientId, ComplianceSummary> {
    let mut clients: HashMap<ClientId, ClientAccumulator> = HashMap::new();
    for ((client_id, date), day) in group_by_client_day(facts) {
        if date > today {
            continue;
        }
        let acc = clients.entry(client_id).or_default();
        acc.dates.insert(date);
        acc.statuses.extend(day.statuses);
    }

    clients
        .into_iter()
        .map(|(client_id, acc)| (client_id, acc.summarize(today)))
        .collect()
}

/// Summary for a single client; facts of other clients are ignored.
pub fn compliance_summary(client_id: ClientId, facts: &[LogFact], today: Date) -> ComplianceSummary {
    summaries_by_client(facts, today)
        .remove(&client_id)
        .unwrap_or_default()
}

/// Meal count, mean calories per meal and compliance rate.
pub fn weekly_recap<'a, I>(facts: I) -> WeeklyRecap
where
    I: IntoIterator<Item = &'a LogFact>,
{
    let mut meals = 0u32;
    let mut calories = 0i64;
    let mut statuses = Vec::new();
    for fact in facts {
        meals += 1;
        calories += i64::from(fact.consumed_calories_total.unwrap_or(0));
        statuses.push(fact.compliance_status);
    }
    let average_calories = if meals == 0 {
        0
    } else {
        (calories as f64 / f64::from(meals)).round() as i64
    };
    WeeklyRecap {
        meal_count: meals,
        average_calories,
        compliance_rate: compliance_rate(statuses),
    }
}

pub fn recaps_by_client(facts: &[LogFact]) -> HashMap<ClientId, WeeklyRecap> {
    let mut by_client: HashMap<ClientId, Vec<&LogFact>> = HashMap::new();
    for fact in facts {
        by_client.entry(fact.client_id).or_default().push(fact);
    }
    by_client
        .into_iter()
        .map(|(client_id, facts)| (client_id, weekly_recap(facts)))
        .collect()
}

/// Clients from `client_ids` without any log dated `today`.
pub fn missing_today(client_ids: &[ClientId], facts: &[LogFact], today: Date) -> Vec<ClientId> {
    let logged: BTreeSet<ClientId> = facts
        .iter()
        .filter(|f| f.date == today)
        .map(|f| f.client_id)
        .collect();
    client_ids
        .iter()
        .copied()
        .filter(|id| !logged.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use ComplianceStatus::*;

    fn fact(client_id: Uuid, date: Date, kcal: Option<i32>, status: ComplianceStatus) -> LogFact {
        LogFact {
            client_id,
            date,
            consumed_calories_total: kcal,
            compliance_status: status,
        }
    }

    #[test]
    fn rate_ignores_unknown() {
        assert_eq!(compliance_rate([Met, Met, Under, Unknown]), 67);
        assert_eq!(compliance_rate([Unknown, Unknown]), 0);
        assert_eq!(compliance_rate([]), 0);
        assert_eq!(compliance_rate([Met, Over]), 50);
    }

    #[test]
    fn streak_stops_at_first_gap() {
        let today = date!(2024 - 05 - 10);
        let logged: BTreeSet<Date> = [
            date!(2024 - 05 - 10),
            date!(2024 - 05 - 09),
            date!(2024 - 05 - 08),
            date!(2024 - 05 - 06),
        ]
        .into_iter()
        .collect();
        assert_eq!(streak(&logged, today), 3);
    }

    #[test]
    fn streak_is_zero_without_a_log_today() {
        let logged: BTreeSet<Date> = [date!(2024 - 05 - 09)].into_iter().collect();
        assert_eq!(streak(&logged, date!(2024 - 05 - 10)), 0);
    }

    #[test]
    fn summary_counts_distinct_days() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let today = date!(2024 - 05 - 10);
        let facts = vec![
            fact(me, today, Some(500), Met),
            fact(me, today, Some(300), Under),
            fact(me, date!(2024 - 05 - 09), Some(450), Met),
            fact(me, date!(2024 - 05 - 05), None, Unknown),
            fact(other, today, Some(900), Over),
        ];
        let summary = compliance_summary(me, &facts, today);
        assert_eq!(
            summary,
            ComplianceSummary {
                days_logged: 3,
                compliance_rate: 67,
                streak: 2,
            }
        );
        assert_eq!(compliance_summary(Uuid::new_v4(), &facts, today), ComplianceSummary::default());
    }

    #[test]
    fn future_dated_logs_do_not_count() {
        let me = Uuid::new_v4();
        let today = date!(2024 - 05 - 10);
        let facts = vec![
            fact(me, today, Some(500), Under),
            fact(me, date!(2024 - 05 - 13), Some(500), Met),
        ];
        assert_eq!(
            compliance_summary(me, &facts, today),
            ComplianceSummary {
                days_logged: 1,
                compliance_rate: 0,
                streak: 1,
            }
        );
    }

    #[test]
    fn per_client_summaries_are_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let today = date!(2024 - 05 - 10);
        let facts = vec![
            fact(a, today, Some(500), Met),
            fact(b, date!(2024 - 05 - 09), Some(500), Under),
        ];
        let all = summaries_by_client(&facts, today);
        assert_eq!(all[&a].streak, 1);
        assert_eq!(all[&a].compliance_rate, 100);
        assert_eq!(all[&b].streak, 0);
        assert_eq!(all[&b].compliance_rate, 0);
        assert_eq!(all[&b].days_logged, 1);
    }

    #[test]
    fn weekly_recap_averages_and_rounds() {
        let c = Uuid::new_v4();
        let d = date!(2024 - 05 - 10);
        let facts = vec![
            fact(c, d, Some(500), Met),
            fact(c, d, Some(301), Under),
            fact(c, d, None, Unknown),
        ];
        // (500 + 301 + 0) / 3 = 267
        let recap = weekly_recap(&facts);
        assert_eq!(recap.meal_count, 3);
        assert_eq!(recap.average_calories, 267);
        assert_eq!(recap.compliance_rate, 50);
    }

    #[test]
    fn empty_week_has_zero_average() {
        let recap = weekly_recap(&Vec::<LogFact>::new());
        assert_eq!(recap, WeeklyRecap::default());
    }

    #[test]
    fn recaps_split_by_client() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let d = date!(2024 - 05 - 10);
        let facts = vec![
            fact(a, d, Some(400), Met),
            fact(b, d, Some(1000), Over),
            fact(a, d, Some(600), Met),
        ];
        let recaps = recaps_by_client(&facts);
        assert_eq!(recaps[&a].meal_count, 2);
        assert_eq!(recaps[&a].average_calories, 500);
        assert_eq!(recaps[&b].compliance_rate, 0);
    }

    #[test]
    fn grouping_keys_on_client_and_date() {
        let a = Uuid::new_v4();
        let d = date!(2024 - 05 - 10);
        let facts = vec![
            fact(a, d, Some(400), Met),
            fact(a, d, Some(100), Under),
            fact(a, date!(2024 - 05 - 09), Some(50), Under),
        ];
        let groups = group_by_client_day(&facts);
        assert_eq!(groups.len(), 2);
        let day = &groups[&(a, d)];
        assert_eq!(day.meals, 2);
        assert_eq!(day.calories, 500);
    }

    #[test]
    fn alerts_list_clients_without_todays_log() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let today = date!(2024 - 05 - 10);
        let facts = vec![
            fact(a, today, Some(400), Met),
            fact(b, date!(2024 - 05 - 09), Some(400), Met),
        ];
        assert_eq!(missing_today(&[a, b], &facts, today), vec![b]);
    }
}
