use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NewWeightLog, WeightLog};
use crate::dates::day_of;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeightLogRequest {
    pub client_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub weight_kg: f64,
    pub body_fat_pct: Option<f64>,
}

impl CreateWeightLogRequest {
    pub fn validate(&self) -> Result<NewWeightLog, AppError> {
        if self.weight_kg <= 0.0 {
            return Err(AppError::Validation("weightKg must be positive".into()));
        }
        if let Some(pct) = self.body_fat_pct {
            if !(0.0..=100.0).contains(&pct) {
                return Err(AppError::Validation(
                    "bodyFatPct must be between 0 and 100".into(),
                ));
            }
        }
        Ok(NewWeightLog {
            date: day_of(self.date),
            weight_kg: self.weight_kg,
            body_fat_pct: self.body_fat_pct,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogsResponse {
    pub weight_logs: Vec<WeightLog>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLogResponse {
    pub weight_log: WeightLog,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn req(weight_kg: f64, body_fat_pct: Option<f64>) -> CreateWeightLogRequest {
        CreateWeightLogRequest {
            client_id: None,
            date: datetime!(2024-05-01 23:30 UTC),
            weight_kg,
            body_fat_pct,
        }
    }

    #[test]
    fn accepts_boundaries_and_truncates_the_date() {
        let log = req(72.4, Some(0.0)).validate().unwrap();
        assert_eq!(log.date, date!(2024 - 05 - 01));
        assert!(req(72.4, Some(100.0)).validate().is_ok());
        assert!(req(72.4, None).validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_weight() {
        for w in [0.0, -3.0] {
            assert!(matches!(req(w, None).validate(), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn rejects_body_fat_out_of_range() {
        for pct in [-0.5, 100.5] {
            let err = req(70.0, Some(pct)).validate().unwrap_err();
            assert!(err.to_string().contains("bodyFatPct"));
        }
    }

    #[test]
    fn body_fat_is_optional_on_the_wire() {
        let body: CreateWeightLogRequest =
            serde_json::from_str(r#"{"date":"2024-05-01T08:00:00Z","weightKg":80.5}"#).unwrap();
        assert_eq!(body.body_fat_pct, None);
        assert_eq!(body.weight_kg, 80.5);
    }
}
