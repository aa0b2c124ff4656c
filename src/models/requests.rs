use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::{LoggedWorkoutType, WeightUnit};

/// Request to create an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl SignupRequest {
    pub fn has_missing_fields(&self) -> bool {
        self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request to add a weight entry
///
/// `date` accepts either an RFC 3339 timestamp or a plain `YYYY-MM-DD` day.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeightEntryRequest {
    pub weight: Option<f64>,
    #[serde(default)]
    pub unit: WeightUnit,
    pub date: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntryQuery {
    pub entry_id: Option<Uuid>,
}

/// Request to log a workout for a day
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogRequest {
    pub date: Option<NaiveDate>,
    pub workout_type: Option<LoggedWorkoutType>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    pub exercises: Option<Vec<String>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub intensity: Option<String>,
}

/// Partial update of a logged workout; absent fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogUpdate {
    pub workout_type: Option<LoggedWorkoutType>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
    pub exercises: Option<Vec<String>>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub intensity: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutIdQuery {
    pub workout_id: Option<Uuid>,
}

/// Parse a client supplied date, either a full timestamp or a bare day
pub fn parse_date_input(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Some(timestamp.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|day| day.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_signup_missing_fields() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"name":"Sam","email":"sam@example.com"}"#).unwrap();
        assert!(req.has_missing_fields());

        let req: SignupRequest = serde_json::from_str(
            r#"{"name":"Sam","email":"sam@example.com","password":"secret1","confirmPassword":"secret1"}"#,
        )
        .unwrap();
        assert!(!req.has_missing_fields());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_bad_email() {
        let req = SignupRequest {
            name: "Sam".to_string(),
            email: "not-an-email".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_parse_date_input() {
        let day = parse_date_input("2024-05-01").unwrap();
        assert_eq!((day.year(), day.month(), day.day()), (2024, 5, 1));
        assert_eq!(day.hour(), 0);

        let stamp = parse_date_input("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(stamp.hour(), 8);

        assert!(parse_date_input("yesterday").is_none());
    }

    #[test]
    fn test_workout_log_validation() {
        let req: WorkoutLogRequest =
            serde_json::from_str(r#"{"date":"2024-05-01","duration":0}"#).unwrap();
        assert!(req.validate().is_err());

        let req: WorkoutLogRequest =
            serde_json::from_str(r#"{"date":"2024-05-01","workoutType":"yoga","duration":45}"#)
                .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.workout_type, Some(LoggedWorkoutType::Yoga));
    }
}
