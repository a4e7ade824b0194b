use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::env;

// Returns the directory where the activity DB lives.
// Defaults to a relative "./data" directory.
pub fn get_db_location() -> String {
    env::var("DB_LOCATION").unwrap_or("./data".to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Work,
    Personal,
    Health,
    Education,
    Social,
    #[default]
    Default,
}

/// A planned task on the calendar. Times are 24-hour `HH:MM` strings;
/// `end_time` may be numerically earlier than `start_time` when the
/// activity crosses midnight. Never mutated in place: a change is a
/// delete plus a recreate.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: ActivityKind,
    pub date: NaiveDate,
}

/// An activity parsed out of a model reply, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedActivity {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub kind: ActivityKind,
    pub date: NaiveDate,
}

/// Parses a 24-hour `HH:MM` clock time.
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_clock_times() {
        assert_eq!(
            parse_clock_time("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            parse_clock_time("23:59"),
            NaiveTime::from_hms_opt(23, 59, 0)
        );
    }

    #[test]
    fn rejects_invalid_clock_times() {
        assert_eq!(parse_clock_time("25:00"), None);
        assert_eq!(parse_clock_time("12:60"), None);
        assert_eq!(parse_clock_time("noonish"), None);
        assert_eq!(parse_clock_time(""), None);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let activity = Activity {
            id: "a1".to_string(),
            name: "Gym".to_string(),
            start_time: "18:00".to_string(),
            end_time: "19:00".to_string(),
            description: "Leg day".to_string(),
            kind: ActivityKind::Health,
            date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["startTime"], "18:00");
        assert_eq!(json["endTime"], "19:00");
        assert_eq!(json["type"], "health");
        assert_eq!(json["date"], "2026-02-10");
    }

    #[test]
    fn kind_defaults_when_absent() {
        let json = r#"{"id":"a2","name":"Call","startTime":"09:00","endTime":"09:30","date":"2026-02-10"}"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityKind::Default);
        assert_eq!(activity.description, "");
    }
}
