//! Core data types for diary entries
//!
//! This module defines the records that flow between the API, the
//! lifecycle service and the store:
//! - `DiaryEntry`: A persisted, owner-scoped diary entry
//! - `CreateDiary` / `UpdateDiary`: Caller input, validated before use
//! - `NewDiaryRecord`: A validated entry ready for insertion
//! - `StatsReport`: Aggregate analytics over one owner's entries

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of an authenticated user
pub type UserId = i64;

/// Identifier assigned to a diary entry by the store
pub type DiaryId = i64;

/// Date format used for `diaryDate` on the wire and in storage
pub const DIARY_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single diary entry
///
/// `diary_date` is the day the entry is about, chosen by the user; it is
/// unrelated to `created_at`. Soft-deleted entries keep their row but are
/// never returned by any read path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: DiaryId,
    pub title: String,
    pub content: String,
    pub emotion: String,
    pub diary_date: NaiveDate,
    pub user_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted: bool,
}

impl DiaryEntry {
    /// Month key (`YYYY-MM`) derived from the diary date
    pub fn month_key(&self) -> String {
        self.diary_date.format("%Y-%m").to_string()
    }
}

/// Request to create a diary entry
///
/// Fields are kept as raw strings so that every violated constraint can be
/// reported together instead of failing at the first deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateDiary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub diary_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

impl CreateDiary {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        emotion: impl Into<String>,
        diary_date: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            emotion: emotion.into(),
            diary_date: diary_date.into(),
            ..Default::default()
        }
    }

    /// Builder method: attach coordinates for weather enrichment
    pub fn at(mut self, lat: f64, lon: f64) -> Self {
        self.lat = Some(lat);
        self.lon = Some(lon);
        self
    }
}

/// Partial update of a diary entry; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateDiary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diary_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

impl UpdateDiary {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.emotion.is_none()
            && self.diary_date.is_none()
            && self.lat.is_none()
            && self.lon.is_none()
            && self.weather.is_none()
    }
}

/// A validated entry ready to be inserted; the store assigns id and timestamps
#[derive(Debug, Clone, PartialEq)]
pub struct NewDiaryRecord {
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub emotion: String,
    pub diary_date: NaiveDate,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub weather: Option<String>,
}

/// Number of entries carrying one emotion label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCount {
    pub emotion: String,
    pub count: usize,
}

/// Emotion histogram for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub emotions: Vec<EmotionCount>,
}

/// Aggregate analytics over one owner's visible entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_diaries: usize,
    pub current_streak: u32,
    pub this_month_count: usize,
    pub emotion_counts: Vec<EmotionCount>,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub most_frequent_emotion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> DiaryEntry {
        let now = Utc::now();
        DiaryEntry {
            id: 7,
            title: "Morning walk".to_string(),
            content: "Saw the river fog lift".to_string(),
            emotion: "calm".to_string(),
            diary_date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            user_id: 1,
            lat: None,
            lon: None,
            weather: Some("Fog".to_string()),
            created_at: now,
            updated_at: now,
            deleted: false,
        }
    }

    #[test]
    fn test_month_key_is_zero_padded() {
        assert_eq!(sample_entry().month_key(), "2024-03");
    }

    #[test]
    fn test_entry_serializes_camel_case_without_deleted_flag() {
        let json = serde_json::to_value(sample_entry()).unwrap();
        assert_eq!(json["diaryDate"], "2024-03-09");
        assert_eq!(json["userId"], 1);
        assert_eq!(json["weather"], "Fog");
        assert!(json.get("deleted").is_none());
        assert!(json.get("lat").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let ok: Result<CreateDiary, _> = serde_json::from_str(
            r#"{"title":"t","content":"c","emotion":"happy","diaryDate":"2024-01-01"}"#,
        );
        assert!(ok.is_ok());

        let extra: Result<CreateDiary, _> =
            serde_json::from_str(r#"{"title":"t","userId":99}"#);
        assert!(extra.is_err());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateDiary::default().is_empty());
        let update = UpdateDiary {
            emotion: Some("sad".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
