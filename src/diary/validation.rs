//! Field constraints for diary input
//!
//! Create and update share the same per-field rules; update only checks the
//! fields that are present. Lengths are counted in characters, not bytes.

use super::error::{DiaryError, DiaryResult, ValidationErrors};
use super::types::{CreateDiary, UpdateDiary, DIARY_DATE_FORMAT};
use chrono::NaiveDate;

pub const TITLE_MAX_CHARS: usize = 100;
pub const EMOTION_MAX_CHARS: usize = 20;

/// Validate a create request, returning the parsed diary date
pub fn validate_create(req: &CreateDiary) -> DiaryResult<NaiveDate> {
    let mut errors = ValidationErrors::new();

    check_title(&req.title, &mut errors);
    check_content(&req.content, &mut errors);
    check_emotion(&req.emotion, &mut errors);
    let date = parse_date_field(&req.diary_date, &mut errors);
    check_coordinates(req.lat, req.lon, &mut errors);

    errors.into_result()?;
    date.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add("diaryDate", "diaryDate is required");
        DiaryError::Validation(errors)
    })
}

/// Validate the fields present in an update, returning the parsed date if one was given
pub fn validate_update(req: &UpdateDiary) -> DiaryResult<Option<NaiveDate>> {
    let mut errors = ValidationErrors::new();

    if let Some(title) = &req.title {
        check_title(title, &mut errors);
    }
    if let Some(content) = &req.content {
        check_content(content, &mut errors);
    }
    if let Some(emotion) = &req.emotion {
        check_emotion(emotion, &mut errors);
    }
    let date = req
        .diary_date
        .as_deref()
        .and_then(|raw| parse_date_field(raw, &mut errors));
    check_coordinates(req.lat, req.lon, &mut errors);

    errors.into_result()?;
    Ok(date)
}

/// Parse a `YYYY-MM-DD` calendar date; surrounding whitespace is rejected
pub fn parse_diary_date(raw: &str) -> Option<NaiveDate> {
    if raw.chars().any(char::is_whitespace) {
        return None;
    }
    NaiveDate::parse_from_str(raw, DIARY_DATE_FORMAT).ok()
}

fn check_title(title: &str, errors: &mut ValidationErrors) {
    check_length("title", title, TITLE_MAX_CHARS, errors);
}

fn check_content(content: &str, errors: &mut ValidationErrors) {
    if content.is_empty() {
        errors.add("content", "content is required");
    }
}

fn check_emotion(emotion: &str, errors: &mut ValidationErrors) {
    check_length("emotion", emotion, EMOTION_MAX_CHARS, errors);
}

fn check_length(field: &'static str, value: &str, max: usize, errors: &mut ValidationErrors) {
    if value.is_empty() {
        errors.add(field, format!("{} is required", field));
        return;
    }

    let chars = value.chars().count();
    if chars > max {
        errors.add(
            field,
            format!("{} must be between 1 and {} characters (got {})", field, max, chars),
        );
    }
}

fn parse_date_field(raw: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    if raw.is_empty() {
        errors.add("diaryDate", "diaryDate is required");
        return None;
    }

    let date = parse_diary_date(raw);
    if date.is_none() {
        errors.add("diaryDate", "diaryDate must be a valid date (YYYY-MM-DD)");
    }
    date
}

/// Range and finiteness checks for whichever coordinates are present
pub(crate) fn check_coordinates(lat: Option<f64>, lon: Option<f64>, errors: &mut ValidationErrors) {
    if let Some(lat) = lat {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            errors.add("lat", "lat must be between -90 and 90");
        }
    }
    if let Some(lon) = lon {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            errors.add("lon", "lon must be between -180 and 180");
        }
    }
}
