//! Data Transfer Objects
//!
//! Request and response types for the API endpoints that are not diary
//! records themselves. Diary bodies use [`crate::diary::CreateDiary`],
//! [`crate::diary::UpdateDiary`] and [`crate::diary::DiaryEntry`] directly.

use serde::{Deserialize, Serialize};

// ============================================
// DIARY QUERY DTOs
// ============================================

/// Keyword search parameters
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Substring to look for in title or content (case-sensitive)
    #[serde(default)]
    pub keyword: String,
}

// ============================================
// PROFILE DTOs
// ============================================

/// Identity of the authenticated caller
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: i64,
}

// ============================================
// WEATHER DTOs
// ============================================

/// Weather lookup parameters
#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub lat: f64,
    pub lon: f64,
}

/// Weather lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub lat: f64,
    pub lon: f64,
    pub condition: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Storage status
    pub storage: String,
    /// Weather lookup: enabled, disabled
    pub weather: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
