//! Weather Enrichment
//!
//! Diary entries created with coordinates get a coarse weather condition
//! attached. The lookup sits behind [`WeatherProvider`] so the creation path
//! never depends on a live HTTP service:
//!
//! - **OpenMeteoClient**: queries the Open-Meteo forecast API
//! - **classify_code**: maps WMO weather codes to condition strings
//!
//! Providers never fail the caller; any problem degrades to
//! [`UNKNOWN_CONDITION`].

mod client;

pub use client::{OpenMeteoClient, WeatherConfig, WeatherError};

use async_trait::async_trait;

/// Condition reported when the lookup fails
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Resolves coordinates to a weather condition string
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current condition at the coordinates, or [`UNKNOWN_CONDITION`]
    async fn classify(&self, lat: f64, lon: f64) -> String;
}

/// Map a WMO weather code to a condition
pub fn classify_code(code: i64) -> &'static str {
    match code {
        0 => "Clear sky",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        61 | 63 | 65 => "Rain",
        71 | 73 | 75 => "Snow",
        95 | 96 | 99 => "Thunderstorm",
        _ => "Cloudy",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_code() {
        assert_eq!(classify_code(0), "Clear sky");
        assert_eq!(classify_code(2), "Partly cloudy");
        assert_eq!(classify_code(48), "Fog");
        assert_eq!(classify_code(53), "Drizzle");
        assert_eq!(classify_code(65), "Rain");
        assert_eq!(classify_code(71), "Snow");
        assert_eq!(classify_code(99), "Thunderstorm");
    }

    #[test]
    fn test_unlisted_codes_are_cloudy() {
        // Freezing drizzle, showers and odd intensities are not broken out
        for code in [56, 57, 62, 80, 81, 85, 97, -1] {
            assert_eq!(classify_code(code), "Cloudy", "code {code}");
        }
    }
}
