//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::auth::IdentityProvider;
use crate::config::ApiConfig;
use crate::diary::DiaryService;
use crate::weather::WeatherProvider;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Diary lifecycle, queries and statistics
    pub diaries: DiaryService,
    /// Resolves bearer tokens to user ids
    pub identity: Arc<dyn IdentityProvider>,
    /// Weather lookup for the standalone endpoint (optional)
    pub weather: Option<Arc<dyn WeatherProvider>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState without weather lookup
    pub fn new(
        diaries: DiaryService,
        identity: Arc<dyn IdentityProvider>,
        config: ApiConfig,
    ) -> Self {
        Self {
            diaries,
            identity,
            weather: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Attach a weather provider for `GET /api/v1/weather`
    pub fn with_weather(mut self, weather: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if weather lookup is available
    pub fn has_weather(&self) -> bool {
        self.weather.is_some()
    }
}
