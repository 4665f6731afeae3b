//! # Daybook
//!
//! Personal journaling backend: authenticated users record dated diary
//! entries tagged with an emotion, optionally enriched with the weather at
//! the place they were written, and get streak and mood statistics back.
//!
//! ## Modules
//!
//! - [`diary`]: Entry types, validation, lifecycle service and statistics
//! - [`store`]: Owner-scoped persistence with a SQLite backend
//! - [`weather`]: Coordinate to weather condition lookup
//! - [`auth`]: Bearer token to user id resolution
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daybook::diary::{CreateDiary, DiaryService};
//! use daybook::store::SqliteDiaryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteDiaryStore::in_memory()?);
//!     let diaries = DiaryService::new(store);
//!
//!     let entry = diaries
//!         .create(1, CreateDiary::new("Morning", "Coffee on the balcony", "calm", "2024-05-01"))
//!         .await?;
//!
//!     let stats = diaries.stats(1).await?;
//!     println!("{} entries, streak {}", stats.total_diaries, stats.current_streak);
//!     println!("created #{}", entry.id);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod diary;
pub mod store;
pub mod weather;

// Re-export top-level types for convenience
pub use diary::{
    CreateDiary, DiaryEntry, DiaryError, DiaryResult, DiaryService, StatsReport, UpdateDiary,
};

pub use store::{DiaryFilter, DiaryOrder, DiaryRepository, SqliteDiaryStore, StorageError};

pub use weather::{OpenMeteoClient, WeatherConfig, WeatherProvider};

pub use auth::{AuthError, IdentityProvider, StaticTokenProvider};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};
