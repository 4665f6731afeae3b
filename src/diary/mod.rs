//! Daybook Diary Core
//!
//! This module holds the diary analytics and retrieval engine:
//!
//! - **types**: Entries, requests and the statistics report
//! - **validation**: Field constraints shared by create and update
//! - **service**: Owner-scoped lifecycle, queries and statistics
//! - **stats**: Pure aggregation (streaks, emotion histograms, monthly trend)
//! - **error**: Error types
//!
//! # Example
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
//!     let user_id = 1;
//!     diaries
//!         .create(user_id, CreateDiary::new("First day", "Bought a notebook", "happy", "2024-05-01"))
//!         .await?;
//!
//!     let report = diaries.stats(user_id).await?;
//!     println!("{} entries, streak {}", report.total_diaries, report.current_streak);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod service;
pub mod stats;
pub mod types;
pub mod validation;

pub use error::{DiaryError, DiaryResult, FieldError, ValidationErrors};
pub use service::DiaryService;
pub use types::{
    CreateDiary, DiaryEntry, DiaryId, EmotionCount, MonthlyTrend, NewDiaryRecord, StatsReport,
    UpdateDiary, UserId, DIARY_DATE_FORMAT,
};
pub use validation::parse_diary_date;
