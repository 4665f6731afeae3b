//! Diary Service
//!
//! Owner-scoped lifecycle (create / get / update / remove), queries
//! (list / search / filter) and statistics over a [`DiaryRepository`].
//!
//! Every method takes the authenticated user id and never returns, mutates
//! or counts another user's entries. An entry that is missing, soft-deleted
//! or owned by someone else produces the same [`DiaryError::NotFound`].

use super::error::{DiaryError, DiaryResult};
use super::stats;
use super::types::{
    CreateDiary, DiaryEntry, DiaryId, NewDiaryRecord, StatsReport, UpdateDiary, UserId,
};
use super::validation::{validate_create, validate_update};
use crate::store::{DiaryFilter, DiaryOrder, DiaryRepository};
use crate::weather::WeatherProvider;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Diary lifecycle, query and statistics operations
#[derive(Clone)]
pub struct DiaryService {
    repo: Arc<dyn DiaryRepository>,
    /// Optional enrichment; `None` keeps caller-supplied weather as-is
    weather: Option<Arc<dyn WeatherProvider>>,
}

impl DiaryService {
    /// Create a service without weather enrichment
    pub fn new(repo: Arc<dyn DiaryRepository>) -> Self {
        Self {
            repo,
            weather: None,
        }
    }

    /// Create a service that looks up weather for entries with coordinates
    pub fn with_weather(repo: Arc<dyn DiaryRepository>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self {
            repo,
            weather: Some(weather),
        }
    }

    /// Underlying repository
    pub fn repository(&self) -> &Arc<dyn DiaryRepository> {
        &self.repo
    }

    // ==================== Lifecycle ====================

    /// Validate and persist a new entry
    pub async fn create(&self, user_id: UserId, req: CreateDiary) -> DiaryResult<DiaryEntry> {
        let diary_date = validate_create(&req)?;

        let weather = match (req.lat, req.lon, &self.weather) {
            (Some(lat), Some(lon), Some(provider)) => Some(provider.classify(lat, lon).await),
            _ => req.weather,
        };

        let record = NewDiaryRecord {
            user_id,
            title: req.title,
            content: req.content,
            emotion: req.emotion,
            diary_date,
            lat: req.lat,
            lon: req.lon,
            weather,
        };

        let entry = self.repo.insert(record).await?;

        tracing::info!(
            user_id,
            diary_id = entry.id,
            diary_date = %entry.diary_date,
            emotion = %entry.emotion,
            "Created diary"
        );

        Ok(entry)
    }

    /// Fetch one visible entry owned by `user_id`
    pub async fn get(&self, id: DiaryId, user_id: UserId) -> DiaryResult<DiaryEntry> {
        self.repo
            .find_one(id, user_id, true)
            .await?
            .ok_or(DiaryError::NotFound(id))
    }

    /// Apply the fields present in `req` to an existing entry
    pub async fn update(
        &self,
        id: DiaryId,
        user_id: UserId,
        req: UpdateDiary,
    ) -> DiaryResult<DiaryEntry> {
        let mut entry = self.get(id, user_id).await?;
        let diary_date = validate_update(&req)?;

        if let Some(title) = req.title {
            entry.title = title;
        }
        if let Some(content) = req.content {
            entry.content = content;
        }
        if let Some(emotion) = req.emotion {
            entry.emotion = emotion;
        }
        if let Some(date) = diary_date {
            entry.diary_date = date;
        }
        if let Some(lat) = req.lat {
            entry.lat = Some(lat);
        }
        if let Some(lon) = req.lon {
            entry.lon = Some(lon);
        }
        if let Some(weather) = req.weather {
            entry.weather = Some(weather);
        }

        let saved = self.repo.save(&entry).await?;
        tracing::info!(user_id, diary_id = id, "Updated diary");
        Ok(saved)
    }

    /// Soft-delete an entry; it stays in storage but disappears from every read
    pub async fn remove(&self, id: DiaryId, user_id: UserId) -> DiaryResult<()> {
        let mut entry = self.get(id, user_id).await?;
        entry.deleted = true;
        self.repo.save(&entry).await?;

        tracing::info!(user_id, diary_id = id, "Soft-deleted diary");
        Ok(())
    }

    // ==================== Queries ====================

    /// All visible entries, newest diary date first
    pub async fn list_all(&self, user_id: UserId) -> DiaryResult<Vec<DiaryEntry>> {
        self.find(user_id, DiaryFilter::All, DiaryOrder::DiaryDateDesc)
            .await
    }

    /// Entries whose title or content contains `keyword` (case-sensitive)
    pub async fn search(&self, user_id: UserId, keyword: &str) -> DiaryResult<Vec<DiaryEntry>> {
        let entries = self
            .find(
                user_id,
                DiaryFilter::Keyword(keyword.to_string()),
                DiaryOrder::DiaryDateDesc,
            )
            .await?;

        tracing::debug!(user_id, keyword, hits = entries.len(), "Searched diaries");
        Ok(entries)
    }

    /// Entries with exactly this emotion label, newest diary date first
    pub async fn filter_by_emotion(
        &self,
        user_id: UserId,
        emotion: &str,
    ) -> DiaryResult<Vec<DiaryEntry>> {
        self.find(
            user_id,
            DiaryFilter::Emotion(emotion.to_string()),
            DiaryOrder::DiaryDateDesc,
        )
        .await
    }

    /// Entries about exactly this day, most recently created first
    pub async fn filter_by_date(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> DiaryResult<Vec<DiaryEntry>> {
        self.find(user_id, DiaryFilter::Date(date), DiaryOrder::CreatedAtDesc)
            .await
    }

    async fn find(
        &self,
        user_id: UserId,
        filter: DiaryFilter,
        order: DiaryOrder,
    ) -> DiaryResult<Vec<DiaryEntry>> {
        Ok(self.repo.find_many(user_id, filter, order).await?)
    }

    // ==================== Statistics ====================

    /// Statistics as of the local calendar date
    pub async fn stats(&self, user_id: UserId) -> DiaryResult<StatsReport> {
        self.stats_on(user_id, Local::now().date_naive()).await
    }

    /// Statistics as of an explicit "today"
    pub async fn stats_on(&self, user_id: UserId, today: NaiveDate) -> DiaryResult<StatsReport> {
        let entries = self
            .find(user_id, DiaryFilter::All, DiaryOrder::DiaryDateAsc)
            .await?;
        let report = stats::compute(&entries, today);

        tracing::debug!(
            user_id,
            total = report.total_diaries,
            streak = report.current_streak,
            "Computed diary stats"
        );

        Ok(report)
    }
}
