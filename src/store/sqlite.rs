//! SQLite diary store
//!
//! Persists diary entries in a single `diaries` table. Dates are stored as
//! `YYYY-MM-DD` text so that lexical order equals calendar order, and
//! timestamps as milliseconds since the Unix epoch.
//!
//! Keyword search uses `instr()` rather than `LIKE` because `LIKE` folds
//! ASCII case and the search contract is case-sensitive.

use super::{DiaryFilter, DiaryOrder, DiaryRepository, StorageError, StorageResult};
use crate::diary::{DiaryEntry, DiaryId, NewDiaryRecord, UserId, DIARY_DATE_FORMAT};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, content, emotion, diary_date,
        lat, lon, weather, created_at, updated_at, deleted
     FROM diaries";

/// SQLite-backed implementation of [`DiaryRepository`]
pub struct SqliteDiaryStore {
    /// std Mutex: the connection is !Sync and never held across an await
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteDiaryStore {
    /// Create or open a store at `path`
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Create a throwaway in-memory store
    pub fn in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS diaries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                emotion TEXT NOT NULL,
                diary_date TEXT NOT NULL,
                lat REAL,
                lon REAL,
                weather TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                deleted INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_diaries_user_date ON diaries(user_id, diary_date)",
            [],
        )?;

        tracing::debug!(path = ?path, "Diary store ready");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of physical rows, soft-deleted ones included
    pub fn row_count(&self) -> StorageResult<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM diaries", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> StorageResult<T>) -> StorageResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        f(&conn)
    }
}

#[async_trait]
impl DiaryRepository for SqliteDiaryStore {
    async fn insert(&self, record: NewDiaryRecord) -> StorageResult<DiaryEntry> {
        let now = now_millis();

        let id = self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO diaries
                    (user_id, title, content, emotion, diary_date, lat, lon, weather,
                     created_at, updated_at, deleted)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9, 0)",
                params![
                    record.user_id,
                    record.title,
                    record.content,
                    record.emotion,
                    format_date(record.diary_date),
                    record.lat,
                    record.lon,
                    record.weather,
                    now,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        let created_at = millis_to_datetime(now)?;

        Ok(DiaryEntry {
            id,
            title: record.title,
            content: record.content,
            emotion: record.emotion,
            diary_date: record.diary_date,
            user_id: record.user_id,
            lat: record.lat,
            lon: record.lon,
            weather: record.weather,
            created_at,
            updated_at: created_at,
            deleted: false,
        })
    }

    async fn find_one(
        &self,
        id: DiaryId,
        user_id: UserId,
        exclude_deleted: bool,
    ) -> StorageResult<Option<DiaryEntry>> {
        let sql = if exclude_deleted {
            format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2 AND deleted = 0")
        } else {
            format!("{SELECT_COLUMNS} WHERE id = ?1 AND user_id = ?2")
        };

        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let entry = stmt
                .query_row(params![id, user_id], entry_from_row)
                .optional()?;
            Ok(entry)
        })
    }

    async fn find_many(
        &self,
        user_id: UserId,
        filter: DiaryFilter,
        order: DiaryOrder,
    ) -> StorageResult<Vec<DiaryEntry>> {
        let mut sql = format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND deleted = 0");
        let mut values = vec![Value::Integer(user_id)];

        match filter {
            DiaryFilter::All => {}
            DiaryFilter::Emotion(emotion) => {
                sql.push_str(" AND emotion = ?2");
                values.push(Value::Text(emotion));
            }
            DiaryFilter::Date(date) => {
                sql.push_str(" AND diary_date = ?2");
                values.push(Value::Text(format_date(date)));
            }
            // Every string contains the empty string
            DiaryFilter::Keyword(keyword) if keyword.is_empty() => {}
            DiaryFilter::Keyword(keyword) => {
                sql.push_str(" AND (instr(title, ?2) > 0 OR instr(content, ?2) > 0)");
                values.push(Value::Text(keyword));
            }
        }

        sql.push_str(match order {
            DiaryOrder::DiaryDateDesc => " ORDER BY diary_date DESC, id DESC",
            DiaryOrder::CreatedAtDesc => " ORDER BY created_at DESC, id DESC",
            DiaryOrder::DiaryDateAsc => " ORDER BY diary_date ASC, id ASC",
        });

        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), entry_from_row)?;
            let entries = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
    }

    async fn save(&self, entry: &DiaryEntry) -> StorageResult<DiaryEntry> {
        // Never let updated_at fall behind created_at, even with clock skew
        let updated_at = now_millis().max(entry.created_at.timestamp_millis());

        let changed = self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE diaries
                 SET title = ?1, content = ?2, emotion = ?3, diary_date = ?4,
                     lat = ?5, lon = ?6, weather = ?7, deleted = ?8, updated_at = ?9
                 WHERE id = ?10 AND user_id = ?11",
                params![
                    entry.title,
                    entry.content,
                    entry.emotion,
                    format_date(entry.diary_date),
                    entry.lat,
                    entry.lon,
                    entry.weather,
                    entry.deleted,
                    updated_at,
                    entry.id,
                    entry.user_id,
                ],
            )?;
            Ok(changed)
        })?;

        if changed == 0 {
            return Err(StorageError::MissingRow(entry.id));
        }

        let mut saved = entry.clone();
        saved.updated_at = millis_to_datetime(updated_at)?;
        Ok(saved)
    }

    async fn ping(&self) -> StorageResult<()> {
        self.with_conn(|conn| {
            conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
            Ok(())
        })
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DIARY_DATE_FORMAT).to_string()
}

fn millis_to_datetime(ms: i64) -> StorageResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StorageError::Corruption(format!("timestamp out of range: {}", ms)))
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<DiaryEntry> {
    let diary_date: String = row.get(5)?;
    let diary_date = NaiveDate::parse_from_str(&diary_date, DIARY_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    let created_at = timestamp_column(row, 9)?;
    let updated_at = timestamp_column(row, 10)?;

    Ok(DiaryEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        emotion: row.get(4)?,
        diary_date,
        lat: row.get(6)?,
        lon: row.get(7)?,
        weather: row.get(8)?,
        created_at,
        updated_at,
        deleted: row.get(11)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(idx)?;
    millis_to_datetime(ms)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
