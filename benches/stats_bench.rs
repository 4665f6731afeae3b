//! Benchmarks for diary statistics and keyword search
//!
//! Run with: cargo bench

use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use daybook::diary::{stats, DiaryEntry, NewDiaryRecord};
use daybook::store::{DiaryFilter, DiaryOrder, DiaryRepository, SqliteDiaryStore};
use tempfile::tempdir;

const EMOTIONS: [&str; 5] = ["happy", "calm", "sad", "tired", "excited"];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
}

fn create_test_entries(count: usize) -> Vec<DiaryEntry> {
    let now = Utc::now();
    (0..count)
        .map(|i| DiaryEntry {
            id: i as i64 + 1,
            title: format!("Entry {}", i),
            content: "Went for a walk and wrote this down".to_string(),
            emotion: EMOTIONS[i % EMOTIONS.len()].to_string(),
            diary_date: today() - Duration::days((i / 2) as i64),
            user_id: 1,
            lat: None,
            lon: None,
            weather: None,
            created_at: now,
            updated_at: now,
            deleted: false,
        })
        .collect()
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for size in [100, 1000, 10000] {
        let entries = create_test_entries(size);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("compute_{}", size), |b| {
            b.iter(|| stats::compute(black_box(&entries), today()))
        });

        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.diary_date).collect();

        group.bench_function(format!("streak_{}", size), |b| {
            b.iter(|| stats::current_streak(black_box(dates.iter().copied()), today()))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let dir = tempdir().unwrap();
    let store = SqliteDiaryStore::open(&dir.path().join("bench.db")).unwrap();

    runtime.block_on(async {
        for (i, entry) in create_test_entries(5000).into_iter().enumerate() {
            store
                .insert(NewDiaryRecord {
                    user_id: (i % 2) as i64 + 1,
                    title: entry.title,
                    content: entry.content,
                    emotion: entry.emotion,
                    diary_date: entry.diary_date,
                    lat: None,
                    lon: None,
                    weather: None,
                })
                .await
                .unwrap();
        }
    });

    group.bench_function("keyword_5000", |b| {
        b.iter(|| {
            runtime
                .block_on(store.find_many(
                    1,
                    DiaryFilter::Keyword(black_box("walk".to_string())),
                    DiaryOrder::DiaryDateDesc,
                ))
                .unwrap()
        })
    });

    group.bench_function("emotion_5000", |b| {
        b.iter(|| {
            runtime
                .block_on(store.find_many(
                    1,
                    DiaryFilter::Emotion(black_box("calm".to_string())),
                    DiaryOrder::DiaryDateDesc,
                ))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_stats, bench_search);
criterion_main!(benches);
