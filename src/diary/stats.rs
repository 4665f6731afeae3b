//! Statistics Engine
//!
//! Computes a [`StatsReport`] from a snapshot of one owner's visible entries.
//! Pure: the caller supplies both the entries (ascending by diary date) and
//! the calendar date to treat as "today", so results are reproducible.
//!
//! # Ordering
//!
//! Emotion and month buckets keep first-occurrence order. With ascending
//! input that means months come out oldest first, and emotions in the order
//! they were first written about. The most frequent emotion is chosen by a
//! strictly-greater scan, so on a tie the earlier bucket wins.
//!
//! # Streak
//!
//! ```text
//! distinct dates, newest first:  05-03  05-02  05-01  04-28
//! today = 05-03                    1  →  2  →  3   ✗ gap, stop
//! ```
//!
//! The run only counts if the newest date is today or yesterday.

use super::types::{DiaryEntry, EmotionCount, MonthlyTrend, StatsReport};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

/// Compute the full report for `entries` as of `today`
pub fn compute(entries: &[DiaryEntry], today: NaiveDate) -> StatsReport {
    let mut overall = EmotionHistogram::default();
    let mut months: Vec<(String, EmotionHistogram)> = Vec::new();
    let mut month_index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        overall.record(&entry.emotion);

        let key = entry.month_key();
        let idx = match month_index.get(&key) {
            Some(&idx) => idx,
            None => {
                month_index.insert(key.clone(), months.len());
                months.push((key, EmotionHistogram::default()));
                months.len() - 1
            }
        };
        months[idx].1.record(&entry.emotion);
    }

    let most_frequent_emotion = overall.most_frequent().map(str::to_string);

    StatsReport {
        total_diaries: entries.len(),
        current_streak: current_streak(entries.iter().map(|e| e.diary_date), today),
        this_month_count: this_month_count(entries, today),
        emotion_counts: overall.into_counts(),
        monthly_trend: months
            .into_iter()
            .map(|(month, histogram)| MonthlyTrend {
                month,
                emotions: histogram.into_counts(),
            })
            .collect(),
        most_frequent_emotion,
    }
}

/// Length of the run of consecutive days ending today or yesterday
///
/// Several entries on one date count once.
pub fn current_streak(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let mut days: Vec<NaiveDate> = dates.into_iter().collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(&latest) = days.first() else {
        return 0;
    };

    if latest != today && Some(latest) != today.pred_opt() {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2) {
        if pair[0].pred_opt() == Some(pair[1]) {
            streak += 1;
        } else {
            break;
        }
    }

    streak
}

/// Entries whose diary date falls in the calendar month of `today`
pub fn this_month_count(entries: &[DiaryEntry], today: NaiveDate) -> usize {
    entries
        .iter()
        .filter(|e| e.diary_date.year() == today.year() && e.diary_date.month() == today.month())
        .count()
}

/// Emotion counts in first-occurrence order
#[derive(Debug, Default)]
struct EmotionHistogram {
    counts: Vec<EmotionCount>,
    index: HashMap<String, usize>,
}

impl EmotionHistogram {
    fn record(&mut self, emotion: &str) {
        match self.index.get(emotion) {
            Some(&idx) => self.counts[idx].count += 1,
            None => {
                self.index.insert(emotion.to_string(), self.counts.len());
                self.counts.push(EmotionCount {
                    emotion: emotion.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn most_frequent(&self) -> Option<&str> {
        let mut best: Option<&EmotionCount> = None;
        for candidate in &self.counts {
            match best {
                Some(current) if candidate.count <= current.count => {}
                _ => best = Some(candidate),
            }
        }
        best.map(|c| c.emotion.as_str())
    }

    fn into_counts(self) -> Vec<EmotionCount> {
        self.counts
    }
}
