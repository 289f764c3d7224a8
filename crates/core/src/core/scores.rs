//! Best-ten score records per game, stored as one JSON object under a single
//! key.
//!
//! ```json
//! { "quantitative-recall": [ { "score": 30, "level": 3,
//!     "date": "2026-01-02T03:04:05.678Z", "timestamp": 1767323045678 } ] }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::ScoreBackend;
use crate::error::StoreError;

pub const STORAGE_KEY: &str = "gameScores";

/// Records kept per game.
pub const MAX_RECORDS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    #[serde(default)]
    pub level: Option<u32>,
    pub date: String,
    pub timestamp: i64,
}

pub type ScoreBoard = BTreeMap<String, Vec<ScoreRecord>>;

#[derive(Debug)]
pub struct ScoreManager<B> {
    backend: B,
}

impl<B: ScoreBackend> ScoreManager<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Raw per-game entries. Missing or unreadable data is an empty map.
    fn load(&self) -> BTreeMap<String, Value> {
        let Some(raw) = self.backend.read(STORAGE_KEY) else {
            return BTreeMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("ignoring malformed {STORAGE_KEY}: {e}");
                BTreeMap::new()
            }
        }
    }

    /// Records of one game that parse; anything else in the list is skipped.
    fn parse_records(game: &str, entry: &Value) -> Vec<ScoreRecord> {
        let Some(items) = entry.as_array() else {
            warn!(game, "score entry is not a list");
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| match ScoreRecord::deserialize(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(game, "skipping unreadable score record: {e}");
                    None
                }
            })
            .collect()
    }

    /// The whole persisted mapping, minus records that do not parse.
    pub fn board(&self) -> ScoreBoard {
        self.load()
            .iter()
            .map(|(game, entry)| (game.clone(), Self::parse_records(game, entry)))
            .collect()
    }

    pub fn scores(&self, game: &str) -> Vec<ScoreRecord> {
        self.load()
            .get(game)
            .map(|entry| Self::parse_records(game, entry))
            .unwrap_or_default()
    }

    pub fn save_score(
        &mut self,
        game: &str,
        score: u32,
        level: Option<u32>,
    ) -> Result<(), StoreError> {
        self.save_score_at(game, score, level, Utc::now())
    }

    /// Other games' entries are written back untouched, readable or not.
    pub fn save_score_at(
        &mut self,
        game: &str,
        score: u32,
        level: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut entries = self.load();
        let mut records = entries
            .get(game)
            .map(|entry| Self::parse_records(game, entry))
            .unwrap_or_default();
        records.push(ScoreRecord {
            score,
            level,
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            timestamp: now.timestamp_millis(),
        });
        // stable: equal scores keep insertion order
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(MAX_RECORDS);
        entries.insert(game.to_string(), serde_json::to_value(&records)?);

        let encoded = serde_json::to_string(&entries)?;
        self.backend.write(STORAGE_KEY, &encoded)?;
        debug!(game, score, ?level, "score saved");
        Ok(())
    }

    pub fn high_score(&self, game: &str) -> u32 {
        self.scores(game).first().map_or(0, |r| r.score)
    }

    pub fn best_level(&self, game: &str) -> Option<u32> {
        self.scores(game).iter().filter_map(|r| r.level).max()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn manager() -> ScoreManager<MemoryBackend> {
        ScoreManager::new(MemoryBackend::new())
    }

    #[test]
    fn empty_store_reports_zero() {
        let m = manager();
        assert_eq!(m.high_score("symbol-matching"), 0);
        assert_eq!(m.best_level("symbol-matching"), None);
        assert!(m.scores("symbol-matching").is_empty());
    }

    #[test]
    fn malformed_blob_reads_as_empty() {
        let mut backend = MemoryBackend::new();
        backend.insert(STORAGE_KEY, "{not json");
        let mut m = ScoreManager::new(backend);
        assert!(m.board().is_empty());

        m.save_score("sequence-recall", 20, Some(2)).unwrap();
        assert_eq!(m.high_score("sequence-recall"), 20);
    }

    #[test]
    fn record_has_iso_date_and_epoch_millis() {
        let mut m = manager();
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(678);
        m.save_score_at("quantitative-recall", 30, Some(3), now).unwrap();

        let rec = &m.scores("quantitative-recall")[0];
        assert_eq!(rec.date, "2026-01-02T03:04:05.678Z");
        assert_eq!(rec.timestamp, now.timestamp_millis());

        let raw = m.backend().get(STORAGE_KEY).unwrap();
        let v: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(v["quantitative-recall"][0]["score"], 30);
        assert_eq!(v["quantitative-recall"][0]["level"], 3);
    }

    #[test]
    fn keeps_top_ten_descending() {
        let mut m = manager();
        for s in [5, 80, 20, 20, 100, 0, 70, 60, 50, 40, 30, 10] {
            m.save_score("object-association", s, None).unwrap();
        }
        let scores: Vec<u32> = m
            .scores("object-association")
            .iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(scores, vec![100, 80, 70, 60, 50, 40, 30, 20, 20, 10]);
        assert_eq!(m.high_score("object-association"), 100);
    }

    #[test]
    fn games_are_independent_and_best_level_skips_missing() {
        let mut m = manager();
        m.save_score("pattern-completion", 40, Some(4)).unwrap();
        m.save_score("pattern-completion", 90, None).unwrap();
        m.save_score("symbol-matching", 10, Some(7)).unwrap();

        assert_eq!(m.best_level("pattern-completion"), Some(4));
        assert_eq!(m.high_score("pattern-completion"), 90);
        assert_eq!(m.best_level("symbol-matching"), Some(7));
    }

    #[test]
    fn bad_record_does_not_wipe_other_games() {
        let mut backend = MemoryBackend::new();
        backend.insert(
            STORAGE_KEY,
            r#"{"symbol-matching":[{"score":40,"level":4,"date":"d","timestamp":1},
                                   {"score":-5,"level":1,"date":"d","timestamp":2}],
                "sequence-recall":"garbage"}"#,
        );
        let mut m = ScoreManager::new(backend);
        assert_eq!(m.scores("symbol-matching").len(), 1);
        assert_eq!(m.high_score("symbol-matching"), 40);
        assert!(m.scores("sequence-recall").is_empty());

        m.save_score("pattern-completion", 10, Some(1)).unwrap();
        assert_eq!(m.high_score("symbol-matching"), 40);
        assert_eq!(m.high_score("pattern-completion"), 10);

        let raw = m.backend().get(STORAGE_KEY).unwrap();
        let v: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(v["sequence-recall"], "garbage");
        assert_eq!(v["symbol-matching"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn level_may_be_absent_in_stored_json() {
        let mut backend = MemoryBackend::new();
        backend.insert(
            STORAGE_KEY,
            r#"{"symbol-matching":[{"score":15,"date":"2025-05-05T00:00:00.000Z","timestamp":1}]}"#,
        );
        let m = ScoreManager::new(backend);
        assert_eq!(m.high_score("symbol-matching"), 15);
        assert_eq!(m.best_level("symbol-matching"), None);
    }

    proptest! {
        #[test]
        fn saved_lists_stay_bounded_and_sorted(scores in prop::collection::vec(0u32..500, 0..40)) {
            let mut m = manager();
            for s in &scores {
                m.save_score("sequence-recall", *s, Some(1)).unwrap();
            }
            let kept = m.scores("sequence-recall");
            prop_assert!(kept.len() <= MAX_RECORDS);
            prop_assert_eq!(kept.len(), scores.len().min(MAX_RECORDS));
            prop_assert!(kept.windows(2).all(|w| w[0].score >= w[1].score));

            let mut expected = scores.clone();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            let top: Vec<u32> = kept.iter().map(|r| r.score).collect();
            prop_assert_eq!(top, expected.into_iter().take(MAX_RECORDS).collect::<Vec<_>>());
        }
    }
}
