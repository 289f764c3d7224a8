use mindplay_games::RoundStats;
use serde::Serialize;

/// Level and score carried across rounds until restart.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub level: u32,
    pub score: u32,
    pub stats: RoundStats,
}

impl Session {
    pub fn new() -> Self {
        Self {
            level: 1,
            score: 0,
            stats: RoundStats::new(),
        }
    }

    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn advance(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    pub fn record(&mut self, correct: bool, timed_out: bool) {
        self.stats.record_round(correct, timed_out);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
