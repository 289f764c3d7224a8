use serde::Serialize;

/// Outcomes kept for the rolling rate.
const RECENT_WINDOW: usize = 50;

/// Per-session round tally. Cleared on restart along with level and score.
#[derive(Debug, Clone, Serialize)]
pub struct RoundStats {
    pub rounds: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub timeouts: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub recent: Vec<bool>,
}

impl RoundStats {
    pub fn new() -> Self {
        Self {
            rounds: 0,
            correct: 0,
            incorrect: 0,
            timeouts: 0,
            streak: 0,
            best_streak: 0,
            recent: Vec::with_capacity(RECENT_WINDOW),
        }
    }

    pub fn record_round(&mut self, is_correct: bool, timed_out: bool) {
        self.rounds += 1;
        if is_correct {
            self.correct += 1;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }
        if timed_out {
            self.timeouts += 1;
        }

        self.recent.push(is_correct);
        if self.recent.len() > RECENT_WINDOW {
            self.recent.remove(0);
        }
    }

    /// Fraction of rounds answered correctly; 0 before the first round.
    pub fn accuracy(&self) -> f32 {
        if self.rounds == 0 {
            0.0
        } else {
            self.correct as f32 / self.rounds as f32
        }
    }

    pub fn recent_rate(&self) -> f32 {
        if self.recent.is_empty() {
            return 0.0;
        }
        let hits = self.recent.iter().filter(|&&x| x).count();
        hits as f32 / self.recent.len() as f32
    }
}

impl Default for RoundStats {
    fn default() -> Self {
        Self::new()
    }
}
