//! Round lifecycle shared by every variant.
//!
//! ```text
//! instruction -> showing -> hidden -> {matching|recall|question} -> results
//! instruction -> playing -> results
//! results -> instruction | playing | completed
//! ```
//!
//! Timed transitions are driven by the host: after every call, check
//! [`Engine::pending_timer`] and call [`Engine::fire`] with its id once its
//! delay has elapsed.

use std::fmt;

use mindplay_games::sequence_recall::SeqItem;
use mindplay_games::{
    scaling, Challenge, GameId, Input, Instructions, Progress, ResponseKind, RoundStats, Stimulus,
    VariantDescriptor,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::ScoreBackend;
use crate::error::{EngineError, EngineResult};
use crate::scores::ScoreManager;
use crate::session::Session;
use crate::timer::{Timer, TimerId, TimerKind, TimerSlot};

pub const POINTS_PER_CORRECT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Instruction,
    Showing,
    Hidden,
    Matching,
    Recall,
    Question,
    Playing,
    Results,
    Completed,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Instruction => "instruction",
            Phase::Showing => "showing",
            Phase::Hidden => "hidden",
            Phase::Matching => "matching",
            Phase::Recall => "recall",
            Phase::Question => "question",
            Phase::Playing => "playing",
            Phase::Results => "results",
            Phase::Completed => "completed",
        }
    }

    /// Phases in which answers are accepted.
    pub fn is_response(self) -> bool {
        matches!(
            self,
            Phase::Matching | Phase::Recall | Phase::Question | Phase::Playing
        )
    }

    fn response(kind: ResponseKind) -> Self {
        match kind {
            ResponseKind::Matching => Phase::Matching,
            ResponseKind::Recall => Phase::Recall,
            ResponseKind::Question => Phase::Question,
            ResponseKind::Playing => Phase::Playing,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Round {
    pub level: u32,
    pub challenge: Challenge,
    pub display_seconds: u32,
    /// Seconds left on the reveal or response countdown.
    pub remaining: u32,
    /// Points earned so far in this round.
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub correct: bool,
    pub timed_out: bool,
    pub level: u32,
    pub points: u32,
}

/// Result of [`Engine::fire`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fired {
    /// The id was cancelled or superseded; nothing changed.
    Stale,
    Applied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerView {
    pub id: TimerId,
    pub kind: TimerKind,
    pub after_ms: u64,
}

impl From<Timer> for TimerView {
    fn from(t: Timer) -> Self {
        Self {
            id: t.id,
            kind: t.kind,
            after_ms: t.after.as_millis() as u64,
        }
    }
}

/// Everything a presentation layer needs to draw the current screen.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub game: GameId,
    pub name: &'static str,
    pub phase: Phase,
    pub embed: bool,
    pub level: u32,
    pub score: u32,
    pub remaining: Option<u32>,
    pub display_seconds: Option<u32>,
    /// Whether the stimulus itself may be shown right now.
    pub stimulus_visible: bool,
    pub challenge: Option<Challenge>,
    /// Selectable items while rebuilding a sequence.
    pub palette: Option<Vec<SeqItem>>,
    pub last_outcome: Option<Outcome>,
    pub stats: RoundStats,
    pub high_score: u32,
    pub best_level: Option<u32>,
    pub instructions: Instructions,
    pub timer: Option<TimerView>,
}

pub struct Engine<B> {
    descriptor: &'static VariantDescriptor,
    embed: bool,
    phase: Phase,
    session: Session,
    round: Option<Round>,
    last_outcome: Option<Outcome>,
    /// Completion already wrote the final score.
    saved: bool,
    timers: TimerSlot,
    scores: ScoreManager<B>,
    rng: StdRng,
}

impl<B: ScoreBackend> Engine<B> {
    pub fn new(game: GameId, backend: B) -> Self {
        Self::with_rng(game, backend, StdRng::from_entropy())
    }

    pub fn with_rng(game: GameId, backend: B, rng: StdRng) -> Self {
        Self {
            descriptor: game.descriptor(),
            embed: false,
            phase: Phase::Instruction,
            session: Session::new(),
            round: None,
            last_outcome: None,
            saved: false,
            timers: TimerSlot::default(),
            scores: ScoreManager::new(backend),
            rng,
        }
    }

    pub fn with_embed(mut self, embed: bool) -> Self {
        self.embed = embed;
        self
    }

    pub fn game(&self) -> GameId {
        self.descriptor.game
    }

    pub fn descriptor(&self) -> &'static VariantDescriptor {
        self.descriptor
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn scores(&self) -> &ScoreManager<B> {
        &self.scores
    }

    pub fn embed(&self) -> bool {
        self.embed
    }

    /// The timer the host should fire next, if any.
    pub fn pending_timer(&self) -> Option<Timer> {
        self.timers.active()
    }

    pub fn start(&mut self) -> EngineResult<()> {
        self.expect_phase("start", Phase::Instruction)?;
        self.begin_round();
        Ok(())
    }

    pub fn input(&mut self, input: Input) -> EngineResult<Progress> {
        if !self.phase.is_response() {
            return Err(EngineError::WrongPhase {
                action: "input",
                phase: self.phase,
            });
        }
        let Some(round) = self.round.as_mut() else {
            return Err(EngineError::WrongPhase {
                action: "input",
                phase: self.phase,
            });
        };

        let progress = round.challenge.apply(input, &mut self.rng)?;
        match progress {
            Progress::Ignored | Progress::Pending => {}
            Progress::Scored => {
                round.points += POINTS_PER_CORRECT;
                self.session.award(POINTS_PER_CORRECT);
            }
            Progress::Finished { correct } => {
                if correct {
                    round.points += POINTS_PER_CORRECT;
                    self.session.award(POINTS_PER_CORRECT);
                }
                self.finish_round(correct, false);
            }
        }
        Ok(progress)
    }

    /// Deliver an elapsed timer. Ids that are no longer armed are ignored.
    pub fn fire(&mut self, id: TimerId) -> Fired {
        let Some(timer) = self.timers.take(id) else {
            debug!(id = id.get(), "ignoring stale timer");
            return Fired::Stale;
        };

        match (self.phase, timer.kind) {
            (Phase::Showing, TimerKind::Countdown) => {
                if self.tick() == 0 {
                    self.phase = Phase::Hidden;
                    self.timers.arm(TimerKind::Grace);
                } else {
                    self.timers.arm(TimerKind::Countdown);
                }
            }
            (Phase::Hidden, TimerKind::Grace) => self.open_response(),
            (phase, TimerKind::Countdown) if phase.is_response() => {
                if self.tick() == 0 {
                    info!(game = %self.game(), "response window expired");
                    self.finish_round(false, true);
                } else {
                    self.timers.arm(TimerKind::Countdown);
                }
            }
            (phase, kind) => {
                warn!(%phase, ?kind, "timer fired in a phase that does not use it");
                return Fired::Stale;
            }
        }
        Fired::Applied
    }

    pub fn next(&mut self) -> EngineResult<()> {
        self.expect_phase("next", Phase::Results)?;
        let correct = self.last_outcome.is_some_and(|o| o.correct);

        if correct {
            if let Some(final_level) = self.descriptor.final_level {
                if self.session.level >= final_level {
                    self.complete(final_level);
                    return Ok(());
                }
            }
            self.session.advance();
        }

        if self.descriptor.next_skips_instruction {
            self.begin_round();
        } else {
            self.round = None;
            self.phase = Phase::Instruction;
        }
        Ok(())
    }

    /// Back to level 1 with a zero score, saving progress first.
    pub fn restart(&mut self) {
        self.persist_progress();
        self.reset();
        info!(game = %self.game(), "session restarted");
    }

    /// Leave the game. The session is saved and reset; the host is expected to
    /// drop or park the engine afterwards.
    pub fn home(&mut self) {
        self.persist_progress();
        self.reset();
        info!(game = %self.game(), "left for home");
    }

    pub fn snapshot(&self) -> Snapshot {
        let game = self.game().as_str();
        let remaining = match self.phase {
            Phase::Showing => self.round.as_ref().map(|r| r.remaining),
            p if p.is_response() && self.descriptor.response_timeout_secs.is_some() => {
                self.round.as_ref().map(|r| r.remaining)
            }
            _ => None,
        };
        let stimulus_visible = match self.phase {
            Phase::Showing | Phase::Results => true,
            p if p.is_response() => !self.descriptor.has_reveal_phase,
            _ => false,
        };

        Snapshot {
            game: self.game(),
            name: self.descriptor.name,
            phase: self.phase,
            embed: self.embed,
            level: self.session.level,
            score: self.session.score,
            remaining,
            display_seconds: self.round.as_ref().map(|r| r.display_seconds),
            stimulus_visible,
            challenge: self.round.as_ref().map(|r| r.challenge.clone()),
            palette: self.round.as_ref().and_then(|r| match &r.challenge.stimulus {
                Stimulus::SequenceRecall(s) => Some(s.palette()),
                _ => None,
            }),
            last_outcome: self.last_outcome,
            stats: self.session.stats.clone(),
            high_score: self.scores.high_score(game),
            best_level: self.scores.best_level(game),
            instructions: self.descriptor.instructions,
            timer: self.timers.active().map(TimerView::from),
        }
    }

    fn expect_phase(&self, action: &'static str, want: Phase) -> EngineResult<()> {
        if self.phase == want {
            Ok(())
        } else {
            Err(EngineError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn begin_round(&mut self) {
        let challenge = Challenge::generate(self.game(), self.session.level, &mut self.rng);
        self.begin_round_with(challenge);
    }

    fn begin_round_with(&mut self, challenge: Challenge) {
        let level = self.session.level;
        let display_seconds = if self.descriptor.has_reveal_phase {
            scaling::display_seconds(level)
        } else {
            0
        };
        self.round = Some(Round {
            level,
            challenge,
            display_seconds,
            remaining: display_seconds,
            points: 0,
        });
        self.last_outcome = None;
        info!(game = %self.game(), level, "round started");

        if self.descriptor.has_reveal_phase {
            self.phase = Phase::Showing;
            self.timers.arm(TimerKind::Countdown);
        } else {
            self.open_response();
        }
    }

    fn open_response(&mut self) {
        self.phase = Phase::response(self.descriptor.response_kind);
        let timeout = self.descriptor.response_timeout_secs;
        if let Some(round) = self.round.as_mut() {
            round.challenge.begin_response(&mut self.rng);
            if let Some(secs) = timeout {
                round.remaining = secs;
            }
        }
        match timeout {
            Some(_) => {
                self.timers.arm(TimerKind::Countdown);
            }
            None => {
                self.timers.cancel();
            }
        }
    }

    /// One countdown step; returns the seconds left.
    fn tick(&mut self) -> u32 {
        match self.round.as_mut() {
            Some(round) => {
                round.remaining = round.remaining.saturating_sub(1);
                round.remaining
            }
            None => 0,
        }
    }

    fn finish_round(&mut self, correct: bool, timed_out: bool) {
        self.timers.cancel();
        self.session.record(correct, timed_out);
        let points = self.round.as_ref().map_or(0, |r| r.points);
        self.last_outcome = Some(Outcome {
            correct,
            timed_out,
            level: self.session.level,
            points,
        });
        self.phase = Phase::Results;
        info!(
            game = %self.game(),
            level = self.session.level,
            correct,
            timed_out,
            score = self.session.score,
            "round finished"
        );
    }

    fn complete(&mut self, final_level: u32) {
        self.timers.cancel();
        self.round = None;
        self.phase = Phase::Completed;
        let game = self.game();
        let score = self.session.score;
        match self.scores.save_score(game.as_str(), score, Some(final_level)) {
            Ok(()) => self.saved = true,
            Err(e) => warn!(%game, score, "failed to save final score: {e}"),
        }
        info!(%game, score, "all levels completed");
    }

    fn persist_progress(&mut self) {
        let score = self.session.score;
        if score == 0 || self.saved {
            return;
        }
        let game = self.game();
        let level = self.session.level;
        if let Err(e) = self.scores.save_score(game.as_str(), score, Some(level)) {
            warn!(%game, score, level, "failed to save score: {e}");
        }
    }

    fn reset(&mut self) {
        self.timers.cancel();
        self.session.reset();
        self.round = None;
        self.last_outcome = None;
        self.saved = false;
        self.phase = Phase::Instruction;
    }
}
