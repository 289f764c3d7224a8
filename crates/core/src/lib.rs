//! # mindplay
//!
//! Round engine and score store for the mindplay memory games.
//!
//! One [`Engine`](engine::Engine) drives any of the five variants through
//! instruction, reveal, response and results. It never sleeps: timed steps
//! are handed to the host as [`Timer`](timer::Timer) values and come back
//! through [`Engine::fire`](engine::Engine::fire).
//!
//! ## Quick Start
//!
//! ```
//! use mindplay::prelude::*;
//!
//! let mut engine = Engine::new(GameId::SymbolMatching, MemoryBackend::new());
//! engine.start().unwrap();
//! assert_eq!(engine.phase(), Phase::Playing);
//!
//! engine.input(Input::Pick { index: 0 }).unwrap();
//! assert_eq!(engine.phase(), Phase::Results);
//! engine.restart();
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: phase machine, scoring, snapshots
//! - [`scores`]: best-ten records per game
//! - [`backend`]: key/value storage behind the score store
//! - [`timer`]: timer tokens

#[path = "core/backend.rs"]
pub mod backend;

#[path = "core/engine.rs"]
pub mod engine;

#[path = "core/error.rs"]
pub mod error;

#[path = "core/scores.rs"]
pub mod scores;

#[path = "core/session.rs"]
pub mod session;

#[path = "core/timer.rs"]
pub mod timer;

pub use mindplay_games as games;

/// Prelude module for convenient imports.
///
/// ```
/// use mindplay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backend::{FileBackend, MemoryBackend, ScoreBackend};
    pub use crate::engine::{Engine, Fired, Outcome, Phase, Snapshot};
    pub use crate::error::{EngineError, StoreError};
    pub use crate::scores::{ScoreManager, ScoreRecord};
    pub use crate::timer::{Timer, TimerId, TimerKind};
    pub use mindplay_games::{GameId, Input, Progress};
}
