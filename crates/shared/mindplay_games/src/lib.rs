//! Pure game logic for the mindplay variants: catalogs, difficulty scaling,
//! stimulus generation and answer evaluation. No I/O and no clocks; hosts
//! supply the RNG and drive the timing.

pub mod challenge;
pub mod game;
pub mod object_association;
pub mod pattern_completion;
pub mod quantitative_recall;
pub mod scaling;
pub mod sequence_recall;
pub mod stats;
pub mod symbol_matching;

pub use challenge::{Challenge, Input, InputError, Progress, ResponseState, Stimulus};
pub use game::{GameId, Instructions, ResponseKind, VariantDescriptor};
pub use stats::RoundStats;
