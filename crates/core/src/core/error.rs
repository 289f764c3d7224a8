use mindplay_games::InputError;

use crate::engine::Phase;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("`{action}` is not allowed during the {phase} phase")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error(transparent)]
    Input(#[from] InputError),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode scores: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
