//! Newline-delimited JSON messages exchanged with presentation clients.

use mindplay::engine::Snapshot;
use mindplay::scores::ScoreRecord;
use mindplay_games::{Input, VariantDescriptor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    ListGames,
    /// Begin a session for `game`, leaving any open one first.
    Open {
        game: String,
        #[serde(default)]
        embed: Option<bool>,
    },
    Start,
    Input {
        input: Input,
    },
    Next,
    Restart,
    Home,
    GetState,
    GetScores {
        game: String,
    },
    Shutdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Response {
    Games {
        games: Vec<VariantDescriptor>,
    },
    State(Box<Snapshot>),
    Scores {
        game: String,
        records: Vec<ScoreRecord>,
        high_score: u32,
        best_level: Option<u32>,
    },
    Success {
        message: String,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Response::Success {
            message: message.into(),
        }
    }
}
