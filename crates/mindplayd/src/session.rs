//! One engine per client connection.

use mindplay::backend::FileBackend;
use mindplay::engine::Engine;
use mindplay::scores::ScoreManager;
use mindplay::timer::TimerId;
use mindplay_games::GameId;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::DaemonConfig;
use crate::paths::AppPaths;
use crate::protocol::{Request, Response};

/// Shared, read-only daemon context.
#[derive(Debug)]
pub struct Daemon {
    pub paths: AppPaths,
    pub config: DaemonConfig,
    pub shutdown: CancellationToken,
}

impl Daemon {
    pub fn new(paths: AppPaths, config: DaemonConfig) -> Self {
        Self {
            paths,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    fn backend(&self) -> FileBackend {
        FileBackend::new(self.paths.data_dir())
    }

    fn open_engine(&self, game: GameId, embed: bool) -> Engine<FileBackend> {
        let engine = match self.config.seed {
            Some(seed) => Engine::with_rng(game, self.backend(), StdRng::seed_from_u64(seed)),
            None => Engine::new(game, self.backend()),
        };
        engine.with_embed(embed)
    }
}

#[derive(Default)]
pub struct ClientSession {
    pub engine: Option<Engine<FileBackend>>,
    /// Id of the timer the running sleep task will fire.
    pub armed: Option<TimerId>,
    pub timer_task: Option<CancellationToken>,
}

impl ClientSession {
    pub fn handle(&mut self, request: Request, daemon: &Daemon) -> Response {
        match request {
            Request::ListGames => Response::Games {
                games: GameId::ALL.iter().map(|g| *g.descriptor()).collect(),
            },

            Request::Open { game, embed } => {
                let Some(id) = GameId::parse(&game) else {
                    return Response::error(format!("Unknown game: {}", game));
                };
                if let Some(mut previous) = self.engine.take() {
                    previous.home();
                }
                let engine = daemon.open_engine(id, embed.unwrap_or(daemon.config.embed));
                info!(game = %id, "session opened");
                let snapshot = engine.snapshot();
                self.engine = Some(engine);
                Response::State(Box::new(snapshot))
            }

            Request::Start => self.with_engine(|e| e.start().map(|_| ())),
            Request::Input { input } => self.with_engine(|e| e.input(input).map(|_| ())),
            Request::Next => self.with_engine(|e| e.next()),
            Request::Restart => self.with_engine(|e| {
                e.restart();
                Ok(())
            }),
            Request::GetState => self.with_engine(|_| Ok(())),

            Request::Home => match self.engine.take() {
                Some(mut engine) => {
                    engine.home();
                    Response::success(format!("Left {}", engine.game()))
                }
                None => Response::error("No game is open"),
            },

            Request::GetScores { game } => {
                let Some(id) = GameId::parse(&game) else {
                    return Response::error(format!("Unknown game: {}", game));
                };
                let scores = ScoreManager::new(daemon.backend());
                Response::Scores {
                    game: id.as_str().to_string(),
                    records: scores.scores(id.as_str()),
                    high_score: scores.high_score(id.as_str()),
                    best_level: scores.best_level(id.as_str()),
                }
            }

            Request::Shutdown => {
                daemon.shutdown.cancel();
                Response::success("Shutting down")
            }
        }
    }

    fn with_engine<F>(&mut self, op: F) -> Response
    where
        F: FnOnce(&mut Engine<FileBackend>) -> mindplay::error::EngineResult<()>,
    {
        let Some(engine) = self.engine.as_mut() else {
            return Response::error("No game is open; send Open first");
        };
        match op(&mut *engine) {
            Ok(()) => Response::State(Box::new(engine.snapshot())),
            Err(e) => Response::error(e.to_string()),
        }
    }

    /// Stop the sleep task, if any.
    pub fn cancel_timer(&mut self) {
        if let Some(token) = self.timer_task.take() {
            token.cancel();
        }
        self.armed = None;
    }
}
