//! Mindplay Daemon - hosts game sessions for presentation clients
//!
//! Each TCP connection gets its own round engine. Requests and responses are
//! newline-delimited JSON; timer-driven phase changes are pushed to the client
//! as unsolicited `State` messages.
//!
//! Storage locations:
//! - Linux: ~/.local/share/mindplay/
//! - Windows: %APPDATA%\mindplay\
//! - MacOS: ~/Library/Application Support/mindplay/

use std::sync::Arc;

use mindplay::engine::Fired;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod paths;
mod protocol;
mod session;

use config::DaemonConfig;
use paths::AppPaths;
use protocol::{Request, Response};
use session::{ClientSession, Daemon};

type Outbox = mpsc::UnboundedSender<Response>;

/// Keep exactly one sleep task alive for the engine's armed timer.
fn sync_timer(shared: &Arc<Mutex<ClientSession>>, session: &mut ClientSession, outbox: &Outbox) {
    let pending = session.engine.as_ref().and_then(|e| e.pending_timer());
    if pending.map(|t| t.id) == session.armed {
        return;
    }
    session.cancel_timer();
    let Some(timer) = pending else {
        return;
    };

    let token = CancellationToken::new();
    session.armed = Some(timer.id);
    session.timer_task = Some(token.clone());

    let shared = Arc::clone(shared);
    let outbox = outbox.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = tokio::time::sleep(timer.after) => {
                let mut session = shared.lock().await;
                // superseded while waiting for the lock
                if token.is_cancelled() || session.armed != Some(timer.id) {
                    return;
                }
                session.armed = None;
                session.timer_task = None;
                let Some(engine) = session.engine.as_mut() else {
                    return;
                };
                if engine.fire(timer.id) == Fired::Applied {
                    let _ = outbox.send(Response::State(Box::new(engine.snapshot())));
                }
                sync_timer(&shared, &mut session, &outbox);
            }
        }
    });
}

async fn handle_client(
    stream: TcpStream,
    daemon: Arc<Daemon>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let (outbox, mut inbox) = mpsc::unbounded_channel::<Response>();
    let writer_task = tokio::spawn(async move {
        while let Some(resp) = inbox.recv().await {
            let line = match serde_json::to_string(&resp) {
                Ok(line) => line,
                Err(e) => {
                    error!("Could not encode response: {}", e);
                    continue;
                }
            };
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
            {
                break;
            }
        }
    });

    let shared = Arc::new(Mutex::new(ClientSession::default()));

    let result = loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };
        if line.trim().is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let _ = outbox.send(Response::error(format!("Invalid request: {}", e)));
                continue;
            }
        };
        debug!(?request, "request");

        let mut session = shared.lock().await;
        let response = session.handle(request, &daemon);
        // reply before any timer push for the new state
        let sent = outbox.send(response).is_ok();
        sync_timer(&shared, &mut session, &outbox);
        drop(session);

        if !sent || daemon.shutdown.is_cancelled() {
            break Ok(());
        }
    };

    // No save on disconnect; only restart, home and completion persist.
    shared.lock().await.cancel_timer();
    drop(outbox);
    let _ = writer_task.await;
    result?;
    Ok(())
}

async fn serve(listener: TcpListener, daemon: Arc<Daemon>) -> std::io::Result<()> {
    loop {
        let (stream, addr) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = daemon.shutdown.cancelled() => {
                info!("Shutdown requested");
                return Ok(());
            }
        };
        info!("Client connected: {}", addr);
        let daemon = Arc::clone(&daemon);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, daemon).await {
                error!("Client handler error: {}", e);
            }
            info!("Client disconnected: {}", addr);
        });
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let paths = AppPaths::new()?;
    let config = match DaemonConfig::load(&paths.config_file()) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            DaemonConfig::default()
        }
    }
    .apply_env();
    info!(data_dir = %paths.data_dir().display(), "Scores stored in gameScores.json");

    let listener = TcpListener::bind(&config.listen).await?;
    info!("Mindplay daemon listening on {}", config.listen);

    let daemon = Arc::new(Daemon::new(paths, config));

    {
        let shutdown = daemon.shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received");
                shutdown.cancel();
            }
        });
    }

    serve(listener, daemon).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindplay_games::GameId;
    use serde_json::Value;

    async fn spawn_daemon() -> (std::net::SocketAddr, Arc<Daemon>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let config = DaemonConfig {
            seed: Some(11),
            ..DaemonConfig::default()
        };
        let daemon = Arc::new(Daemon::new(AppPaths::at(tmp.path()).unwrap(), config));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Arc::clone(&daemon)));
        (addr, daemon, tmp)
    }

    async fn send(writer: &mut tokio::net::tcp::OwnedWriteHalf, body: &str) {
        writer.write_all(body.as_bytes()).await.unwrap();
        writer.write_all(b"\n").await.unwrap();
    }

    #[tokio::test]
    async fn lists_games_and_reports_bad_json() {
        let (addr, _daemon, _tmp) = spawn_daemon().await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        send(&mut writer, r#"{"type":"ListGames"}"#).await;
        let v: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(v["type"], "Games");
        assert_eq!(v["games"].as_array().unwrap().len(), GameId::ALL.len());

        send(&mut writer, "not json").await;
        let v: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(v["type"], "Error");
    }

    #[tokio::test(start_paused = true)]
    async fn reveal_countdown_is_pushed() {
        let (addr, _daemon, _tmp) = spawn_daemon().await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        send(&mut writer, r#"{"type":"Open","game":"quantitative-recall"}"#).await;
        let v: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(v["phase"], "instruction");

        send(&mut writer, r#"{"type":"Start"}"#).await;
        let v: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(v["phase"], "showing");
        assert_eq!(v["remaining"], 8);

        // eight countdown pushes and one grace push
        let mut last = Value::Null;
        for _ in 0..9 {
            last = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
            assert_eq!(last["type"], "State");
        }
        assert_eq!(last["phase"], "question");
    }

    #[tokio::test]
    async fn shutdown_stops_the_listener() {
        let tmp = tempfile::tempdir().unwrap();
        let daemon = Arc::new(Daemon::new(
            AppPaths::at(tmp.path()).unwrap(),
            DaemonConfig::default(),
        ));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, Arc::clone(&daemon)));

        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();
        send(&mut writer, r#"{"type":"Shutdown"}"#).await;
        let v: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(v["type"], "Success");

        server.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn late_sleep_task_leaves_the_current_timer_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let daemon = Daemon::new(
            AppPaths::at(tmp.path()).unwrap(),
            DaemonConfig {
                seed: Some(5),
                ..DaemonConfig::default()
            },
        );
        let (outbox, _inbox) = mpsc::unbounded_channel::<Response>();
        let shared = Arc::new(Mutex::new(ClientSession::default()));

        {
            let mut session = shared.lock().await;
            session.handle(
                Request::Open {
                    game: "quantitative-recall".into(),
                    embed: None,
                },
                &daemon,
            );
            session.handle(Request::Start, &daemon);
            sync_timer(&shared, &mut session, &outbox);
        }

        // the first task wakes up and queues on the lock while a new round
        // replaces its timer
        let mut session = shared.lock().await;
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        session.handle(Request::Restart, &daemon);
        session.handle(Request::Start, &daemon);
        sync_timer(&shared, &mut session, &outbox);
        let current = session.timer_task.clone().unwrap();
        let armed = session.armed;
        drop(session);

        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        let mut session = shared.lock().await;
        assert_eq!(session.armed, armed);
        assert!(!current.is_cancelled());
        session.cancel_timer();
        assert!(current.is_cancelled());
    }

    #[tokio::test]
    async fn read_error_tears_down_running_timers() {
        let (addr, _daemon, _tmp) = spawn_daemon().await;
        let stream = TcpStream::connect(addr).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        let mut lines = BufReader::new(reader).lines();

        send(&mut writer, r#"{"type":"Open","game":"sequence-recall"}"#).await;
        lines.next_line().await.unwrap().unwrap();
        send(&mut writer, r#"{"type":"Start"}"#).await;
        let v: Value = serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(v["phase"], "showing");

        // not UTF-8: the server drops the connection instead of pushing ticks
        writer.write_all(b"\xff\n").await.unwrap();
        assert_eq!(lines.next_line().await.unwrap(), None);
    }
}
