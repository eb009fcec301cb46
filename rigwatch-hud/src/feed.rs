//! NDJSON feeds that drive the ingestion bridge.
//!
//! A feed is one background task reading newline-delimited [`FeedEvent`]
//! JSON from somewhere (a TCP stream, a capture file) and calling into the
//! [`IngestionBridge`]. The feed owns the connection lifecycle: it reports
//! `Connected` when the stream opens and `Disconnected` on EOF or error.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rigwatch_core::{ConnectionEvent, IngestionBridge};
use rigwatch_types::FeedEvent;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Handle for a running feed task.
#[derive(Debug)]
pub struct FeedHandle {
    task: JoinHandle<()>,
}

impl FeedHandle {
    /// Abort the feed task.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Spawn a feed reading newline-delimited JSON events from an async stream.
///
/// Malformed lines are logged and skipped; the stream keeps going. EOF or a
/// read error ends the feed and surfaces as a connection error on the UI
/// store.
pub fn spawn_stream<R>(reader: R, bridge: Arc<IngestionBridge>, description: &str) -> FeedHandle
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let description = description.to_string();
    let task = tokio::spawn(async move {
        bridge.on_connection_event(ConnectionEvent::Connected);
        info!(feed = %description, "feed connected");

        let mut lines = BufReader::new(reader).lines();
        let reason = loop {
            match lines.next_line().await {
                Ok(Some(line)) => dispatch(&bridge, &line),
                Ok(None) => break format!("{description}: stream closed"),
                Err(err) => break format!("{description}: read error: {err}"),
            }
        };

        info!(feed = %description, %reason, "feed ended");
        bridge.on_connection_event(ConnectionEvent::Disconnected {
            reason: Some(reason),
        });
    });

    FeedHandle { task }
}

/// Connect to a TCP endpoint streaming feed events and spawn a feed on it.
pub async fn connect_tcp(addr: &str, bridge: Arc<IngestionBridge>) -> Result<FeedHandle> {
    let stream = tokio::net::TcpStream::connect(addr)
        .await
        .with_context(|| format!("failed to connect to {addr}"))?;
    Ok(spawn_stream(stream, bridge, addr))
}

/// Replay a capture file of feed events at a fixed cadence.
///
/// Useful for demos and for driving the HUD without a live transport.
pub fn spawn_replay(path: PathBuf, cadence: Duration, bridge: Arc<IngestionBridge>) -> FeedHandle {
    let task = tokio::spawn(async move {
        let description = path.display().to_string();
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(err) => {
                bridge.on_connection_event(ConnectionEvent::Disconnected {
                    reason: Some(format!("{description}: {err}")),
                });
                return;
            }
        };

        bridge.on_connection_event(ConnectionEvent::Connected);
        info!(feed = %description, "replay started");

        let mut lines = BufReader::new(file).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            dispatch(&bridge, &line);
            tokio::time::sleep(cadence).await;
        }

        bridge.on_connection_event(ConnectionEvent::Disconnected {
            reason: Some(format!("{description}: replay finished")),
        });
    });

    FeedHandle { task }
}

/// Parse one feed line and route it into the bridge.
fn dispatch(bridge: &IngestionBridge, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<FeedEvent>(line) {
        Ok(FeedEvent::Sample(sample)) => {
            // Unknown rigs are already logged by the bridge.
            let _ = bridge.on_sample(&sample);
        }
        Ok(FeedEvent::Status { subsystem, health }) => bridge.on_system_status(subsystem, health),
        Err(err) => warn!("skipping malformed feed line: {err}"),
    }
}
