//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use std::net::SocketAddr;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{info, warn};

use crate::core::GameSnapshot;
use crate::protocol::{build_observation, create_ack, ActionList};
use crate::server::{run_server_with_status, AdapterStatus, ServerConfig};

/// Command delivered to the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub command: ClientCommand,
}

/// Command payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Apply these actions in order, then ack.
    Actions(ActionList),
    /// Send the requesting client an observation of the current state.
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    /// Delivered to every client streaming observations.
    Broadcast { line: String },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
    local_addr: SocketAddr,
    observation_seq: u64,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `TWENTY48_AI_DISABLED` is set.
    pub fn start_from_env() -> Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            info!("adapter disabled via TWENTY48_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Start the server on a private runtime and wait until it is listening.
    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (status_tx, status_rx) = watch::channel(AdapterStatus::default());
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("tui-2048-adapter")
            .enable_all()
            .build()?;

        rt.spawn(async move {
            if let Err(e) =
                run_server_with_status(config, cmd_tx, out_rx, Some(ready_tx), status_tx).await
            {
                warn!(error = %e, "adapter server stopped");
            }
        });

        // The sender is dropped without a value if binding failed.
        let local_addr = rt
            .block_on(ready_rx)
            .map_err(|_| anyhow!("adapter failed to start listening"))?;

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            status_rx,
            local_addr,
            observation_seq: 0,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> AdapterStatus {
        *self.status_rx.borrow()
    }

    /// Acknowledge an applied command.
    pub fn ack(&self, client_id: usize, seq: u64) {
        self.send_to(client_id, &create_ack(seq));
    }

    /// Send an observation to one client.
    pub fn observe(&mut self, client_id: usize, snap: &GameSnapshot) {
        let obs = build_observation(snap, self.next_observation_seq());
        self.send_to(client_id, &obs);
    }

    /// Send an observation to every streaming client.
    pub fn broadcast(&mut self, snap: &GameSnapshot) {
        let obs = build_observation(snap, self.next_observation_seq());
        if let Some(line) = to_line(&obs) {
            self.send(OutboundMessage::Broadcast { line });
        }
    }

    fn next_observation_seq(&mut self) -> u64 {
        self.observation_seq += 1;
        self.observation_seq
    }

    fn send_to<T: Serialize>(&self, client_id: usize, msg: &T) {
        if let Some(line) = to_line(msg) {
            self.send(OutboundMessage::ToClient { client_id, line });
        }
    }
}

fn to_line<T: Serialize>(msg: &T) -> Option<String> {
    serde_json::to_string(msg)
        .map_err(|e| warn!(error = %e, "failed to serialize outbound message"))
        .ok()
}
