//! TCP server for the control adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking; the game itself lives on the caller's
//! thread and is reached only through channels.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tracing::{debug, info, warn};

use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, OutboundMessage};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_MAX_PENDING: usize = 10;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

impl ServerConfig {
    /// Read `TWENTY48_AI_HOST`, `TWENTY48_AI_PORT` and `TWENTY48_AI_MAX_PENDING`.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = get("TWENTY48_AI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        Self {
            host,
            port: parse_var(&get, "TWENTY48_AI_PORT").unwrap_or(defaults.port),
            max_pending_commands: parse_var(&get, "TWENTY48_AI_MAX_PENDING")
                .unwrap_or(defaults.max_pending_commands),
            ..Self::default()
        }
    }

    /// Check whether `TWENTY48_AI_DISABLED` is `1` or `true`.
    pub fn is_disabled() -> bool {
        std::env::var("TWENTY48_AI_DISABLED")
            .map(|v| disabled_flag(&v))
            .unwrap_or(false)
    }
}

fn parse_var<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    get(key).and_then(|s| s.trim().parse().ok())
}

fn disabled_flag(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// Same major version (`1.x` talks to `1.y`).
pub fn protocol_compatible(client: &str, server: &str) -> bool {
    let major = |v: &str| v.trim().split('.').next().unwrap_or("").to_string();
    let client_major = major(client);
    !client_major.is_empty() && client_major == major(server)
}

/// Connection summary published for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatus {
    pub client_count: u16,
    pub streaming_count: u16,
    pub controller_id: Option<usize>,
}

/// Handle to a connected client
#[derive(Debug)]
struct ClientHandle {
    id: usize,
    handshaken: bool,
    stream_observations: bool,
    last_seq: Option<u64>,
    /// Serialized lines to write to this client.
    tx: mpsc::UnboundedSender<String>,
}

/// Connected clients and the controller assignment.
#[derive(Debug, Default)]
struct Registry {
    clients: Vec<ClientHandle>,
    controller: Option<usize>,
}

type Rejection = (ErrorCode, &'static str);

impl Registry {
    fn get_mut(&mut self, id: usize) -> Option<&mut ClientHandle> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    fn is_handshaken(&self, id: usize) -> bool {
        self.clients.iter().any(|c| c.id == id && c.handshaken)
    }

    /// Enforce strictly increasing seq per client, recording it when accepted.
    fn check_seq(&mut self, id: usize, seq: u64) -> bool {
        let Some(client) = self.get_mut(id) else {
            return false;
        };
        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    /// Gate for every post-hello message: handshake done, seq moving forward.
    fn admit(&mut self, id: usize, seq: u64) -> Result<(), Rejection> {
        if !self.is_handshaken(id) {
            return Err((ErrorCode::HandshakeRequired, "send hello first"));
        }
        if !self.check_seq(id, seq) {
            return Err((ErrorCode::InvalidCommand, "seq must be strictly increasing"));
        }
        Ok(())
    }

    /// Remove a client; if it held control, promote the lowest-id handshaken client.
    fn remove(&mut self, id: usize) -> Option<usize> {
        self.clients.retain(|c| c.id != id);
        if self.controller != Some(id) {
            return None;
        }
        self.controller = self
            .clients
            .iter()
            .filter(|c| c.handshaken)
            .map(|c| c.id)
            .min();
        self.controller
    }

    fn status(&self) -> AdapterStatus {
        let live = || self.clients.iter().filter(|c| c.handshaken);
        AdapterStatus {
            client_count: live().count() as u16,
            streaming_count: live().filter(|c| c.stream_observations).count() as u16,
            controller_id: self.controller,
        }
    }
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    registry: RwLock<Registry>,
    status_tx: watch::Sender<AdapterStatus>,
}

impl ServerState {
    fn publish(&self, registry: &Registry) {
        self.status_tx.send_replace(registry.status());
    }
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let (status_tx, _) = watch::channel(AdapterStatus::default());
    run_server_with_status(config, command_tx, out_rx, ready_tx, status_tx).await
}

/// [`run_server`], additionally publishing connection status changes.
pub async fn run_server_with_status(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    status_tx: watch::Sender<AdapterStatus>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        config,
        registry: RwLock::new(Registry::default()),
        status_tx,
    });

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let registry = state.registry.read().await;
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(c) = registry.clients.iter().find(|c| c.id == client_id) {
                            let _ = c.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for c in registry
                            .clients
                            .iter()
                            .filter(|c| c.handshaken && c.stream_observations)
                        {
                            let _ = c.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    let mut client_id_counter = 0usize;
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

fn send_json<T: serde::Serialize>(tx: &mpsc::UnboundedSender<String>, msg: &T) {
    match serde_json::to_string(msg) {
        Ok(line) => {
            let _ = tx.send(line);
        }
        Err(e) => warn!(error = %e, "failed to serialize outbound message"),
    }
}

fn reject(tx: &mpsc::UnboundedSender<String>, seq: u64, code: ErrorCode, message: &str) {
    debug!(seq, ?code, reason = message, "rejecting message");
    send_json(tx, &create_error(seq, code, message));
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    state.registry.write().await.clients.push(ClientHandle {
        id: client_id,
        handshaken: false,
        stream_observations: false,
        last_seq: None,
        tx: tx.clone(),
    });

    let write_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err()
                || writer.write_all(b"\n").await.is_err()
                || writer.flush().await.is_err()
            {
                break;
            }
        }
    });

    let result = read_loop(&mut reader, client_id, &state, &tx, &command_tx).await;

    {
        let mut registry = state.registry.write().await;
        let was_controller = registry.controller == Some(client_id);
        match registry.remove(client_id) {
            Some(new_id) => info!(client_id, new_controller = new_id, "controller promoted"),
            None if was_controller => info!(client_id, "controller released"),
            None => {}
        }
        state.publish(&registry);
    }

    drop(tx);
    let _ = write_task.await;
    result
}

async fn read_loop(
    reader: &mut BufReader<tokio::net::tcp::OwnedReadHalf>,
    client_id: usize,
    state: &ServerState,
    tx: &mpsc::UnboundedSender<String>,
    command_tx: &mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if !on_hello(state, client_id, &hello, tx, command_tx).await {
                    return Ok(());
                }
            }
            Ok(ParsedMessage::Command(cmd)) => on_command(state, client_id, cmd, tx, command_tx).await,
            Ok(ParsedMessage::Control(ctrl)) => on_control(state, client_id, &ctrl, tx).await,
            Ok(ParsedMessage::Unknown(m)) => {
                let mut registry = state.registry.write().await;
                if registry.is_handshaken(client_id) && !registry.check_seq(client_id, m.seq) {
                    reject(tx, m.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                } else {
                    reject(tx, m.seq, ErrorCode::InvalidCommand, "unknown message type");
                }
            }
            Err(e) => {
                let seq = extract_seq(trimmed).unwrap_or(0);
                reject(tx, seq, ErrorCode::InvalidCommand, &format!("invalid message: {e}"));
            }
        }
    }
}

/// Returns false when the connection should be closed.
async fn on_hello(
    state: &ServerState,
    client_id: usize,
    hello: &HelloMessage,
    tx: &mpsc::UnboundedSender<String>,
    command_tx: &mpsc::Sender<InboundCommand>,
) -> bool {
    let mut registry = state.registry.write().await;

    if registry.is_handshaken(client_id) && !registry.check_seq(client_id, hello.seq) {
        reject(tx, hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
        return true;
    }

    if !protocol_compatible(&hello.protocol_version, &state.config.protocol_version) {
        let message = format!(
            "protocol version {} not supported (server speaks {})",
            hello.protocol_version, state.config.protocol_version
        );
        reject(tx, hello.seq, ErrorCode::ProtocolMismatch, &message);
        return false;
    }

    let Some(client) = registry.get_mut(client_id) else {
        return false;
    };
    client.handshaken = true;
    client.last_seq = Some(hello.seq);
    client.stream_observations = hello.requested.stream_observations;

    if registry.controller.is_none() {
        registry.controller = Some(client_id);
        info!(client_id, name = %hello.client.name, "client is now controller");
    }
    let role = if registry.controller == Some(client_id) {
        AssignedRole::Controller
    } else {
        AssignedRole::Observer
    };

    send_json(
        tx,
        &create_welcome(
            hello.seq,
            &state.config.protocol_version,
            client_id as u64,
            role,
            registry.controller.map(|id| id as u64),
        ),
    );
    state.publish(&registry);
    drop(registry);

    if hello.requested.stream_observations {
        request_snapshot(command_tx, client_id, hello.seq);
    }
    true
}

/// Queue the first observation for a streaming client. Returns false if it was dropped.
fn request_snapshot(command_tx: &mpsc::Sender<InboundCommand>, client_id: usize, seq: u64) -> bool {
    let request = InboundCommand {
        client_id,
        seq,
        command: ClientCommand::SnapshotRequest,
    };
    match command_tx.try_send(request) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(client_id, seq, "command queue full, initial observation dropped");
            false
        }
        Err(TrySendError::Closed(_)) => {
            warn!(client_id, seq, "game loop gone, initial observation dropped");
            false
        }
    }
}

async fn on_command(
    state: &ServerState,
    client_id: usize,
    cmd: CommandMessage,
    tx: &mpsc::UnboundedSender<String>,
    command_tx: &mpsc::Sender<InboundCommand>,
) {
    let is_controller = {
        let mut registry = state.registry.write().await;
        if let Err((code, message)) = registry.admit(client_id, cmd.seq) {
            reject(tx, cmd.seq, code, message);
            return;
        }
        registry.controller == Some(client_id)
    };

    if !is_controller {
        reject(tx, cmd.seq, ErrorCode::NotController, "only the controller may send commands");
        return;
    }
    if cmd.actions.0.is_empty() {
        reject(tx, cmd.seq, ErrorCode::InvalidCommand, "actions must not be empty");
        return;
    }

    // The ack is sent by the game loop once the actions are applied.
    let inbound = InboundCommand {
        client_id,
        seq: cmd.seq,
        command: ClientCommand::Actions(cmd.actions),
    };
    match command_tx.try_send(inbound) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            reject(tx, cmd.seq, ErrorCode::Backpressure, "command queue is full");
        }
        Err(TrySendError::Closed(_)) => {
            reject(tx, cmd.seq, ErrorCode::InvalidCommand, "game is not accepting commands");
        }
    }
}

async fn on_control(
    state: &ServerState,
    client_id: usize,
    ctrl: &ControlMessage,
    tx: &mpsc::UnboundedSender<String>,
) {
    let mut registry = state.registry.write().await;
    if let Err((code, message)) = registry.admit(client_id, ctrl.seq) {
        reject(tx, ctrl.seq, code, message);
        return;
    }

    match ctrl.action {
        ControlAction::Claim => match registry.controller {
            None => {
                registry.controller = Some(client_id);
                info!(client_id, "controller claimed");
            }
            Some(id) if id == client_id => {}
            Some(_) => {
                reject(tx, ctrl.seq, ErrorCode::ControllerActive, "controller already assigned");
                return;
            }
        },
        ControlAction::Release => {
            if registry.controller != Some(client_id) {
                reject(tx, ctrl.seq, ErrorCode::NotController, "only the controller may release");
                return;
            }
            registry.controller = None;
            info!(client_id, "controller released");
        }
    }

    send_json(tx, &create_ack(ctrl.seq));
    state.publish(&registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn registry_with(ids: &[usize]) -> Registry {
        let mut registry = Registry::default();
        for &id in ids {
            let (tx, _rx) = mpsc::unbounded_channel();
            registry.clients.push(ClientHandle {
                id,
                handshaken: true,
                stream_observations: id % 2 == 1,
                last_seq: Some(1),
                tx,
            });
        }
        registry
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("TWENTY48_AI_HOST", "0.0.0.0"),
            ("TWENTY48_AI_PORT", "9000"),
            ("TWENTY48_AI_MAX_PENDING", "nope"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_pending_commands, DEFAULT_MAX_PENDING);
        assert_eq!(config.protocol_version, PROTOCOL_VERSION);

        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!((config.host.as_str(), config.port), (DEFAULT_HOST, DEFAULT_PORT));

        let config = ServerConfig::from_lookup(|k| match k {
            "TWENTY48_AI_PORT" => Some(" 7000 ".to_string()),
            "TWENTY48_AI_MAX_PENDING" => Some("3".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 7000);
        assert_eq!(config.max_pending_commands, 3);
    }

    #[test]
    fn test_snapshot_request_reports_full_queue() {
        let (tx, mut rx) = mpsc::channel::<InboundCommand>(1);
        assert!(request_snapshot(&tx, 1, 1));
        assert!(!request_snapshot(&tx, 2, 1));

        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.client_id, 1);
        assert_eq!(queued.command, ClientCommand::SnapshotRequest);

        drop(rx);
        assert!(!request_snapshot(&tx, 3, 1));
    }

    #[test]
    fn test_disabled_flag_values() {
        assert!(disabled_flag("1"));
        assert!(disabled_flag("TRUE"));
        assert!(!disabled_flag("0"));
        assert!(!disabled_flag(""));
    }

    #[test]
    fn test_protocol_major_must_match() {
        assert!(protocol_compatible("1.0.0", "1.0.0"));
        assert!(protocol_compatible("1.4", "1.0.0"));
        assert!(!protocol_compatible("2.0.0", "1.0.0"));
        assert!(!protocol_compatible("", "1.0.0"));
    }

    #[test]
    fn test_seq_must_increase() {
        let mut registry = registry_with(&[1]);
        assert!(registry.check_seq(1, 2));
        assert!(!registry.check_seq(1, 2));
        assert!(!registry.check_seq(1, 1));
        assert!(registry.check_seq(1, 10));
    }

    #[test]
    fn test_admit_requires_handshake() {
        let mut registry = registry_with(&[1]);
        registry.clients[0].handshaken = false;
        assert_eq!(
            registry.admit(1, 5).unwrap_err().0,
            ErrorCode::HandshakeRequired
        );
        registry.clients[0].handshaken = true;
        assert!(registry.admit(1, 5).is_ok());
        assert_eq!(registry.admit(1, 5).unwrap_err().0, ErrorCode::InvalidCommand);
    }

    #[test]
    fn test_controller_promotion_on_remove() {
        let mut registry = registry_with(&[1, 2, 3]);
        registry.controller = Some(1);
        registry.clients[1].handshaken = false;

        assert_eq!(registry.remove(1), Some(3));
        assert_eq!(registry.controller, Some(3));
        assert_eq!(registry.remove(2), None);
        assert_eq!(registry.remove(3), None);
        assert_eq!(registry.controller, None);
    }

    #[test]
    fn test_status_counts_handshaken_clients() {
        let mut registry = registry_with(&[1, 2, 3]);
        registry.controller = Some(2);
        registry.clients[2].handshaken = false;
        assert_eq!(
            registry.status(),
            AdapterStatus {
                client_count: 2,
                streaming_count: 1,
                controller_id: Some(2),
            }
        );
    }
}
