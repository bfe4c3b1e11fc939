//! Adapter module - AI control via TCP socket with JSON protocol
//!
//! External agents (solvers, training harnesses, scripted tests) drive the
//! game through a TCP connection. The game loop stays the only owner of the
//! game state: commands are queued to it and observations are sent back.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends a game state observation after every change
//! 5. **Commanding**: Controller sends `command` with up to 32 actions
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: handshake with client info and protocol version (major `1`)
//! - **command**: actions `moveLeft`, `moveRight`, `moveUp`, `moveDown`, `restart`
//! - **control**: `claim` or `release` controller status
//!
//! ## Server → Client
//!
//! - **welcome**: response to hello with assigned role and capabilities
//! - **observation**: board, score, flags, last move and a stable `state_hash`
//! - **ack**: the command was applied (or the control request granted)
//! - **error**: `code` plus human-readable `message`
//!
//! # Environment Variables
//!
//! - `TWENTY48_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `TWENTY48_AI_PORT`: Port number (default: 7878)
//! - `TWENTY48_AI_MAX_PENDING`: Command queue depth before `backpressure` (default: 10)
//! - `TWENTY48_AI_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1,"client":{"name":"my-ai","version":"1.0.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":2,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":3,"board":{"size":4,"cells":[[0,2,0,0],...]},"score":0,...}
//! Client -> Server: {"type":"command","seq":2,"ts":4,"actions":["moveLeft","moveUp"]}
//! Server -> Client: {"type":"ack","seq":2,"ts":5,"status":"ok"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, OutboundMessage};
pub use server::*;
