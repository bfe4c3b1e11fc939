//! Terminal 2048 runner (default binary).
//!
//! Uses crossterm for input (keys and mouse swipes) and the framebuffer-based
//! renderer from `tui_2048::term`. When enabled, the control adapter lets an
//! external agent play through the same game state.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tui_2048::adapter::{Adapter, ClientCommand};
use tui_2048::core::{GameSnapshot, GameState};
use tui_2048::input::{handle_key_event, should_quit, SwipeTracker};
use tui_2048::term::{AdapterStatusView, FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_2048::types::{GameAction, SpawnPolicy, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};

/// Input poll interval; the game has no timers, so this only bounds adapter latency.
const POLL_MS: u64 = 30;

#[derive(Parser, Debug)]
#[command(version, about = "Play 2048 in the terminal")]
struct Args {
    /// Board side length.
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE,
          value_parser = clap::value_parser!(u8).range(MIN_BOARD_SIZE as i64..=MAX_BOARD_SIZE as i64))]
    size: u8,
    /// RNG seed (default: derived from the clock).
    #[arg(long)]
    seed: Option<u64>,
    /// Spawn a tile after every move, even one that changed nothing.
    #[arg(long)]
    spawn_always: bool,
    /// Keyboard only: leave the mouse to the terminal (no swipes).
    #[arg(long)]
    no_mouse: bool,
    /// Write logs to this file. Logging is off without it.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Tracing filter, e.g. "info", "debug", "tui_2048_core=debug".
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let seed = args.seed.unwrap_or_else(clock_seed);
    let policy = if args.spawn_always {
        SpawnPolicy::Always
    } else {
        SpawnPolicy::OnChange
    };
    let game = GameState::new(args.size, seed)?.with_spawn_policy(policy);
    info!(size = args.size, seed, ?policy, "starting game");

    let adapter = Adapter::start_from_env().unwrap_or_else(|e| {
        warn!(error = %e, "control adapter unavailable");
        None
    });
    if let Some(a) = adapter.as_ref() {
        info!(addr = %a.local_addr(), "control adapter ready");
    }

    let mut term = if args.no_mouse {
        TerminalRenderer::new().without_mouse()
    } else {
        TerminalRenderer::new()
    };
    term.enter()?;

    let result = run(&mut term, game, adapter);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = args.log_file.as_ref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

struct App {
    game: GameState,
    adapter: Option<Adapter>,
    snap: GameSnapshot,
    dirty: bool,
}

impl App {
    /// Apply a locally generated action and tell streaming clients about it.
    fn apply(&mut self, action: GameAction) {
        self.game.apply_action(action);
        self.dirty = true;
        if let Some(adapter) = self.adapter.as_mut() {
            self.game.snapshot_into(&mut self.snap);
            adapter.broadcast(&self.snap);
        }
    }

    fn drain_adapter(&mut self) {
        let Some(adapter) = self.adapter.as_mut() else {
            return;
        };
        while let Some(cmd) = adapter.try_recv() {
            match cmd.command {
                ClientCommand::SnapshotRequest => {
                    self.game.snapshot_into(&mut self.snap);
                    adapter.observe(cmd.client_id, &self.snap);
                }
                ClientCommand::Actions(actions) => {
                    for &action in actions.as_slice() {
                        self.game.apply_action(action);
                    }
                    adapter.ack(cmd.client_id, cmd.seq);
                    self.game.snapshot_into(&mut self.snap);
                    adapter.broadcast(&self.snap);
                    self.dirty = true;
                }
            }
        }
    }

    fn adapter_view(&self) -> Option<AdapterStatusView> {
        self.adapter.as_ref().map(|a| {
            let status = a.status();
            AdapterStatusView {
                enabled: true,
                client_count: status.client_count,
                controller_id: status.controller_id,
                streaming_count: status.streaming_count,
            }
        })
    }
}

fn run(term: &mut TerminalRenderer, game: GameState, adapter: Option<Adapter>) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut swipe = SwipeTracker::new();
    let mut app = App {
        game,
        adapter,
        snap: GameSnapshot::default(),
        dirty: true,
    };
    let mut last_status = None;

    loop {
        app.drain_adapter();

        let status = app.adapter_view();
        if status != last_status {
            last_status = status;
            app.dirty = true;
        }

        if app.dirty {
            let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
            app.game.snapshot_into(&mut app.snap);
            view.render_into_with_adapter(&app.snap, status.as_ref(), Viewport::new(w, h), &mut fb);
            term.draw_swap(&mut fb)?;
            app.dirty = false;
        }

        if !event::poll(Duration::from_millis(POLL_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(action) = handle_key_event(key) {
                    app.apply(action);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(action) = swipe.handle_mouse_event(mouse) {
                    app.apply(action);
                }
            }
            Event::Resize(_, _) => {
                term.invalidate();
                app.dirty = true;
            }
            Event::FocusLost => swipe.cancel(),
            _ => {}
        }
    }
}
