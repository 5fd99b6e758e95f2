//! Quadtris terminal runner (default binary).
//!
//! Drives the simulation core at a fixed frame rate, maps crossterm key
//! events to actions and renders through the framebuffer renderer.
//!
//! Usage: `quadtris [CONFIG.json]`. Set `RUST_LOG` to write a trace to
//! `quadtris.log`; stdout belongs to the game screen.

use std::fs::File;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use quadtris::core::{GameSnapshot, LockEvent, Session, SessionConfig};
use quadtris::input::{handle_key_event, should_quit, CONTROLS};
use quadtris::term::{Decor, FrameBuffer, GameView, TerminalRenderer, Viewport};
use quadtris::types::{GameAction, BOARD_HEIGHT, DRAIN_STEP_MS, LINE_FLASH_MS};

const LOG_FILE: &str = "quadtris.log";

fn main() -> Result<()> {
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => SessionConfig::default(),
    };
    let seed = clock_seed();
    info!(seed, frame_ms = config.frame_ms, "starting");

    let mut session = Session::with_config(config, seed)?;
    // Open on the instructions screen.
    session.pause();

    let mut term = TerminalRenderer::new();
    term.enter()?;
    let result = App::new(&mut term).run(&mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

struct App<'a> {
    term: &'a mut TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
}

impl<'a> App<'a> {
    fn new(term: &'a mut TerminalRenderer) -> Self {
        Self {
            term,
            view: GameView::default().with_help(&CONTROLS),
            fb: FrameBuffer::new(0, 0),
        }
    }

    fn draw(&mut self, snap: &GameSnapshot, decor: Decor<'_>) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(snap, decor, Viewport::new(w, h), &mut self.fb);
        self.term.draw_swap(&mut self.fb)
    }

    fn run(&mut self, session: &mut Session) -> Result<()> {
        let frame = Duration::from_millis(u64::from(session.config().frame_ms));
        let mut last_tick = Instant::now();

        loop {
            self.draw(&session.snapshot(), Decor::default())?;

            if session.is_game_over() {
                self.drain(session)?;
                let key = wait_for_key()?;
                if should_quit(key) || handle_key_event(key) != Some(GameAction::Restart) {
                    return Ok(());
                }
                session.restart();
                last_tick = Instant::now();
                continue;
            }

            let timeout = frame.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if session.is_paused() {
                            // Any key leaves the pause/instructions screen.
                            session.resume();
                        } else if let Some(action) = handle_key_event(key) {
                            session.apply_action(action);
                        }
                    }
                    Event::Resize(..) => self.term.invalidate(),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= frame {
                last_tick = Instant::now();
                session.tick(session.config().frame_ms);
            }

            if let Some(lock) = session.take_last_event() {
                self.flash(session, &lock)?;
                // The flash is a literal pause; don't bill it to the next frame.
                last_tick = Instant::now();
            }
        }
    }

    /// Paint each full row white, one after another, before it is removed.
    fn flash(&mut self, session: &Session, lock: &LockEvent) -> Result<()> {
        let Some(snap) = lock.flash_frame(&session.snapshot()) else {
            return Ok(());
        };
        for shown in 1..=lock.rows.len() {
            let decor = Decor {
                flash_rows: &lock.rows[..shown],
            };
            self.draw(&snap, decor)?;
            thread::sleep(Duration::from_millis(u64::from(LINE_FLASH_MS)));
        }
        Ok(())
    }

    /// Closing animation: empty the board from the bottom, one row at a time.
    fn drain(&mut self, session: &mut Session) -> Result<()> {
        info!(score = session.score(), lines = session.lines(), "final");
        for _ in 0..BOARD_HEIGHT {
            session.drain_step();
            self.draw(&session.snapshot(), Decor::default())?;
            thread::sleep(Duration::from_millis(u64::from(DRAIN_STEP_MS)));
        }
        Ok(())
    }
}

fn wait_for_key() -> Result<KeyEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(key);
            }
        }
    }
}
