mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use upgrade_shooter::compute::{continue_state, init_state, tick};
use upgrade_shooter::config::GameConfig;
use upgrade_shooter::economy::{close_upgrades, open_upgrades, purchase_upgrade};
use upgrade_shooter::entities::{GameState, GameStatus, InputState};
use upgrade_shooter::rules::{GatePolicy, Rules, Variant};
use upgrade_shooter::save::{settle_game_over, take_save, FileStore, SaveRecord, Store};

use display::{Hud, Viewport};

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 8;

/// Terminal vertical shooter with a score-funded upgrade shop.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Rule set to play (overrides the config file).
    #[arg(long, value_enum)]
    variant: Option<VariantArg>,

    /// Path of the TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for total points and the saved game.
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Log file (the terminal itself is used for drawing).
    #[arg(long, default_value = "upgrade_shooter.log")]
    log_file: PathBuf,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    Classic,
    Economy,
    Deluxe,
}

impl From<VariantArg> for Variant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Classic => Variant::Classic,
            VariantArg::Economy => Variant::Economy,
            VariantArg::Deluxe => Variant::Deluxe,
        }
    }
}

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    NewGame,
    Continue,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    rules: &Rules,
    store: &FileStore,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;
    let saved = rules.persistent && store.has_save();

    let title = "★  UPGRADE  SHOOTER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let mode = format!("[ {} ]", rules.variant.label());
    out.queue(cursor::MoveTo(cx.saturating_sub(mode.len() as u16 / 2), cy.saturating_sub(5)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&mode))?;

    if rules.persistent {
        let total = format!("Total Points: {}", store.total_points());
        out.queue(cursor::MoveTo(
            cx.saturating_sub(total.chars().count() as u16 / 2),
            cy.saturating_sub(4),
        ))?;
        out.queue(style::SetForegroundColor(Color::Magenta))?;
        out.queue(Print(&total))?;
    }

    let mut options: Vec<(&str, &str)> = vec![("N", "New game")];
    if saved {
        options.push(("C", "Continue"));
    }
    options.push(("Q", "Quit"));

    for (i, (key, label)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(8), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(*label))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(20), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Mouse : Touch"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit); // input thread gone
        };
        if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev {
            match code {
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter => {
                    return Ok(MenuResult::NewGame);
                }
                KeyCode::Char('c') | KeyCode::Char('C') => {
                    if saved {
                        return Ok(MenuResult::Continue);
                    }
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LoopExit {
    Quit,
    Title,
}

fn handle_shop_key(state: &mut GameState, hud: &mut Hud, code: KeyCode) {
    match code {
        KeyCode::Char(c @ '1'..='9') => {
            let slot = c as usize - '1' as usize;
            let Some(&kind) = state.rules.offered.get(slot) else {
                return;
            };
            match purchase_upgrade(state, kind) {
                Ok(next) => {
                    *state = next;
                    hud.message = None;
                }
                Err(rejected) => {
                    tracing::debug!("purchase rejected: {rejected}");
                    if state.rules.announce_rejections {
                        hud.message = Some(rejected.to_string());
                    }
                }
            }
        }
        KeyCode::Esc | KeyCode::Char('u') | KeyCode::Char('U') => {
            *state = close_upgrades(state);
            if state.status == GameStatus::Playing {
                hud.message = None;
            }
        }
        _ => {}
    }
}

/// Runs one session until the player quits or returns to the title.
///
/// Input model: held keys are tracked as "last frame seen" so movement and
/// fire can be held together; mouse press/drag acts as a touch pointer.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    store: &mut FileStore,
    frame_len: Duration,
    rng: &mut StdRng,
) -> anyhow::Result<LoopExit> {
    let mut hud = Hud {
        total_points: store.total_points(),
        message: None,
    };
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut pointer: Option<f32> = None;
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let (cols, rows) = terminal::size()?;
        let view = Viewport::new(cols, rows, state);

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                            return Ok(LoopExit::Quit);
                        }
                        match state.status {
                            GameStatus::Playing => match code {
                                KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(LoopExit::Quit),
                                KeyCode::Char('u') | KeyCode::Char('U')
                                    if state.rules.gate == GatePolicy::Manual =>
                                {
                                    *state = open_upgrades(state);
                                }
                                KeyCode::Char('s') | KeyCode::Char('S') if state.rules.persistent => {
                                    store
                                        .write_save(&SaveRecord::from_state(state))
                                        .context("saving game")?;
                                    return Ok(LoopExit::Title);
                                }
                                _ => {}
                            },
                            GameStatus::UpgradeOpen => handle_shop_key(state, &mut hud, code),
                            GameStatus::GameOver => match code {
                                KeyCode::Char('r') | KeyCode::Char('R') => return Ok(LoopExit::Title),
                                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                    return Ok(LoopExit::Quit);
                                }
                                _ => {}
                            },
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent { kind, column, .. }) => match kind {
                    MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
                        pointer = Some(view.world_x(column));
                    }
                    MouseEventKind::Up(MouseButton::Left) => pointer = None,
                    _ => {}
                },
                _ => {}
            }
        }

        // ── Simulation step ───────────────────────────────────────────────────
        let now = Instant::now();
        let dt_ms = now.duration_since(last_frame).as_secs_f64() * 1000.0;
        last_frame = now;

        if state.status == GameStatus::Playing {
            let input = InputState {
                left: is_held(&key_frame, &KeyCode::Left, frame)
                    || is_held(&key_frame, &KeyCode::Char('a'), frame)
                    || is_held(&key_frame, &KeyCode::Char('A'), frame),
                right: is_held(&key_frame, &KeyCode::Right, frame)
                    || is_held(&key_frame, &KeyCode::Char('d'), frame)
                    || is_held(&key_frame, &KeyCode::Char('D'), frame),
                fire: is_held(&key_frame, &KeyCode::Char(' '), frame),
                pointer,
            };
            *state = tick(state, &input, dt_ms, rng);

            if state.status == GameStatus::GameOver && state.rules.persistent {
                hud.total_points = settle_game_over(store, state).context("recording game over")?;
            }
        }

        display::render(out, state, &hud)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config_path = args.config.clone().unwrap_or_else(GameConfig::default_path);
    let mut config = GameConfig::load_or_default(&config_path);
    if let Some(variant) = args.variant {
        config.variant = variant.into();
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.save_dir.is_some() {
        config.save_dir = args.save_dir.clone();
    }
    tracing::info!(variant = ?config.variant, seed = ?config.seed, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &GameConfig) -> anyhow::Result<()> {
    let rules = config.rules();
    let mut store = FileStore::new(config.save_dir.clone().unwrap_or_else(FileStore::default_dir));
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_len = Duration::from_millis(config.frame_ms.max(1));

    loop {
        let mut state = match show_menu(out, rx, &rules, &store)? {
            MenuResult::Quit => break,
            MenuResult::NewGame => init_state(rules.clone()),
            MenuResult::Continue => match take_save(&mut store).context("consuming the saved game")? {
                Some(record) => continue_state(rules.clone(), &record),
                None => init_state(rules.clone()),
            },
        };
        match game_loop(out, &mut state, rx, &mut store, frame_len, &mut rng)? {
            LoopExit::Quit => break,
            LoopExit::Title => {}
        }
    }
    Ok(())
}
