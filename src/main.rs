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
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use elysian_grove::compute::{new_game, tick, TickInput};
use elysian_grove::config::{END_SCREEN_PAUSE_MS, TICK_MS};
use elysian_grove::entities::{GameStatus, World};
use elysian_grove::persistence;
use elysian_grove::GameError;

use display::Hud;

#[derive(Parser)]
#[command(name = "elysian-grove")]
#[command(about = "Collect fruits, fight night crawlers and outlast Malakar")]
struct Args {
    /// Save file written by S in game and read by L in the menu
    #[arg(long, default_value = "savegame.dat")]
    save_file: PathBuf,

    /// Log destination; the terminal itself belongs to the game
    #[arg(long, default_value = "elysian_grove.log")]
    log_file: PathBuf,

    /// Fixed RNG seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,
}

const FRAME: Duration = Duration::from_millis(TICK_MS); // ≈30 FPS

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between melee swings while Space is held.
/// 3 frames @ 30 FPS ≈ 10 swings/sec.
const ATTACK_COOLDOWN: u32 = 3;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn axis(key_frame: &HashMap<KeyCode, u64>, neg: KeyCode, pos: KeyCode, frame: u64) -> i8 {
    match (is_held(key_frame, &neg, frame), is_held(key_frame, &pos, frame)) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Play(World),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    save_file: &Path,
    rng: &mut StdRng,
) -> anyhow::Result<MenuResult> {
    let mut notice: Option<String> = None;

    loop {
        display::draw_menu(out, notice.as_deref())?;

        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. }) = event else {
            continue;
        };

        match code {
            KeyCode::Char('s') | KeyCode::Char('S') => {
                info!("new game");
                return Ok(MenuResult::Play(new_game(rng)));
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                let mut world = World::new();
                match persistence::load_game(&mut world, save_file) {
                    Ok(true) => return Ok(MenuResult::Play(world)),
                    Ok(false) => notice = Some("No saved game found".to_string()),
                    Err(e) => {
                        error!(error = %e, "load failed");
                        notice = Some(e.to_string());
                    }
                }
            }
            _ if is_quit(code, modifiers) => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
}

/// Whole milliseconds elapsed from `since` to `now`, and the instant they
/// reach. The sub-millisecond remainder stays on the clock for the next frame.
fn whole_millis_since(since: Instant, now: Instant) -> (u64, Instant) {
    let ms = now.saturating_duration_since(since).as_millis() as u64;
    (ms, since + Duration::from_millis(ms))
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Run until the player quits, dies or wins.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and apply all their effects simultaneously,
/// so diagonal movement and attacking while moving work together. One-shot
/// keys (special, pause, save) act on their press event.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
    save_file: &Path,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut attack_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let mut hud = Hud::default();
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut special = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    if is_quit(code, modifiers) {
                        info!("quit");
                        return Ok(());
                    }
                    match code {
                        KeyCode::Char('p') | KeyCode::Char('P') => hud.paused = !hud.paused,
                        KeyCode::Char('n') | KeyCode::Char('N') => special = true,
                        KeyCode::Char('s') | KeyCode::Char('S') => {
                            match persistence::save_game(world, save_file) {
                                Ok(()) => hud.notify("Game saved", Instant::now()),
                                Err(e) => {
                                    error!(error = %e, "save failed");
                                    hud.notify(format!("Save failed: {e}"), Instant::now());
                                }
                            }
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Advance the simulation ────────────────────────────────────────────
        if hud.paused {
            // Paused time never reaches the game clock.
            last_tick = Instant::now();
        } else {
            let attack = attack_cooldown == 0 && is_held(&key_frame, &KeyCode::Char(' '), frame);
            if attack {
                attack_cooldown = ATTACK_COOLDOWN;
            }
            let input = TickInput {
                dx: axis(&key_frame, KeyCode::Left, KeyCode::Right, frame),
                dy: axis(&key_frame, KeyCode::Up, KeyCode::Down, frame),
                attack,
                special,
            };
            let (dt, consumed) = whole_millis_since(last_tick, Instant::now());
            last_tick = consumed;
            tick(world, &input, dt, rng);
            hud.observe(&world.events, world.now);
        }
        attack_cooldown = attack_cooldown.saturating_sub(1);

        display::render(out, world, &hud)?;

        if world.status != GameStatus::Playing {
            info!(
                status = ?world.status,
                level = world.player.level,
                experience = world.player.experience,
                "game over"
            );
            thread::sleep(Duration::from_millis(END_SCREEN_PAUSE_MS));
            return Ok(());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let (width, height) = terminal::size()?;
    if width < display::MIN_WIDTH || height < display::MIN_HEIGHT {
        return Err(GameError::TerminalTooSmall {
            width,
            height,
            min_width: display::MIN_WIDTH,
            min_height: display::MIN_HEIGHT,
        }
        .into());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(seed = ?args.seed, save_file = %args.save_file.display(), "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
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

    let result = run(&mut out, &rx, &args.save_file, &mut rng);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        error!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    save_file: &Path,
    rng: &mut StdRng,
) -> anyhow::Result<()> {
    match show_menu(out, rx, save_file, rng)? {
        MenuResult::Quit => Ok(()),
        MenuResult::Play(mut world) => game_loop(out, &mut world, rx, save_file, rng),
    }
}
