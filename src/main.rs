mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use banjo_attack::config;
use banjo_attack::geometry::{FrameContext, GameTime};
use banjo_attack::input::InputSnapshot;
use banjo_attack::session::{Directive, Session};
use banjo_attack::sound::{Sound, SoundSink};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Covers terminals that never report key releases: OS key
/// repeat runs at ≥ 15 Hz, so 8 frames (≈133 ms) is refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Translate held keys into the core's intents.
fn snapshot(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputSnapshot {
    use crossterm::event::KeyCode::{Char, Down, Left, Right, Up};
    InputSnapshot {
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        shoot: any_held(key_frame, &[Char(' ')], frame),
        pause: any_held(key_frame, &[Char('p'), Char('P')], frame),
        save: any_held(key_frame, &[Char('g'), Char('G')], frame),
        quit: false,
        any_key: key_frame
            .values()
            .any(|&last| frame.saturating_sub(last) <= HOLD_WINDOW),
    }
}

// ── Sound ─────────────────────────────────────────────────────────────────────

/// No audio device in a terminal: log every trigger and ring the bell on death.
#[derive(Default)]
struct TerminalSound {
    bell: bool,
}

impl TerminalSound {
    fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }
}

impl SoundSink for TerminalSound {
    fn play(&mut self, sound: Sound) {
        debug!(?sound, "sound");
        if sound == Sound::Death {
            self.bell = true;
        }
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw alternate-screen mode, so logs go to a file or
/// nowhere.
fn init_tracing() {
    let Some(path) = config::log_file() else {
        return;
    };
    let Ok(file) = File::create(&path) else {
        return;
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_writer(Mutex::new(file))
        .init();
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or saves successfully.
fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> io::Result<()> {
    let mut rng = match config::rng_seed() {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut sound = TerminalSound::default();
    let save_path = config::save_path();

    let (cols, rows) = terminal::size()?;
    let viewport = display::viewport_for(cols, rows);
    let clock = Instant::now();
    let start = FrameContext::new(GameTime::default(), viewport);
    let mut session = Session::restore_or_new(&save_path, &start)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    sound.play(Sound::MusicPlay);
    info!(width = viewport.width, height = viewport.height, "session started");

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last_total_ms: i64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut quit = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    let ctrl_c =
                        code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL);
                    if code == KeyCode::Esc || ctrl_c {
                        quit = true;
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }
        key_frame.retain(|_, &mut last| frame.saturating_sub(last) <= HOLD_WINDOW);

        let mut input = snapshot(&key_frame, frame);
        input.quit = quit;

        let total_ms = clock.elapsed().as_millis() as i64;
        let ctx = FrameContext::new(GameTime::new(total_ms, total_ms - last_total_ms), viewport);
        last_total_ms = total_ms;

        match session.tick(&input, &ctx, &mut rng, &mut sound) {
            Directive::Continue => {}
            Directive::Quit => return Ok(()),
            Directive::SaveAndQuit => match session.save(&save_path, total_ms) {
                Ok(()) => return Ok(()),
                Err(err) => warn!(%err, "game not saved, still playing"),
            },
        }

        display::render(out, &session, cols, rows, sound.take_bell())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Key-release events make pause/save edges exact; others fall back to
    // the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the game loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
