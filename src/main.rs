#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::sync::Arc;
use std::time::{Duration, Instant};

use blockfall::app::{App, AppResult};
use blockfall::config::Config;
use blockfall::engine::Engine;
use blockfall::sound::AudioState;
use blockfall::ui;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it
    let log_path = "blockfall.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    // Safety: both descriptors are open for the duration of the call
    unsafe {
        libc::dup2(log_file.as_raw_fd(), io::stderr().as_raw_fd());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Blockfall");

    let config = Config::load_or_default();

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Key release events need the enhancement flags; not every terminal has them
    let keyboard_enhancement_active = matches!(supports_keyboard_enhancement(), Ok(true))
        && execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .is_ok();
    debug!("Keyboard enhancement active: {keyboard_enhancement_active}");

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let engine = Arc::new(Engine::new());
    let mut app = App::new(engine, config.gameplay, Instant::now())
        .with_audio(AudioState::new(&config.audio));
    app.keyboard_enhancement_active = keyboard_enhancement_active;

    let res = run_app(&mut terminal, &mut app, Duration::from_millis(16));

    // Restore terminal
    if keyboard_enhancement_active {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    info!("Final score: {}", app.engine.score());
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_rate: Duration,
) -> AppResult<()> {
    // Flush any pending input events that might be in the buffer
    while event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    let mut audio_error_logged = false;

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(frame_rate)? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {key:?}");
                app.handle_key(key, Instant::now());
            }
        }

        if app.should_quit {
            return Ok(());
        }

        if !audio_error_logged && app.audio.as_ref().is_some_and(|a| !a.is_audio_available()) {
            error!("Audio device is unavailable. Continuing without sound.");
            audio_error_logged = true;
        }

        app.on_tick(Instant::now());
    }
}
