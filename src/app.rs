#![warn(clippy::all, clippy::pedantic)]

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{debug, info};
use std::error;
use std::sync::Arc;
use std::time::Instant;

use crate::config::GameplayConfig;
use crate::engine::{Engine, Step};
use crate::game::VOLUME_STEP;
use crate::sound::AudioState;
use crate::timer::DropTimer;

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

/// Input dispatcher and timer owner. Holds a shared handle to the engine; the
/// render loop reads from the same handle.
pub struct App {
    pub engine: Arc<Engine>,
    pub config: GameplayConfig,
    pub audio: Option<AudioState>,
    pub should_quit: bool,
    pub keyboard_enhancement_active: bool,
    gravity: DropTimer,
    soft_drop: DropTimer,
    last_down_activity: Instant,
    game_over_handled: bool,
    resume_music: bool,
}

impl App {
    pub fn new(engine: Arc<Engine>, config: GameplayConfig, now: Instant) -> Self {
        let mut gravity = DropTimer::new();
        gravity.start(now, config.drop_interval(engine.level()));

        Self {
            engine,
            config,
            audio: None,
            should_quit: false,
            keyboard_enhancement_active: false,
            gravity,
            soft_drop: DropTimer::new(),
            last_down_activity: now,
            game_over_handled: false,
            resume_music: false,
        }
    }

    #[must_use]
    pub fn with_audio(mut self, audio: AudioState) -> Self {
        self.audio = Some(audio);
        self
    }

    #[must_use]
    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop.is_running()
    }

    #[must_use]
    pub fn is_gravity_running(&self) -> bool {
        self.gravity.is_running()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            if key.code == KeyCode::Down {
                self.soft_drop.stop();
            }
            return;
        }

        let game_over = self.engine.is_game_over();
        match key.code {
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('m' | 'M') => {
                if let Some(audio) = self.audio.as_mut() {
                    audio.toggle_music();
                }
            }
            KeyCode::Char('+' | '=') => self.change_volume(VOLUME_STEP),
            KeyCode::Char('-' | '_') => self.change_volume(-VOLUME_STEP),
            KeyCode::Char('r' | 'R') => self.restart(now),
            KeyCode::Enter if game_over => self.restart(now),
            _ if game_over => {}
            KeyCode::Left => {
                self.engine.try_move(0, -1);
            }
            KeyCode::Right => {
                self.engine.try_move(0, 1);
            }
            KeyCode::Up => {
                self.engine.try_rotate();
            }
            KeyCode::Down => {
                // Terminal key repeat sends more presses; they only keep the hold alive
                if !self.soft_drop.is_running() {
                    self.soft_drop.start(now, self.config.soft_drop_delay());
                }
                self.last_down_activity = now;
            }
            _ => {}
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.engine.is_game_over() {
            self.handle_game_over();
            return;
        }

        if !self.keyboard_enhancement_active
            && self.soft_drop.is_running()
            && now.duration_since(self.last_down_activity) > self.config.key_release_timeout()
        {
            debug!("No key activity for soft drop, treating Down as released");
            self.soft_drop.stop();
        }

        if self.soft_drop.poll(now, self.config.soft_drop_interval()) {
            if let Step::Placed(_) = self.drop_step(now) {
                self.soft_drop.stop();
            }
        }

        let interval = self.config.drop_interval(self.engine.level());
        if self.gravity.poll(now, interval) {
            self.drop_step(now);
        }
    }

    fn drop_step(&mut self, now: Instant) -> Step {
        let step = self.engine.step_down();
        if let Step::Placed(placement) = step {
            if placement.level_up {
                info!("Level up: {}", self.engine.level());
            }
            // A fresh piece gets a full gravity interval before its first drop
            let interval = self.config.drop_interval(self.engine.level());
            self.gravity.start(now, interval);
        }
        step
    }

    fn change_volume(&mut self, delta: f32) {
        if let Some(audio) = self.audio.as_mut() {
            audio.set_volume(audio.get_volume() + delta);
            debug!("Volume set to {:.1}", audio.get_volume());
        }
    }

    fn handle_game_over(&mut self) {
        self.gravity.stop();
        self.soft_drop.stop();
        if self.game_over_handled {
            return;
        }
        self.game_over_handled = true;
        info!(
            "Game over with score {} at level {}",
            self.engine.score(),
            self.engine.level()
        );
        if let Some(audio) = self.audio.as_mut() {
            self.resume_music = audio.is_music_enabled();
            audio.stop_music();
        }
    }

    /// Starts a new game on the same engine handle.
    pub fn restart(&mut self, now: Instant) {
        self.engine.reset();
        self.soft_drop.stop();
        self.gravity
            .start(now, self.config.drop_interval(self.engine.level()));
        self.game_over_handled = false;
        if self.resume_music {
            if let Some(audio) = self.audio.as_mut() {
                audio.play_music();
            }
            self.resume_music = false;
        }
    }
}
