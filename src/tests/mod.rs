#![warn(clippy::all, clippy::pedantic)]

pub mod game_tests;
pub mod sound_tests;
pub mod timer_tests;
