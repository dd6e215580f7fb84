pub mod app;
pub mod components;
pub mod config;
pub mod engine;
pub mod game;
pub mod sound;
pub mod timer;
pub mod ui;

pub use engine::{Engine, Placement, Snapshot, Step};

#[cfg(test)]
mod tests;
