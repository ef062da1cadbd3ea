//! Top-level game mode
//!
//! Only `Playing` advances the simulation systems. Invalid transitions are
//! refused and reported as `false` rather than panicking.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GameOverCause {
    CaughtByGrue,
    /// Ended by the player or the host
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    MainMenu,
    Playing,
    Paused,
    GameOver(GameOverCause),
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::MainMenu => write!(f, "MainMenu"),
            GameMode::Playing => write!(f, "Playing"),
            GameMode::Paused => write!(f, "Paused"),
            GameMode::GameOver(cause) => write!(f, "GameOver({})", cause),
        }
    }
}

impl GameMode {
    pub fn is_playing(self) -> bool {
        self == GameMode::Playing
    }

    pub fn is_over(self) -> bool {
        matches!(self, GameMode::GameOver(_))
    }

    /// MainMenu -> Playing
    pub fn start(&mut self) -> bool {
        self.transition(GameMode::MainMenu, GameMode::Playing)
    }

    /// Playing -> Paused
    pub fn pause(&mut self) -> bool {
        self.transition(GameMode::Playing, GameMode::Paused)
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        self.transition(GameMode::Paused, GameMode::Playing)
    }

    /// Playing or Paused -> GameOver
    pub fn end(&mut self, cause: GameOverCause) -> bool {
        match *self {
            GameMode::Playing | GameMode::Paused => {
                info!("game over: {}", cause);
                *self = GameMode::GameOver(cause);
                true
            }
            _ => false,
        }
    }

    /// Any state except MainMenu -> MainMenu
    pub fn return_to_menu(&mut self) -> bool {
        if *self == GameMode::MainMenu {
            return false;
        }
        *self = GameMode::MainMenu;
        true
    }

    fn transition(&mut self, from: GameMode, to: GameMode) -> bool {
        if *self != from {
            return false;
        }
        *self = to;
        true
    }
}
