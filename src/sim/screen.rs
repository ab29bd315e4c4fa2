//! Screen state machine for the menu-driven game
//!
//! Only transitions live here; drawing a screen is the renderer's job.

use serde::{Deserialize, Serialize};

use crate::platform::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Menu,
    HowTo,
    HighScores,
    Credits,
    Playing,
    GameOver,
}

/// Main menu entries, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuItem {
    Play,
    HowTo,
    HighScores,
    Credits,
    Quit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Play,
        MenuItem::HowTo,
        MenuItem::HighScores,
        MenuItem::Credits,
        MenuItem::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::HowTo => "How To Play",
            MenuItem::HighScores => "High Scores",
            MenuItem::Credits => "Credits",
            MenuItem::Quit => "Quit",
        }
    }
}

/// What the session has to do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    None,
    /// Reset the world and start playing
    NewGame,
    /// Continue the interrupted game
    Resume,
    /// Left play for the menu; enemies must be cleaned up
    LeaveGame,
    Quit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenState {
    screen: Screen,
    cursor: usize,
    /// No game in progress: the next Play starts fresh
    needs_new_game: bool,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Menu,
            cursor: 0,
            needs_new_game: true,
        }
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected(&self) -> MenuItem {
        MenuItem::ALL[self.cursor]
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.screen == Screen::Playing
    }

    /// Player ran out of lives
    pub fn game_over(&mut self) {
        self.screen = Screen::GameOver;
        self.needs_new_game = true;
    }

    pub fn handle_key(&mut self, key: Key) -> ScreenAction {
        match (self.screen, key) {
            (Screen::Menu, Key::Up) => {
                self.cursor = (self.cursor + MenuItem::ALL.len() - 1) % MenuItem::ALL.len();
                ScreenAction::None
            }
            (Screen::Menu, Key::Down) => {
                self.cursor = (self.cursor + 1) % MenuItem::ALL.len();
                ScreenAction::None
            }
            (Screen::Menu, Key::Enter) => self.activate(),
            (Screen::Menu, Key::Char('c')) => {
                self.screen = Screen::Credits;
                ScreenAction::None
            }
            (Screen::Credits, Key::Char('c')) => {
                self.screen = Screen::Menu;
                ScreenAction::None
            }
            (Screen::Playing, Key::Escape) => {
                self.screen = Screen::Menu;
                ScreenAction::LeaveGame
            }
            (Screen::HowTo | Screen::HighScores | Screen::Credits | Screen::GameOver, Key::Escape) => {
                self.screen = Screen::Menu;
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    fn activate(&mut self) -> ScreenAction {
        match self.selected() {
            MenuItem::Play => {
                self.screen = Screen::Playing;
                if std::mem::replace(&mut self.needs_new_game, false) {
                    ScreenAction::NewGame
                } else {
                    ScreenAction::Resume
                }
            }
            MenuItem::HowTo => {
                self.screen = Screen::HowTo;
                ScreenAction::None
            }
            MenuItem::HighScores => {
                self.screen = Screen::HighScores;
                ScreenAction::None
            }
            MenuItem::Credits => {
                self.screen = Screen::Credits;
                ScreenAction::None
            }
            MenuItem::Quit => ScreenAction::Quit,
        }
    }
}
