// Library interface for mastermind
// This allows integration tests to access internal modules

pub mod cli;
pub mod engine;
pub mod game_state;
pub mod logging;
pub mod settings;
pub mod tui;

// Re-export commonly used functions for easier testing
pub use engine::{
    Code, GameOutcome, GuessError, Progress, Score, classify_outcome, generate_code,
    outcome_message, parse_guess, score_guess,
};
pub use game_state::{GameInterface, Session, SessionError, SessionSummary, UserAction, game_loop};
pub use settings::{Settings, SettingsError, SettingsSource, load_settings, save_settings};
