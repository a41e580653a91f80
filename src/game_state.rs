use crate::engine::{
    Code, GameOutcome, GuessError, Progress, Score, classify_outcome, generate_code, parse_guess,
    score_guess,
};
use crate::settings::Settings;
use crate::{debug_log, info_log};
use rand::Rng;
use thiserror::Error;

/// What the player asked for at a guess prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAction {
    /// Raw, unvalidated guess text
    Guess(String),
    NewGame,
    Exit,
}

/// Front-end seam between the game loop and the player.
///
/// Implementations do all prompting and rendering; the loop owns validation,
/// scoring and the attempt counter.
pub trait GameInterface {
    fn read_guess(&mut self, attempt: u32, code_length: usize) -> UserAction;
    fn display_invalid_guess(&mut self, error: &GuessError);
    fn display_score(&mut self, attempt: u32, guess: &Code, score: &Score);
    fn display_outcome(&mut self, outcome: &GameOutcome);
    fn read_play_again(&mut self) -> bool;
    fn display_new_game_message(&mut self, settings: &Settings);
    fn display_exit_message(&mut self);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("the game is already over")]
    Finished,
}

/// One game: the secret plus the attempt counter.
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    secret: Code,
    attempt: u32,
    progress: Progress,
}

impl Session {
    pub fn new<R: Rng>(settings: Settings, rng: &mut R) -> Self {
        let secret = generate_code(rng, settings.code_length(), settings.allow_duplicates());
        Self::with_secret(settings, secret)
    }

    /// Starts a game against a known secret of `settings.code_length()` digits.
    #[must_use]
    pub fn with_secret(settings: Settings, secret: Code) -> Self {
        debug_assert_eq!(secret.len(), settings.code_length());
        Self {
            settings,
            secret,
            attempt: 1,
            progress: Progress::Continue,
        }
    }

    /// Number of the guess being awaited, or of the final guess once finished.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self.progress, Progress::Won { .. })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress != Progress::Continue
    }

    #[must_use]
    pub fn secret(&self) -> &Code {
        &self.secret
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scores a validated guess and advances the game.
    pub fn submit(&mut self, guess: &Code) -> Result<(Score, Progress), SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        let score = score_guess(&self.secret, guess);
        let progress = classify_outcome(
            self.attempt,
            self.settings.guess_limit(),
            score.is_win(self.settings.code_length()),
        );
        debug_log!(
            "Attempt {} scored {:?} -> {:?}",
            self.attempt,
            score,
            progress
        );
        if progress == Progress::Continue {
            self.attempt += 1;
        }
        self.progress = progress;
        Ok((score, progress))
    }

    /// The final result, once the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.is_finished().then(|| GameOutcome {
            secret: self.secret.clone(),
            progress: self.progress,
            limit: self.settings.guess_limit(),
        })
    }
}

/// Tally across every game played in one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Games that ended in a win or an exhausted budget
    pub games_finished: u32,
    pub games_won: u32,
}

enum GameEnd {
    Finished(GameOutcome),
    NewGame,
    Exit,
}

pub fn game_loop<I: GameInterface, R: Rng>(
    settings: &Settings,
    rng: &mut R,
    interface: &mut I,
) -> SessionSummary {
    let mut summary = SessionSummary::default();

    loop {
        let mut session = Session::new(*settings, rng);
        info_log!(
            "New game: length {}, duplicates {}, limit {}",
            settings.code_length(),
            settings.allow_duplicates(),
            settings.guess_limit()
        );
        interface.display_new_game_message(settings);

        match play_game(&mut session, interface) {
            GameEnd::Exit => break,
            GameEnd::NewGame => continue,
            GameEnd::Finished(outcome) => {
                summary.games_finished += 1;
                if matches!(outcome.progress, Progress::Won { .. }) {
                    summary.games_won += 1;
                }
                interface.display_outcome(&outcome);
                if !interface.read_play_again() {
                    break;
                }
            }
        }
    }

    interface.display_exit_message();
    info_log!(
        "Session over: {} finished, {} won",
        summary.games_finished,
        summary.games_won
    );
    summary
}

fn play_game<I: GameInterface>(session: &mut Session, interface: &mut I) -> GameEnd {
    let code_length = session.settings().code_length();

    while !session.is_finished() {
        let attempt = session.attempt();
        let raw = match interface.read_guess(attempt, code_length) {
            UserAction::Exit => return GameEnd::Exit,
            UserAction::NewGame => return GameEnd::NewGame,
            UserAction::Guess(raw) => raw,
        };

        let guess = match parse_guess(&raw, code_length) {
            Ok(guess) => guess,
            Err(e) => {
                debug_log!("Rejected guess '{}': {}", raw, e);
                interface.display_invalid_guess(&e);
                continue;
            }
        };

        match session.submit(&guess) {
            Ok((score, _)) => interface.display_score(attempt, &guess, &score),
            Err(e) => {
                debug_log!("Guess submitted after game end: {}", e);
                break;
            }
        }
    }

    session
        .outcome()
        .map_or(GameEnd::Exit, GameEnd::Finished)
}
