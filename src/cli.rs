use crate::engine::{Code, GameOutcome, GuessError, Score, outcome_message};
use crate::game_state::{GameInterface, UserAction};
use crate::settings::{
    MAX_GUESS_LIMIT, MIN_CODE_LENGTH, MIN_GUESS_LIMIT, Settings, SettingsError, SettingsSource,
    requires_duplicates,
};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Mastermind: crack a hidden numeric code
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of digits in the secret code
    #[arg(short = 'l', long = "length")]
    pub code_length: Option<usize>,

    /// Whether the secret code may repeat digits
    #[arg(short = 'd', long = "duplicates")]
    pub allow_duplicates: Option<bool>,

    /// Number of guesses allowed per game
    #[arg(short = 'g', long = "limit")]
    pub guess_limit: Option<u32>,

    /// Path to the settings file
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<PathBuf>,

    /// Edit and save the settings before playing
    #[arg(long)]
    pub configure: bool,

    /// Save the effective settings, including command-line overrides
    #[arg(long)]
    pub save: bool,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Seed for reproducible secret codes
    #[arg(long)]
    pub seed: Option<u64>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

impl Cli {
    /// Layers the command-line overrides on top of the stored settings.
    pub fn resolve_settings(&self, stored: &Settings) -> Result<Settings, SettingsError> {
        let settings =
            stored.with_overrides(self.code_length, self.allow_duplicates, self.guess_limit)?;
        if settings.allow_duplicates()
            && !stored.allow_duplicates()
            && self.allow_duplicates.is_none()
        {
            println!("Duplicates required.");
        }
        Ok(settings)
    }
}

/// English ordinal for `n`: 1st, 2nd, 3rd, 4th, 11th, 21st, 112th, ...
#[must_use]
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

// UI Input/Output functions

/// Reads one line with the line ending stripped. `None` at end of input.
fn read_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn prompt(text: &str) {
    print!("{text}");
    // A failed flush only delays the prompt
    io::stdout().flush().ok();
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Asks a yes/no question until answered. `None` at end of input.
pub fn read_yes_no<R: BufRead>(reader: &mut R, question: &str) -> Option<bool> {
    loop {
        prompt(question);
        let input = read_line(reader)?;
        match parse_yes_no(&input) {
            Some(answer) => return Some(answer),
            None => println!("Invalid input, please try again."),
        }
    }
}

pub fn display_settings_source(source: &SettingsSource, settings: &Settings) {
    match source {
        SettingsSource::File(_) => println!("Previously set parameters identified."),
        SettingsSource::Defaults => {
            println!("No previous parameters found, default settings used.");
        }
    }
    println!("{settings}");
}

/// Interactive settings editor. `None` if input ends before all answers are in.
pub fn prompt_settings<R: BufRead>(reader: &mut R) -> Option<Settings> {
    let code_length = loop {
        prompt("How many digits should the code have? ");
        match read_line(reader)?.trim().parse::<usize>() {
            Ok(length) if length >= MIN_CODE_LENGTH => break length,
            Ok(_) => println!(
                "Invalid length, must be at least {MIN_CODE_LENGTH}. Please try again."
            ),
            Err(_) => println!("Invalid length, must be an integer. Please try again."),
        }
    };

    let allow_duplicates = if requires_duplicates(code_length) {
        println!("Duplicates required.");
        true
    } else {
        read_yes_no(reader, "Are duplicate digits allowed? (Y/N) ")?
    };

    let guess_limit = loop {
        prompt("How many guesses are allowed? ");
        match read_line(reader)?.trim().parse::<u32>() {
            Ok(limit) if (MIN_GUESS_LIMIT..=MAX_GUESS_LIMIT).contains(&limit) => break limit,
            Ok(_) => println!(
                "Invalid limit, must be between {MIN_GUESS_LIMIT} and {MAX_GUESS_LIMIT}. Please try again."
            ),
            Err(_) => println!("Invalid limit, must be an integer. Please try again."),
        }
    };

    Settings::new(code_length, allow_duplicates, guess_limit).ok()
}

pub fn display_saved_message() {
    println!("Parameters saved!\n");
}

/// CLI implementation of the `GameInterface` trait
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn read_guess(&mut self, attempt: u32, _code_length: usize) -> UserAction {
        prompt(&format!("Enter your {} guess: ", ordinal(attempt)));
        let Some(input) = read_line(&mut self.reader) else {
            return UserAction::Exit;
        };
        match input.trim().to_lowercase().as_str() {
            "exit" | "quit" => UserAction::Exit,
            "next" | "new" => UserAction::NewGame,
            _ => UserAction::Guess(input),
        }
    }

    fn display_invalid_guess(&mut self, error: &GuessError) {
        println!("Invalid guess ({error}), try again.");
    }

    fn display_score(&mut self, _attempt: u32, _guess: &Code, score: &Score) {
        println!("Correct number AND position: {}", score.exact);
        println!("Correct number, wrong position: {}\n", score.value);
    }

    fn display_outcome(&mut self, outcome: &GameOutcome) {
        println!("{}", outcome_message(outcome));
    }

    fn read_play_again(&mut self) -> bool {
        let again = read_yes_no(&mut self.reader, "\nPlay again? (Y/N) ").unwrap_or(false);
        println!();
        again
    }

    fn display_new_game_message(&mut self, settings: &Settings) {
        let duplicates = if settings.allow_duplicates() {
            "enabled"
        } else {
            "disabled"
        };
        println!(
            "Code generated - length: {}, duplicates {}",
            settings.code_length(),
            duplicates
        );
        println!("Guess limit: {}\n", settings.guess_limit());
    }

    fn display_exit_message(&mut self) {
        println!("Thanks for playing!");
    }
}
