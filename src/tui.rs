//! TUI (Terminal User Interface) module for Mastermind
//!
//! This module provides an interactive terminal interface using Ratatui.
//!
//! # State Machine
//! - `EnteringGuess`: digits are typed into the input row; ENTER submits
//! - `GameOver`: the secret is revealed; N starts a new game, ESC quits

use crate::engine::{Code, GameOutcome, GuessError, Progress, Score, outcome_message};
use crate::game_state::{GameInterface, UserAction};
use crate::settings::{Settings, SettingsSource};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 1;
const ASCII_CONTROL_CHAR_THRESHOLD: u32 = 32;
const EXACT_PEG: &str = "●";
const VALUE_PEG: &str = "○";

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const CELL_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);

#[derive(Debug)]
struct GuessRow {
    attempt: u32,
    guess: String,
    score: Score,
}

#[derive(Debug, PartialEq)]
enum TuiState {
    EnteringGuess,
    /// Game has ended - the outcome text is stored in interface.message
    GameOver,
}

/// Result of feeding one key to the guess input row.
#[derive(Debug, PartialEq)]
enum InputEdit {
    Changed,
    Submit(String),
    Rejected(String),
    Ignored,
}

/// Applies `key` to the guess being typed, capped at `code_length` digits.
fn edit_guess_input(input: &mut String, key: KeyCode, code_length: usize) -> InputEdit {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() && input.len() < code_length => {
            input.push(c);
            InputEdit::Changed
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            InputEdit::Rejected(format!("The code only has {code_length} digits!"))
        }
        KeyCode::Char(c) => {
            InputEdit::Rejected(format!("Only digits are allowed! ('{c}' is not a digit)"))
        }
        KeyCode::Backspace if !input.is_empty() => {
            input.pop();
            InputEdit::Changed
        }
        KeyCode::Enter => InputEdit::Submit(std::mem::take(input)),
        _ => InputEdit::Ignored,
    }
}

fn peg_spans(score: &Score) -> Vec<Span<'static>> {
    vec![
        Span::styled(EXACT_PEG.repeat(score.exact), SUCCESS_STYLE),
        Span::styled(VALUE_PEG.repeat(score.value), INFO_STYLE),
        Span::raw(format!(
            "  {} exact, {} misplaced",
            score.exact, score.value
        )),
    ]
}

fn settings_summary(settings: &Settings) -> String {
    format!(
        "Length {} | duplicates {} | {} guesses",
        settings.code_length(),
        if settings.allow_duplicates() { "on" } else { "off" },
        settings.guess_limit()
    )
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    guesses: &'a [GuessRow],
    current_input: &'a str,
    state: &'a TuiState,
    code_length: usize,
    settings_line: &'a str,
    source_line: &'a str,
    message: &'a str,
    error_message: &'a str,
    status: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    guesses: Vec<GuessRow>,
    current_input: String,
    state: TuiState,
    code_length: usize,
    settings_line: String,
    source_line: String,
    message: String,
    error_message: String,
    status: String,
}

impl TuiInterface {
    pub fn new(source: &SettingsSource) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        let source_line = match source {
            SettingsSource::File(path) => format!("Settings loaded from {}", path.display()),
            SettingsSource::Defaults => "No saved settings, using defaults".to_string(),
        };

        Ok(Self {
            terminal,
            guesses: Vec::new(),
            current_input: String::new(),
            state: TuiState::EnteringGuess,
            code_length: 0,
            settings_line: String::new(),
            source_line,
            message: String::new(),
            error_message: String::new(),
            status: "Ready to start".to_string(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            guesses: &self.guesses,
            current_input: &self.current_input,
            state: &self.state,
            code_length: self.code_length,
            settings_line: &self.settings_line,
            source_line: &self.source_line,
            message: &self.message,
            error_message: &self.error_message,
            status: &self.status,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(6),    // Game board
                Constraint::Length(8), // Info panel
                Constraint::Length(3), // Status line
                Constraint::Length(3), // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0]);
        Self::render_board(f, chunks[1], ctx);
        Self::render_info(f, chunks[2], ctx);
        Self::render_status(f, chunks[3], ctx.status);
        Self::render_instructions(f, chunks[4], ctx.state);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new("MASTERMIND")
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default()
            .title("Guesses")
            .borders(Borders::ALL)
            .style(Style::default());

        let inner = block.inner(area);
        f.render_widget(block, area);

        let available_rows = (inner.height / ROW_SPACING) as usize;
        let showing_current_input = *ctx.state == TuiState::EnteringGuess;
        let rows_needed = ctx.guesses.len() + usize::from(showing_current_input);

        // Keep the most recent guesses visible
        let skip_count = rows_needed.saturating_sub(available_rows);

        for (display_index, row) in ctx.guesses.iter().skip(skip_count).enumerate() {
            Self::render_guess_row(f, row, display_index, inner);
        }

        if showing_current_input && available_rows > 0 {
            let display_row = (ctx.guesses.len() - skip_count).min(available_rows - 1);
            Self::render_current_input(f, display_row, inner, ctx.current_input, ctx.code_length);
        }
    }

    fn digit_cells(text: &str, code_length: usize) -> Vec<Span<'static>> {
        let mut spans = Vec::with_capacity(code_length * 2);
        for i in 0..code_length {
            let digit = text.chars().nth(i).unwrap_or(' ');
            spans.push(Span::styled(format!(" {digit} "), CELL_STYLE));
            spans.push(Span::raw(" "));
        }
        spans
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_guess_row(f: &mut Frame, row: &GuessRow, row_index: usize, area: Rect) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw(format!("{:>3}. ", row.attempt))];
        spans.extend(Self::digit_cells(&row.guess, row.guess.len()));
        spans.push(Span::raw(" "));
        spans.extend(peg_spans(&row.score));

        Self::render_line(f, area, y, spans);
    }

    fn render_line(f: &mut Frame, area: Rect, y: u16, spans: Vec<Span>) {
        let line = Line::from(spans);
        let paragraph = Paragraph::new(line);
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_current_input(
        f: &mut Frame,
        row_index: usize,
        area: Rect,
        current_input: &str,
        code_length: usize,
    ) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = vec![Span::raw("  >  ")];
        spans.extend(Self::digit_cells(current_input, code_length));
        Self::render_line(f, area, y, spans);
    }

    fn render_info(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = vec![
            Line::from(vec![Span::styled(ctx.settings_line, HEADER_STYLE)]),
            Line::from(ctx.source_line),
            Line::from(""),
        ];

        if !ctx.message.is_empty() {
            for text in ctx.message.lines() {
                lines.push(Line::from(vec![Span::styled(text, MESSAGE_STYLE)]));
            }
        }

        if !ctx.error_message.is_empty() {
            lines.push(Line::from(vec![Span::styled(ctx.error_message, ERROR_STYLE)]));
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Information").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, state: &TuiState) {
        let text = match state {
            TuiState::EnteringGuess => {
                "Type digits | ENTER: Submit | BACKSPACE: Delete | N: New game | ESC: Quit"
            }
            TuiState::GameOver => "N: New Game | ESC: Quit",
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, status: &str) {
        let status_text = if status.is_empty() { "Ready" } else { status };
        let paragraph = Paragraph::new(status_text)
            .style(HEADER_STYLE)
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            debug_log!("handle_input() - Ignoring non-key event");
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != event::KeyEventKind::Press {
            return Ok(None);
        }

        // Alt-tab can leak replacement and control characters from escape sequences
        if let KeyCode::Char(c) = key.code
            && (c == '\u{FFFD}' || (c as u32) < ASCII_CONTROL_CHAR_THRESHOLD)
        {
            debug_log!("handle_input() - Ignoring invalid character: {:?}", c);
            return Ok(None);
        }

        if Self::has_modifier_keys(&key) {
            debug_log!("handle_input() - Ignoring key with modifier: {:?}", key.modifiers);
            return Ok(None);
        }

        Ok(match self.state {
            TuiState::EnteringGuess => self.handle_guess_input(key),
            TuiState::GameOver => Self::handle_game_over_input(key),
        })
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        match key.code {
            KeyCode::Esc => {
                info_log!("handle_guess_input() - ESC pressed, returning Exit");
                return Some(UserAction::Exit);
            }
            KeyCode::Char('n' | 'N') => {
                info_log!("handle_guess_input() - New game requested");
                return Some(UserAction::NewGame);
            }
            _ => {}
        }

        match edit_guess_input(&mut self.current_input, key.code, self.code_length) {
            InputEdit::Submit(guess) => {
                info_log!("handle_guess_input() - Submitting guess: '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            InputEdit::Rejected(message) => {
                debug_log!("handle_guess_input() - {}", message);
                self.error_message = message;
            }
            InputEdit::Changed => {
                debug_log!("handle_guess_input() - Input now '{}'", self.current_input);
            }
            InputEdit::Ignored => {}
        }
        None
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::NewGame),
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => Some(UserAction::Exit),
            _ => None,
        }
    }

    /// Blocks until the player produces an action. Terminal failures end the session.
    fn wait_for_action(&mut self) -> UserAction {
        loop {
            if self.draw().is_err() {
                info_log!("wait_for_action() - Draw failed, returning Exit");
                return UserAction::Exit;
            }

            match self.handle_input() {
                Ok(Some(action)) => return action,
                Ok(None) => {}
                Err(e) => {
                    info_log!("wait_for_action() - Input error: {}", e);
                    return UserAction::Exit;
                }
            }
        }
    }
}

impl GameInterface for TuiInterface {
    fn read_guess(&mut self, attempt: u32, code_length: usize) -> UserAction {
        self.code_length = code_length;
        self.state = TuiState::EnteringGuess;
        self.status = format!("Guess {attempt} - enter {code_length} digits");
        let action = self.wait_for_action();
        info_log!("read_guess() - Action received: {:?}", action);
        action
    }

    fn display_invalid_guess(&mut self, error: &GuessError) {
        self.error_message = format!("Invalid guess: {error}");
        self.draw_or_log();
    }

    fn display_score(&mut self, attempt: u32, guess: &Code, score: &Score) {
        self.guesses.push(GuessRow {
            attempt,
            guess: guess.to_string(),
            score: *score,
        });
        self.status = format!(
            "Guess {attempt}: {} exact, {} misplaced",
            score.exact, score.value
        );
        self.draw_or_log();
    }

    fn display_outcome(&mut self, outcome: &GameOutcome) {
        self.state = TuiState::GameOver;
        self.message = outcome_message(outcome);
        self.status = match outcome.progress {
            Progress::Won { attempts } => format!("Solved in {attempts} - Game Over"),
            Progress::Exhausted | Progress::Continue => "Out of guesses - Game Over".to_string(),
        };
        self.draw_or_log();
    }

    fn read_play_again(&mut self) -> bool {
        self.state = TuiState::GameOver;
        loop {
            match self.wait_for_action() {
                UserAction::NewGame => return true,
                UserAction::Exit => return false,
                UserAction::Guess(_) => {}
            }
        }
    }

    fn display_new_game_message(&mut self, settings: &Settings) {
        self.guesses.clear();
        self.current_input.clear();
        self.error_message.clear();
        self.code_length = settings.code_length();
        self.settings_line = settings_summary(settings);
        self.state = TuiState::EnteringGuess;
        self.message = "New code generated. Good luck!".to_string();
        self.status = "New game - Enter your first guess".to_string();
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.message = "Thanks for playing!".to_string();
        self.status = "Exiting application...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
