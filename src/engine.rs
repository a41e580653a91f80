use rand::Rng;
use std::fmt;
use thiserror::Error;

/// Size of the digit alphabet codes are drawn from.
pub const DIGIT_COUNT: u8 = 10;

/// An ordered sequence of decimal digits, used for both the secret and guesses.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Code(Vec<u8>);

impl Code {
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when no digit appears more than once.
    #[must_use]
    pub fn has_distinct_digits(&self) -> bool {
        let mut seen = [false; DIGIT_COUNT as usize];
        self.0.iter().all(|&d| !std::mem::replace(&mut seen[d as usize], true))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.0 {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

/// Peg feedback for a single guess.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    /// Right digit, right position.
    pub exact: usize,
    /// Right digit, wrong position.
    pub value: usize,
}

impl Score {
    #[must_use]
    pub fn is_win(&self, code_length: usize) -> bool {
        self.exact == code_length
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("guess is empty")]
    Empty,
    #[error("guess must be {expected} digits long, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("'{found}' at position {position} is not a digit")]
    NonDigit { position: usize, found: char },
}

/// Where a game stands after a scored guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Won { attempts: u32 },
    Exhausted,
}

/// Final result of a game, carrying the secret for the reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub secret: Code,
    pub progress: Progress,
    pub limit: u32,
}

/// Generates a secret of `length` digits.
///
/// Without duplicates every digit is drawn by rejection sampling against the
/// digits already accepted, which keeps all distinct codes equally likely.
/// Callers must not ask for more than ten distinct digits.
pub fn generate_code<R: Rng>(rng: &mut R, length: usize, allow_duplicates: bool) -> Code {
    debug_assert!(allow_duplicates || length <= DIGIT_COUNT as usize);
    let mut digits: Vec<u8> = Vec::with_capacity(length);
    for _ in 0..length {
        let digit = loop {
            let candidate = rng.random_range(0..DIGIT_COUNT);
            if allow_duplicates || !digits.contains(&candidate) {
                break candidate;
            }
        };
        digits.push(digit);
    }
    Code(digits)
}

/// Checks that `input` is exactly `length` ASCII digits.
///
/// Repeated digits are fine: only the secret is bound by the duplicates rule.
pub fn parse_guess(input: &str, length: usize) -> Result<Code, GuessError> {
    if input.is_empty() {
        return Err(GuessError::Empty);
    }
    if let Some((position, found)) = input.chars().enumerate().find(|(_, c)| !c.is_ascii_digit()) {
        return Err(GuessError::NonDigit { position, found });
    }
    // All ASCII from here, so bytes and chars line up.
    if input.len() != length {
        return Err(GuessError::WrongLength {
            expected: length,
            actual: input.len(),
        });
    }
    Ok(Code(input.bytes().map(|b| b - b'0').collect()))
}

/// Scores `guess` against `secret`.
///
/// Both codes must have the same length. Each secret position can be credited
/// to at most one guess digit across both passes.
#[must_use]
pub fn score_guess(secret: &Code, guess: &Code) -> Score {
    debug_assert_eq!(secret.len(), guess.len());
    let secret = secret.digits();
    let guess = guess.digits();
    let mut consumed = vec![false; secret.len()];
    let mut score = Score::default();

    // First pass: exact matches
    for (i, (g, s)) in guess.iter().zip(secret).enumerate() {
        if g == s {
            consumed[i] = true;
            score.exact += 1;
        }
    }

    // Second pass: claim one unconsumed occurrence per remaining guess digit
    for (j, g) in guess.iter().enumerate() {
        if secret[j] == *g {
            continue;
        }
        if let Some(k) = (0..secret.len()).find(|&k| !consumed[k] && secret[k] == *g) {
            consumed[k] = true;
            score.value += 1;
        }
    }
    score
}

/// Decides where a game stands after `attempt` guesses out of `limit`.
#[must_use]
pub fn classify_outcome(attempt: u32, limit: u32, won: bool) -> Progress {
    if won {
        Progress::Won { attempts: attempt }
    } else if attempt >= limit {
        Progress::Exhausted
    } else {
        Progress::Continue
    }
}

/// End-of-game message. Only meaningful for a finished game.
#[must_use]
pub fn outcome_message(outcome: &GameOutcome) -> String {
    match outcome.progress {
        Progress::Won { attempts } => format!(
            "{}\nCongratulations!\nYou used {} out of {} guesses.",
            outcome.secret, attempts, outcome.limit
        ),
        Progress::Exhausted | Progress::Continue => {
            format!("Guess limit reached. Too bad!\nSolution: {}", outcome.secret)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn code(s: &str) -> Code {
        parse_guess(s, s.len()).unwrap()
    }

    #[test]
    fn test_score_all_misplaced() {
        assert_eq!(score_guess(&code("482"), &code("248")), Score { exact: 0, value: 3 });
    }

    #[test]
    fn test_score_exact() {
        let score = score_guess(&code("482"), &code("482"));
        assert_eq!(score, Score { exact: 3, value: 0 });
        assert!(score.is_win(3));
    }

    #[test]
    fn test_score_repeated_guess_digit() {
        // Only two 1s in the secret, both claimed by exact matches
        assert_eq!(score_guess(&code("1123"), &code("1111")), Score { exact: 2, value: 0 });
    }

    #[test]
    fn test_score_single_secret_digit_claimed_once() {
        assert_eq!(score_guess(&code("5012"), &code("3555")), Score { exact: 0, value: 1 });
    }

    #[test]
    fn test_score_exact_takes_priority_over_value() {
        // The 7 at index 1 is an exact match; the guess's leading 7 has nothing left to claim
        assert_eq!(score_guess(&code("1734"), &code("7700")), Score { exact: 1, value: 0 });
    }

    #[test]
    fn test_score_repeated_secret_digit() {
        assert_eq!(score_guess(&code("1122"), &code("2211")), Score { exact: 0, value: 4 });
        assert_eq!(score_guess(&code("1122"), &code("1212")), Score { exact: 2, value: 2 });
    }

    #[test]
    fn test_score_no_overlap() {
        assert_eq!(score_guess(&code("0123"), &code("4567")), Score::default());
    }

    #[test]
    fn test_score_bounds_hold_for_random_codes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let secret = generate_code(&mut rng, 5, true);
            let guess = generate_code(&mut rng, 5, true);
            let score = score_guess(&secret, &guess);
            assert!(score.exact <= 5);
            assert!(score.exact + score.value <= 5);
            assert_eq!(score.is_win(5), secret == guess);
        }
    }

    #[test]
    fn test_score_permutation_of_distinct_digits() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let secret = generate_code(&mut rng, 6, false);
            let mut digits = secret.digits().to_vec();
            digits.rotate_left(2);
            let score = score_guess(&secret, &Code(digits));
            assert_eq!(score.exact + score.value, 6);
        }
    }

    #[test]
    fn test_generate_without_duplicates_is_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let secret = generate_code(&mut rng, 4, false);
            assert_eq!(secret.len(), 4);
            assert!(secret.has_distinct_digits(), "{secret} repeats a digit");
        }
    }

    #[test]
    fn test_generate_full_alphabet_without_duplicates() {
        let mut rng = StdRng::seed_from_u64(3);
        let secret = generate_code(&mut rng, 10, false);
        let mut digits = secret.digits().to_vec();
        digits.sort_unstable();
        assert_eq!(digits, (0..10).collect::<Vec<u8>>());
    }

    #[test]
    fn test_generate_with_duplicates_repeats_digits() {
        // P(4 distinct digits) = 0.504, so about half of all codes should repeat
        let mut rng = StdRng::seed_from_u64(99);
        let repeats = (0..10_000)
            .filter(|_| !generate_code(&mut rng, 4, true).has_distinct_digits())
            .count();
        assert!((4500..5400).contains(&repeats), "unexpected repeat count {repeats}");
    }

    #[test]
    fn test_generate_long_code_with_duplicates() {
        let mut rng = StdRng::seed_from_u64(5);
        let secret = generate_code(&mut rng, 15, true);
        assert_eq!(secret.len(), 15);
        assert!(secret.digits().iter().all(|&d| d < DIGIT_COUNT));
    }

    #[test]
    fn test_parse_guess_accepts_digits() {
        let guess = parse_guess("0912", 4).unwrap();
        assert_eq!(guess.digits(), &[0, 9, 1, 2]);
        assert_eq!(guess.to_string(), "0912");
    }

    #[test]
    fn test_parse_guess_allows_repeats() {
        assert!(parse_guess("7777", 4).is_ok());
    }

    #[test]
    fn test_parse_guess_rejections() {
        assert_eq!(parse_guess("", 4), Err(GuessError::Empty));
        assert_eq!(
            parse_guess("123", 4),
            Err(GuessError::WrongLength { expected: 4, actual: 3 })
        );
        assert_eq!(
            parse_guess("12345", 4),
            Err(GuessError::WrongLength { expected: 4, actual: 5 })
        );
        assert_eq!(
            parse_guess("12a4", 4),
            Err(GuessError::NonDigit { position: 2, found: 'a' })
        );
        assert_eq!(
            parse_guess("12-4", 4),
            Err(GuessError::NonDigit { position: 2, found: '-' })
        );
        assert_eq!(
            parse_guess("1 234", 4),
            Err(GuessError::NonDigit { position: 1, found: ' ' })
        );
        assert_eq!(
            parse_guess("+123", 4),
            Err(GuessError::NonDigit { position: 0, found: '+' })
        );
        // Unicode digits are not decimal ASCII digits
        assert!(matches!(parse_guess("١٢٣٤", 4), Err(GuessError::NonDigit { .. })));
    }

    #[test]
    fn test_classify_outcome() {
        assert_eq!(classify_outcome(10, 10, false), Progress::Exhausted);
        assert_eq!(classify_outcome(3, 10, true), Progress::Won { attempts: 3 });
        assert_eq!(classify_outcome(10, 10, true), Progress::Won { attempts: 10 });
        assert_eq!(classify_outcome(4, 10, false), Progress::Continue);
    }

    #[test]
    fn test_outcome_messages() {
        let won = GameOutcome {
            secret: code("482"),
            progress: Progress::Won { attempts: 2 },
            limit: 10,
        };
        let message = outcome_message(&won);
        assert!(message.starts_with("482"));
        assert!(message.contains("You used 2 out of 10 guesses."));

        let lost = GameOutcome {
            secret: code("482"),
            progress: Progress::Exhausted,
            limit: 10,
        };
        let message = outcome_message(&lost);
        assert!(message.contains("Guess limit reached"));
        assert!(message.ends_with("Solution: 482"));
    }
}
