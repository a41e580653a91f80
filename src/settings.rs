use crate::{debug_log, info_log};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CODE_LENGTH: usize = 4;
pub const DEFAULT_GUESS_LIMIT: u32 = 10;
pub const MIN_CODE_LENGTH: usize = 2;
/// Longest code that can be filled with distinct digits.
pub const MAX_DISTINCT_LENGTH: usize = 10;
pub const MIN_GUESS_LIMIT: u32 = 1;
pub const MAX_GUESS_LIMIT: u32 = 99;

const SETTINGS_DIR: &str = "mastermind";
const SETTINGS_FILE: &str = "settings.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("code length must be at least 2, got {0}")]
    CodeLengthTooShort(usize),
    #[error("guess limit must be between 1 and 99, got {0}")]
    GuessLimitOutOfRange(u32),
    #[error("a code of length {0} cannot be built without duplicate digits")]
    DuplicatesRequired(usize),
    #[error("failed to access settings file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to encode settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
}

/// Game parameters. Every constructed value has passed [`Settings::validate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "length")]
    code_length: usize,
    #[serde(rename = "duplicates")]
    allow_duplicates: bool,
    #[serde(rename = "limit")]
    guess_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            allow_duplicates: false,
            guess_limit: DEFAULT_GUESS_LIMIT,
        }
    }
}

impl Settings {
    pub fn new(
        code_length: usize,
        allow_duplicates: bool,
        guess_limit: u32,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            code_length,
            allow_duplicates,
            guess_limit,
        };
        settings.validate()?;
        Ok(settings)
    }

    #[must_use]
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    #[must_use]
    pub fn allow_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    #[must_use]
    pub fn guess_limit(&self) -> u32 {
        self.guess_limit
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.code_length < MIN_CODE_LENGTH {
            return Err(SettingsError::CodeLengthTooShort(self.code_length));
        }
        if !(MIN_GUESS_LIMIT..=MAX_GUESS_LIMIT).contains(&self.guess_limit) {
            return Err(SettingsError::GuessLimitOutOfRange(self.guess_limit));
        }
        if requires_duplicates(self.code_length) && !self.allow_duplicates {
            return Err(SettingsError::DuplicatesRequired(self.code_length));
        }
        Ok(())
    }

    /// Applies per-run overrides on top of these settings.
    ///
    /// A length too long for distinct digits switches duplicates on unless the
    /// caller explicitly asked for them off, in which case validation fails.
    pub fn with_overrides(
        &self,
        code_length: Option<usize>,
        allow_duplicates: Option<bool>,
        guess_limit: Option<u32>,
    ) -> Result<Self, SettingsError> {
        let code_length = code_length.unwrap_or(self.code_length);
        let allow_duplicates = allow_duplicates
            .unwrap_or(self.allow_duplicates || requires_duplicates(code_length));
        Self::new(
            code_length,
            allow_duplicates,
            guess_limit.unwrap_or(self.guess_limit),
        )
    }
}

impl std::fmt::Display for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parameters:\n\tlength: {}\n\tduplicates: {}\n\tguess limit: {}",
            self.code_length, self.allow_duplicates, self.guess_limit
        )
    }
}

#[must_use]
pub fn requires_duplicates(code_length: usize) -> bool {
    code_length > MAX_DISTINCT_LENGTH
}

/// Where the settings for this run came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SettingsSource {
    Defaults,
    File(PathBuf),
}

#[must_use]
pub fn get_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

/// Reads settings from `path`, falling back to defaults when the file is absent.
pub fn load_settings(path: &Path) -> Result<(Settings, SettingsSource), SettingsError> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let settings = load_settings_from_str(&contents)?;
            info_log!("Loaded settings from {}: {:?}", path.display(), settings);
            Ok((settings, SettingsSource::File(path.to_path_buf())))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug_log!("No settings at {}, using defaults", path.display());
            Ok((Settings::default(), SettingsSource::Defaults))
        }
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn load_settings_from_str(data: &str) -> Result<Settings, SettingsError> {
    let settings: Settings = toml::from_str(data)?;
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let io_err = |source: io::Error| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let contents = toml::to_string(settings)?;
    fs::write(path, contents).map_err(io_err)?;
    info_log!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mastermind_settings_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.code_length(), 4);
        assert!(!settings.allow_duplicates());
        assert_eq!(settings.guess_limit(), 10);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_new_rejects_short_code() {
        assert!(matches!(
            Settings::new(1, true, 10),
            Err(SettingsError::CodeLengthTooShort(1))
        ));
    }

    #[test]
    fn test_new_rejects_limit_out_of_range() {
        assert!(matches!(
            Settings::new(4, false, 0),
            Err(SettingsError::GuessLimitOutOfRange(0))
        ));
        assert!(matches!(
            Settings::new(4, false, 100),
            Err(SettingsError::GuessLimitOutOfRange(100))
        ));
        assert!(Settings::new(4, false, 1).is_ok());
        assert!(Settings::new(4, false, 99).is_ok());
    }

    #[test]
    fn test_new_requires_duplicates_for_long_codes() {
        assert!(Settings::new(10, false, 10).is_ok());
        assert!(matches!(
            Settings::new(11, false, 10),
            Err(SettingsError::DuplicatesRequired(11))
        ));
        assert!(Settings::new(11, true, 10).is_ok());
    }

    #[test]
    fn test_overrides_force_duplicates_for_long_codes() {
        let settings = Settings::default().with_overrides(Some(12), None, None).unwrap();
        assert_eq!(settings.code_length(), 12);
        assert!(settings.allow_duplicates());
        assert_eq!(settings.guess_limit(), 10);
    }

    #[test]
    fn test_overrides_explicit_no_duplicates_on_long_code_fails() {
        assert!(matches!(
            Settings::default().with_overrides(Some(12), Some(false), None),
            Err(SettingsError::DuplicatesRequired(12))
        ));
    }

    #[test]
    fn test_overrides_keep_unset_fields() {
        let base = Settings::new(5, true, 20).unwrap();
        let settings = base.with_overrides(None, None, Some(7)).unwrap();
        assert_eq!(settings, Settings::new(5, true, 7).unwrap());
    }

    #[test]
    fn test_load_from_str() {
        let settings = load_settings_from_str("length = 6\nduplicates = true\nlimit = 12\n").unwrap();
        assert_eq!(settings, Settings::new(6, true, 12).unwrap());
    }

    #[test]
    fn test_load_from_str_invalid_values() {
        assert!(matches!(
            load_settings_from_str("length = 12\nduplicates = false\nlimit = 12\n"),
            Err(SettingsError::DuplicatesRequired(12))
        ));
        assert!(matches!(
            load_settings_from_str("length = 4\nduplicates = false\nlimit = 0\n"),
            Err(SettingsError::GuessLimitOutOfRange(0))
        ));
    }

    #[test]
    fn test_load_from_str_malformed() {
        assert!(matches!(
            load_settings_from_str("length = \"four\""),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(load_settings_from_str("limit = 3"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = temp_path("does_not_exist.toml");
        let (settings, source) = load_settings(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(source, SettingsSource::Defaults);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("nested/dir/settings.toml");
        let settings = Settings::new(3, true, 25).unwrap();
        save_settings(&path, &settings).unwrap();

        let (loaded, source) = load_settings(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(source, SettingsSource::File(path.clone()));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("length = 3"));
        assert!(raw.contains("duplicates = true"));
        assert!(raw.contains("limit = 25"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_display_lists_parameters() {
        let text = Settings::default().to_string();
        assert!(text.contains("length: 4"));
        assert!(text.contains("duplicates: false"));
        assert!(text.contains("guess limit: 10"));
    }
}
