use mastermind::cli::{
    Cli, CliInterface, display_saved_message, display_settings_source, parse_cli,
    prompt_settings, read_yes_no,
};
use mastermind::logging::{get_log_path, init_logging};
use mastermind::settings::{
    SettingsError, SettingsSource, get_settings_path, load_settings, save_settings,
};
use mastermind::tui::TuiInterface;
use mastermind::{game_loop, info_log};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;
use thiserror::Error;

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = parse_cli();
    let log_path = if cli.tui { get_log_path() } else { None };
    if let Err(e) = init_logging(log_path.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let settings_path = cli
        .config_path
        .clone()
        .or_else(get_settings_path)
        .ok_or(SettingsError::NoConfigDir)?;
    let (stored, mut source) = load_settings(&settings_path)?;
    let mut settings = cli.resolve_settings(&stored)?;

    if !cli.tui {
        display_settings_source(&source, &settings);
    }

    let wants_edit = cli.configure
        || (!cli.tui
            && read_yes_no(&mut io::stdin().lock(), "Change settings? (Y/N) ").unwrap_or(false));
    let edited = if wants_edit {
        prompt_settings(&mut io::stdin().lock())
    } else {
        None
    };

    if let Some(new_settings) = edited {
        settings = new_settings;
    }
    if edited.is_some() || cli.save {
        save_settings(&settings_path, &settings)?;
        source = SettingsSource::File(settings_path);
        display_saved_message();
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let summary = if cli.tui {
        let mut interface = TuiInterface::new(&source)?;
        game_loop(&settings, &mut rng, &mut interface)
    } else {
        let mut interface = CliInterface::new(io::stdin().lock());
        game_loop(&settings, &mut rng, &mut interface)
    };
    info_log!("Exiting after {:?}", summary);
    Ok(())
}
