use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::TimeZone;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{LevelFilter, debug};

use super::output::{format_history, format_now, format_rows};
use crate::config::{Config, DATA_DIR_ENV};
use crate::conversion::{Conversion, Converter, DateForm, RelativeForm};
use crate::history::HistoryStore;
use crate::models::{Calendar, Direction, ResolvedTheme, ThemePreference};
use crate::storage::Storage;
use crate::theme::detect_system_dark;
use crate::tui::run_interactive;

/// Largest text `inspect` will load (1MB)
const MAX_INSPECT_BYTES: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(name = "epoch-buddy")]
#[command(version)]
#[command(about = "Convert between Unix epochs, calendar dates, and relative offsets", long_about = None)]
pub struct Cli {
    /// Directory holding history and theme (default: platform data dir)
    #[arg(long, global = true, env = DATA_DIR_ENV, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a 10 or 13 digit epoch to GMT, local, and relative time
    Epoch {
        /// Epoch in seconds or milliseconds; commas and underscores are ignored
        input: String,
        #[arg(long)]
        no_history: bool,
    },
    /// Convert calendar fields to an epoch
    Date {
        #[arg(long)]
        year: String,
        #[arg(long)]
        month: String,
        #[arg(long)]
        day: String,
        #[arg(long, default_value = "0")]
        hour: String,
        #[arg(long, default_value = "0")]
        minute: String,
        #[arg(long, default_value = "0")]
        second: String,
        #[arg(long = "ms", default_value = "0")]
        millisecond: String,
        /// Calendar the fields are read in
        #[arg(long, value_enum, default_value_t = CalendarArg::Local)]
        calendar: CalendarArg,
        #[arg(long)]
        no_history: bool,
    },
    /// Epoch for an offset from now
    Relative {
        #[arg(long, default_value = "0")]
        days: String,
        #[arg(long, default_value = "0")]
        hours: String,
        #[arg(long, default_value = "0")]
        minutes: String,
        #[arg(long, default_value = "0")]
        seconds: String,
        #[arg(long = "ms", default_value = "0")]
        milliseconds: String,
        #[arg(long, value_enum, default_value_t = DirectionArg::Ago)]
        direction: DirectionArg,
        #[arg(long)]
        no_history: bool,
    },
    /// Print the current epoch in seconds and milliseconds
    Now,
    /// Show recent conversions
    History {
        /// Remove all saved conversions
        #[arg(long)]
        clear: bool,
    },
    /// Show or set the popup theme
    Theme {
        #[arg(value_enum)]
        preference: Option<ThemeArg>,
    },
    /// Open the interactive popup
    Tui,
    /// Open the popup on text and convert epochs under the cursor
    Inspect {
        /// Text file to load (default: stdin when piped)
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CalendarArg {
    Utc,
    Local,
}

impl From<CalendarArg> for Calendar {
    fn from(arg: CalendarArg) -> Self {
        match arg {
            CalendarArg::Utc => Calendar::Utc,
            CalendarArg::Local => Calendar::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Ago,
    FromNow,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Ago => Direction::Ago,
            DirectionArg::FromNow => Direction::FromNow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for ThemePreference {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
            ThemeArg::System => ThemePreference::System,
        }
    }
}

/// Initialize env_logger on stderr; silent while the popup owns the terminal
/// unless `RUST_LOG` asks otherwise
fn init_logging(config: &Config, interactive: bool) {
    let env = env_logger::Env::default().default_filter_or(config.default_log_filter());
    let mut builder = env_logger::Builder::from_env(env);
    if interactive && env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Off);
    }
    let _ = builder.try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::new(cli.data_dir.clone(), cli.verbose);
    let interactive = matches!(cli.command, Some(Commands::Tui | Commands::Inspect { .. }));
    init_logging(&config, interactive);

    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let (mut history, mut themes) = config.open_stores();
    let converter = Converter::system();

    match command {
        Commands::Epoch { input, no_history } => {
            let conversion = converter.epoch_to_date(&input)?;
            print_conversion(&converter, &mut history, &conversion, no_history);
        }
        Commands::Date { year, month, day, hour, minute, second, millisecond, calendar, no_history } => {
            let form = DateForm { year, month, day, hour, minute, second, millisecond, calendar: calendar.into() };
            let conversion = converter.date_to_epoch(&form)?;
            print_conversion(&converter, &mut history, &conversion, no_history);
        }
        Commands::Relative { days, hours, minutes, seconds, milliseconds, direction, no_history } => {
            let form = RelativeForm { days, hours, minutes, seconds, milliseconds, direction: direction.into() };
            let conversion = converter.relative_to_epoch(&form)?;
            print_conversion(&converter, &mut history, &conversion, no_history);
        }
        Commands::Now => {
            println!("{}", format_now(converter.now().timestamp_millis()));
        }
        Commands::History { clear } => {
            if clear {
                history.clear();
                println!("History cleared");
            } else {
                println!("{}", format_history(&history.load(), converter.timezone()));
            }
        }
        Commands::Theme { preference } => match preference {
            Some(arg) => {
                let preference = ThemePreference::from(arg);
                themes.save(preference);
                println!("Theme set to {}", preference);
            }
            None => {
                let preference = themes.load();
                let resolved = match preference.resolve(detect_system_dark()) {
                    ResolvedTheme::Light => "light",
                    ResolvedTheme::Dark => "dark",
                };
                println!("{} ({})", preference, resolved);
            }
        },
        Commands::Tui => {
            run_interactive(history, themes, None)?;
        }
        Commands::Inspect { file } => {
            let text = read_inspect_text(file.as_deref())?;
            run_interactive(history, themes, Some(text))?;
        }
    }

    Ok(())
}

fn print_conversion<Tz: TimeZone, S: Storage>(
    converter: &Converter<Tz>,
    history: &mut HistoryStore<S>,
    conversion: &Conversion,
    no_history: bool,
) {
    println!("{}", format_rows(&conversion.rows));
    if no_history {
        debug!("Skipping history for {}", conversion.entry.headline());
    } else {
        converter.record(history, conversion);
    }
}

/// Text for the Inspect tab: the file, piped stdin, or nothing
fn read_inspect_text(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        let size = fs::metadata(path).with_context(|| format!("Failed to read {}", path.display()))?.len();
        if size > MAX_INSPECT_BYTES {
            bail!("File too large: {} ({} bytes, max {} bytes)", path.display(), size, MAX_INSPECT_BYTES);
        }
        return fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut text = String::new();
    stdin.lock().take(MAX_INSPECT_BYTES).read_to_string(&mut text).context("Failed to read stdin")?;
    Ok(text)
}
