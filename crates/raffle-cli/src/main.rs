//! Raffle - terminal front end
//!
//! Usage:
//!   raffle draw Ana Bruno Carla -w 2     - Draw from a list
//!   raffle draw --file names.csv --rank  - Rank an imported list
//!   raffle draw --min 1 --max 100 -w 3   - Draw numbers
//!   raffle history list|show|delete|clear|export
//!   raffle settings show|theme|sound|animations

mod render;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;

use raffle_app::{AppConfig, LogFeedback, RaffleApp};
use raffle_draw::{DrawConfig, ImportFormat, ItemList, PoolSource, parse_import};
use raffle_reveal::{RevealOptions, TimingProfile};
use raffle_state::{ExportFormat, FileStore, ThemePreference};

#[derive(Parser)]
#[command(name = "raffle", version, about = "Fair random draws with an animated reveal")]
struct Cli {
    /// Configuration file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for settings and history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a draw
    Draw(DrawArgs),
    /// Browse past draws
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommand>,
    },
}

#[derive(clap::Args)]
struct DrawArgs {
    /// Items (comma or newline separated text is split)
    items: Vec<String>,

    /// Import items from a file (.csv cells are unquoted)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Lowest number of a numeric draw
    #[arg(long, requires = "max", allow_negative_numbers = true)]
    min: Option<i64>,

    /// Highest number of a numeric draw
    #[arg(long, requires = "min", allow_negative_numbers = true)]
    max: Option<i64>,

    /// Number of winners
    #[arg(short, long, default_value_t = 1)]
    winners: u32,

    /// Allow the same candidate to win more than once
    #[arg(short, long)]
    repeat: bool,

    /// Draw every candidate as a full ranking
    #[arg(long)]
    rank: bool,

    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,

    /// Reveal immediately regardless of settings
    #[arg(long)]
    no_animation: bool,

    /// Reveal pacing for this draw
    #[arg(long, value_enum)]
    profile: Option<ProfileArg>,

    /// Repeat the draw of a history entry (id or id prefix) with its settings
    #[arg(
        long,
        conflicts_with_all = ["items", "file", "min", "max", "winners", "repeat", "rank"]
    )]
    again: Option<String>,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List past draws, newest first
    List,
    /// Show one draw
    Show { id: String },
    /// Delete one draw
    Delete { id: String },
    /// Delete every draw
    Clear,
    /// Export a draw as a share message or HTML report
    Export {
        id: String,
        #[arg(short, long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print current settings
    Show,
    /// Set the colour theme
    Theme {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
    /// Toggle haptic/sound feedback
    Sound,
    /// Toggle reveal animations
    Animations,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Normal,
    Turbo,
    Instant,
}

impl From<ProfileArg> for TimingProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Normal => Self::Normal,
            ProfileArg::Turbo => Self::Turbo,
            ProfileArg::Instant => Self::Instant,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    System,
}

impl From<ThemeArg> for ThemePreference {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Self::Light,
            ThemeArg::Dark => Self::Dark,
            ThemeArg::System => Self::System,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Html => Self::Html,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    if let Commands::Draw(args) = &cli.command {
        if let Some(profile) = args.profile {
            config = config.with_timing_profile(profile.into());
        }
    }

    let app = match &cli.data_dir {
        Some(dir) => RaffleApp::with_store(config, Arc::new(FileStore::new(dir))),
        None => RaffleApp::open(config),
    }
    .with_feedback(Arc::new(LogFeedback));

    match cli.command {
        Commands::Draw(args) => run_draw(&app, args),
        Commands::History { command } => run_history(&app, command),
        Commands::Settings { command } => {
            run_settings(&app, command.unwrap_or(SettingsCommand::Show))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DRAW
// ═══════════════════════════════════════════════════════════════════════════════

fn build_config(app: &RaffleApp, args: &DrawArgs) -> Result<DrawConfig> {
    if let Some(id) = &args.again {
        let entry = app.find_entry(id)?;
        return Ok(entry.to_config());
    }

    let source = match (args.min, args.max) {
        (Some(min), Some(max)) => {
            if !args.items.is_empty() || args.file.is_some() {
                bail!("Use either items/--file or --min/--max, not both");
            }
            PoolSource::range(min, max)
        }
        _ => {
            let mut items = ItemList::new();
            for text in &args.items {
                items.add_text(text);
            }
            if let Some(path) = &args.file {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let added = items.extend(parse_import(&content, ImportFormat::from_path(path)));
                log::info!("Imported {added} item(s) from {}", path.display());
            }
            items.to_source()
        }
    };

    Ok(DrawConfig::new(source)
        .with_winners(args.winners)
        .with_repetition(args.repeat)
        .with_rank_all(args.rank))
}

fn run_draw(app: &RaffleApp, args: DrawArgs) -> Result<()> {
    let config = build_config(app, &args)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let outcome = app.perform_draw(&config, &mut rng)?;

    let mut options = app.reveal_options();
    if args.no_animation {
        options = RevealOptions {
            animations_enabled: false,
            ..options
        };
    }

    let mut reveal = app.start_reveal_with(&outcome, &options, &mut rng);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::play_reveal(app, &mut reveal, &mut out).context("Failed to render the reveal")?;

    match &outcome.persisted {
        Ok(entry) => writeln!(out, "\nSaved as {}", render::short_id(entry))?,
        Err(e) => writeln!(out, "\nWarning: result was not saved to history ({e})")?,
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// HISTORY
// ═══════════════════════════════════════════════════════════════════════════════

fn run_history(app: &RaffleApp, command: HistoryCommand) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        HistoryCommand::List => {
            let entries = app.history();
            if entries.is_empty() {
                writeln!(out, "No draws yet.")?;
            }
            for entry in &entries {
                writeln!(out, "{}", render::history_line(entry))?;
            }
        }
        HistoryCommand::Show { id } => {
            let entry = app.find_entry(&id)?;
            render::history_detail(&entry, &mut out)?;
        }
        HistoryCommand::Delete { id } => {
            let entry = app.delete_entry(&id)?;
            writeln!(out, "Deleted {}", render::short_id(&entry))?;
        }
        HistoryCommand::Clear => {
            let count = app.history().len();
            app.clear_history()?;
            writeln!(out, "Deleted {count} draw(s).")?;
        }
        HistoryCommand::Export { id, format, output } => {
            let rendered = app.export_entry(&id, format.into())?;
            match output {
                Some(path) => {
                    fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    writeln!(out, "Exported to {}", path.display())?;
                }
                None => writeln!(out, "{rendered}")?,
            }
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════════════

fn run_settings(app: &RaffleApp, command: SettingsCommand) -> Result<()> {
    let settings = match command {
        SettingsCommand::Show => app.settings(),
        SettingsCommand::Theme { theme } => app.update_theme(theme.into())?,
        SettingsCommand::Sound => app.toggle_sound()?,
        SettingsCommand::Animations => app.toggle_animations()?,
    };

    let on_off = |b: bool| if b { "on" } else { "off" };
    println!("Theme:       {}", settings.theme.display_name());
    println!("Sound:       {}", on_off(settings.sound_enabled));
    println!("Animations:  {}", on_off(settings.animations_enabled));
    println!("Timing:      {}", app.config().timing_profile.display_name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_again_rejects_draw_options() {
        let extras: [&[&str]; 4] = [&["-w", "3"], &["--repeat"], &["--rank"], &["Ana"]];
        for extra in extras {
            let mut argv = vec!["raffle", "draw", "--again", "1a2b"];
            argv.extend_from_slice(extra);
            assert!(Cli::try_parse_from(argv).is_err(), "{extra:?}");
        }

        let argv = ["raffle", "draw", "--again", "1a2b", "--seed", "7"];
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Draw(args) = cli.command else {
            panic!("expected draw");
        };
        assert_eq!(args.again.as_deref(), Some("1a2b"));
        assert_eq!(args.winners, 1);
    }
}
