use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

mod chat;
mod filter;
mod format;
mod list;
mod profile;
mod searches;
mod show;
mod terminal;

use anyhow::Context;
use chat::Chat;
use clap::{ArgAction, ValueEnum};
use filter::{Filter, Sort};
use list::{List, Save, Saved};
use non_empty_string::NonEmptyString;
use profile::{Profile, Theme};
use searches::{Open, Searches};
use show::Show;
use tenders_core::{
    storage::{ThemeKey, STATE_DIR},
    Workspace,
};
use terminal::Colorize;
use tracing::instrument;

/// Rejects blank names at the command line.
fn parse_name(s: &str) -> Result<NonEmptyString, String> {
    NonEmptyString::new(s.trim().to_string()).map_err(|_| "value must not be blank".to_string())
}

/// Asks a yes/no question on stderr. Anything but `y` means no.
fn prompt_to_proceed(question: &str) -> anyhow::Result<bool> {
    eprint!("{question} (y/N) ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the tender workspace
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a new tender workspace
    Init,

    /// List tenders matching the active filters (default)
    List(List),

    /// Edit, apply or reset the search filters
    Filter(Filter),

    /// Set the sort order of results
    Sort(Sort),

    /// Show the details of a tender
    Show(Show),

    /// Save a tender, or remove it if already saved
    Save(Save),

    /// List saved tenders
    Saved(Saved),

    /// Manage saved searches
    Searches(Searches),

    /// Open a saved-search link
    ///
    /// The search named by the link's `searchId` parameter becomes the
    /// current search.
    Open(Open),

    /// Show or edit the company profile
    Profile(Profile),

    /// Show or change the colour theme
    Theme(Theme),

    /// Ask the funding assistant a question
    Chat(Chat),

    /// Show or modify configuration settings
    Config(Config),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let open = || {
            let workspace = Workspace::open(root.clone());
            terminal::use_theme(workspace.preferences().get::<ThemeKey>());
            workspace
        };
        match self {
            Self::Init => Init::run(&root)?,
            Self::List(command) => command.run(&open())?,
            Self::Filter(command) => command.run(&open())?,
            Self::Sort(command) => command.run(&open())?,
            Self::Show(command) => command.run(&open())?,
            Self::Save(command) => command.run(&open())?,
            Self::Saved(command) => command.run(&open())?,
            Self::Searches(command) => command.run(&open())?,
            Self::Open(command) => command.run(&open())?,
            Self::Profile(command) => command.run(&open())?,
            Self::Theme(command) => command.run(&open())?,
            Self::Chat(command) => command.run(&open())?,
            Self::Config(command) => command.run(&open())?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let created = Workspace::init(root).context("failed to initialize workspace")?;
        if !created {
            anyhow::bail!(
                "Workspace already initialized (found existing {STATE_DIR}/config.toml)"
            );
        }

        println!("Initialized tender workspace in {}", root.display());
        println!("  Created: {STATE_DIR}/config.toml");
        println!();
        println!("Next steps:");
        println!("  tenders list");
        println!("  tenders filter edit --category green-transition && tenders filter apply");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Config {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Print a single configuration value
    Get {
        /// Configuration key to read
        key: ConfigKey,
    },

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: ConfigKey,

        /// Value to set
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConfigKey {
    /// JSON tender list, relative to the workspace root ("" for the built-in list)
    #[value(name = "source")]
    Source,
    /// Whether a failing source falls back to the built-in list
    #[value(name = "fallback_to_fixture")]
    FallbackToFixture,
    /// Page size for a fresh search
    #[value(name = "items_per_page")]
    ItemsPerPage,
}

impl ConfigKey {
    const fn name(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::FallbackToFixture => "fallback_to_fixture",
            Self::ItemsPerPage => "items_per_page",
        }
    }

    fn value(self, config: &tenders_core::Config) -> String {
        match self {
            Self::Source => config
                .source
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            Self::FallbackToFixture => config.fallback_to_fixture.to_string(),
            Self::ItemsPerPage => config.items_per_page().to_string(),
        }
    }

    fn set(self, config: &mut tenders_core::Config, value: &str) -> anyhow::Result<()> {
        match self {
            Self::Source => {
                let value = value.trim();
                config.source = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            Self::FallbackToFixture => {
                config.fallback_to_fixture = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Value must be 'true' or 'false'"))?;
            }
            Self::ItemsPerPage => {
                let size = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Value must be a positive integer"))?;
                config.set_items_per_page(size)?;
            }
        }
        Ok(())
    }
}

impl Config {
    #[instrument(skip(workspace))]
    fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let config_path = workspace.config_path();

        match self.command {
            ConfigCommand::Show => {
                let config = workspace.config();
                println!("Configuration ({}):", config_path.display().to_string().dim());
                println!(
                    "  source: {}",
                    config.source.as_ref().map_or_else(
                        || "built-in tender list".dim(),
                        |path| path.display().to_string()
                    )
                );
                println!("  fallback_to_fixture: {}", config.fallback_to_fixture);
                println!("  items_per_page: {}", config.items_per_page());
            }
            ConfigCommand::Get { key } => {
                println!("{}", key.value(workspace.config()));
            }
            ConfigCommand::Set { key, value } => {
                let mut config = if config_path.exists() {
                    tenders_core::Config::load(&config_path)?
                } else {
                    std::fs::create_dir_all(workspace.root().join(STATE_DIR))?;
                    tenders_core::Config::default()
                };

                key.set(&mut config, &value)?;
                config.save(&config_path)?;

                let shown = key.value(&config);
                let shown = if shown.is_empty() { "(unset)" } else { &shown };
                println!("{}", format!("{} = {shown}", key.name()).success());
            }
        }

        Ok(())
    }
}
