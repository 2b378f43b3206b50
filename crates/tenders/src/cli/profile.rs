use clap::{Args, Parser, ValueEnum};
use non_empty_string::NonEmptyString;
use tenders_core::{
    storage::{ProfileKey, ThemeKey},
    Workspace,
};
use tracing::instrument;

use super::{parse_name, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Profile {
    #[command(subcommand)]
    command: Option<ProfileCommand>,
}

#[derive(Debug, Parser)]
enum ProfileCommand {
    /// Show the company profile (default)
    Show,

    /// Update the company profile
    ///
    /// Every field must be filled once the flags are applied.
    Set(ProfileArgs),
}

#[derive(Debug, Default, Args)]
struct ProfileArgs {
    /// Registered company name
    #[arg(long, value_parser = parse_name)]
    company_name: Option<NonEmptyString>,

    /// Sector the company works in
    #[arg(long, value_parser = parse_name)]
    industry: Option<NonEmptyString>,

    /// Head-count bracket, e.g. 10-49
    #[arg(long, value_parser = parse_name)]
    company_size: Option<NonEmptyString>,

    /// What the company wants to achieve with funding
    #[arg(long, value_parser = parse_name)]
    main_goals: Option<NonEmptyString>,

    /// The project funding is sought for
    #[arg(long, value_parser = parse_name)]
    project_description: Option<NonEmptyString>,
}

impl ProfileArgs {
    fn apply_to(self, profile: &mut tenders_core::Profile) {
        let fields = [
            (self.company_name, &mut profile.company_name),
            (self.industry, &mut profile.industry),
            (self.company_size, &mut profile.company_size),
            (self.main_goals, &mut profile.main_goals),
            (self.project_description, &mut profile.project_description),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value.into_inner();
            }
        }
    }
}

impl Profile {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let preferences = workspace.preferences();

        match self.command.unwrap_or(ProfileCommand::Show) {
            ProfileCommand::Show => {
                let profile = preferences.get::<ProfileKey>();
                for (name, value) in profile.fields() {
                    let value = if value.trim().is_empty() {
                        "(not set)".dim()
                    } else {
                        value.to_string()
                    };
                    println!("{:<20} {value}", format!("{name}:"));
                }
            }
            ProfileCommand::Set(args) => {
                let mut profile = preferences.load::<ProfileKey>()?.unwrap_or_default();
                args.apply_to(&mut profile);
                let missing = profile.missing_fields();
                if !missing.is_empty() {
                    anyhow::bail!("Profile incomplete; missing: {}", missing.join(", "));
                }
                preferences.set::<ProfileKey>(&profile)?;
                println!("{}", "Profile saved".success());
            }
        }
        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Theme {
    /// Theme to switch to. Prints the current theme when omitted.
    #[arg(value_enum)]
    value: Option<ThemeArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
    Toggle,
}

impl Theme {
    #[instrument(level = "debug", skip(workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let preferences = workspace.preferences();
        let Some(value) = self.value else {
            println!("{}", preferences.get::<ThemeKey>());
            return Ok(());
        };

        let theme = preferences.update::<ThemeKey, _>(|theme| {
            *theme = match value {
                ThemeArg::Light => tenders_core::Theme::Light,
                ThemeArg::Dark => tenders_core::Theme::Dark,
                ThemeArg::Toggle => theme.toggled(),
            };
            *theme
        })?;
        println!("{}", format!("Theme set to {theme}").success());
        Ok(())
    }
}
