use clap::{Parser, ValueEnum};
use non_empty_string::NonEmptyString;
use serde::Serialize;
use tenders_core::{
    deep_link::link_to,
    domain::{Frequency, NotificationSettings},
    storage::{SavedSearchesKey, SearchStateKey},
    DeepLink, SavedSearch, Workspace,
};
use tracing::instrument;

use super::{
    filter::{print_criteria, CriteriaArgs},
    list::{csv_escape, print_json, OutputFormat},
    parse_name, prompt_to_proceed,
    terminal::Colorize,
};

const DEFAULT_BASE_URL: &str = "https://razpisi.example/";

#[derive(Debug, Parser)]
pub struct Searches {
    #[command(subcommand)]
    command: SearchesCommand,
}

#[derive(Debug, Parser)]
enum SearchesCommand {
    /// List saved searches
    List {
        /// Output format (default: table).
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Save the active filters under a name
    Create {
        /// Name of the saved search
        #[arg(value_parser = parse_name)]
        name: NonEmptyString,
    },

    /// Rename a saved search
    Rename {
        /// Saved search id
        id: String,

        /// New name
        #[arg(value_parser = parse_name)]
        name: NonEmptyString,
    },

    /// Change the filters stored in a saved search
    Edit {
        /// Saved search id
        id: String,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// Change notification settings of a saved search
    Notify {
        /// Saved search id
        id: String,

        /// Turn notifications on
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Turn notifications off
        #[arg(long)]
        disable: bool,

        /// Delivery cadence
        #[arg(long, value_enum)]
        frequency: Option<FrequencyArg>,

        /// Append application tips
        #[arg(long, conflicts_with = "no_tips")]
        tips: bool,

        /// Leave out application tips
        #[arg(long)]
        no_tips: bool,
    },

    /// Delete a saved search
    Delete {
        /// Saved search id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Make a saved search the current search
    Load {
        /// Saved search id
        id: String,
    },

    /// Print a link that opens a saved search
    Link {
        /// Saved search id
        id: String,

        /// Address of the application the link points at
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        base: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FrequencyArg {
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for Frequency {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Weekly => Self::Weekly,
            FrequencyArg::Monthly => Self::Monthly,
        }
    }
}

fn not_found(id: &str) {
    println!("{}", format!("No saved search with id {id}").warning());
}

const fn frequency_label(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Weekly => "weekly",
        Frequency::Monthly => "monthly",
    }
}

fn notifications_label(settings: NotificationSettings) -> String {
    if !settings.enabled {
        return "off".to_string();
    }
    let tips = if settings.include_tips { ", with tips" } else { "" };
    format!("{}{tips}", frequency_label(settings.frequency))
}

fn csv_row(search: &SavedSearch) -> String {
    format!(
        "{},{},{}",
        csv_escape(&search.id),
        csv_escape(&search.name),
        csv_escape(&notifications_label(search.notification_settings))
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRow<'a> {
    #[serde(flatten)]
    search: &'a SavedSearch,
    filters_summary: Vec<String>,
}

impl Searches {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let preferences = workspace.preferences();

        match self.command {
            SearchesCommand::List { output } => {
                let searches = preferences.get::<SavedSearchesKey>();
                match output {
                    OutputFormat::Table => {
                        if searches.is_empty() {
                            println!("No saved searches.");
                            println!("{}", "Create one with: tenders searches create <NAME>".dim());
                        }
                        for search in searches.iter() {
                            println!("{}  {}", search.name.heading(), search.id.dim());
                            print_criteria("  Filters", &search.filters);
                            println!(
                                "  Notifications: {}",
                                notifications_label(search.notification_settings)
                            );
                        }
                    }
                    OutputFormat::Json => {
                        let rows: Vec<_> = searches
                            .iter()
                            .map(|search| SearchRow {
                                search,
                                filters_summary: search.filters.describe(),
                            })
                            .collect();
                        print_json(&rows)?;
                    }
                    OutputFormat::Csv => {
                        println!("id,name,notifications");
                        for search in searches.iter() {
                            println!("{}", csv_row(search));
                        }
                    }
                }
            }
            SearchesCommand::Create { name } => {
                let filters = workspace.session().active().clone();
                let id = preferences.update::<SavedSearchesKey, _>(|searches| {
                    searches.create(name.as_str(), filters).id.clone()
                })?;
                println!("{}", format!("Saved search '{}'", name.as_str()).success());
                println!("  id: {id}");
            }
            SearchesCommand::Rename { id, name } => {
                if preferences
                    .update::<SavedSearchesKey, _>(|searches| searches.rename(&id, name.as_str()))?
                {
                    println!("{}", format!("Renamed {id} to '{}'", name.as_str()).success());
                } else {
                    not_found(&id);
                }
            }
            SearchesCommand::Edit { id, criteria } => {
                let mut searches = preferences.load::<SavedSearchesKey>()?.unwrap_or_default();
                let Some(mut filters) = searches.get(&id).map(|search| search.filters.clone())
                else {
                    not_found(&id);
                    return Ok(());
                };
                criteria.apply_to(&mut filters);
                searches.update_filters(&id, filters);
                preferences.set::<SavedSearchesKey>(&searches)?;
                if let Some(search) = searches.get(&id) {
                    print_criteria(&search.name, &search.filters);
                }
            }
            SearchesCommand::Notify {
                id,
                enable,
                disable,
                frequency,
                tips,
                no_tips,
            } => {
                let mut searches = preferences.load::<SavedSearchesKey>()?.unwrap_or_default();
                let Some(mut settings) = searches.get(&id).map(|s| s.notification_settings) else {
                    not_found(&id);
                    return Ok(());
                };
                if enable || disable {
                    settings.enabled = enable;
                }
                if let Some(frequency) = frequency {
                    settings.frequency = frequency.into();
                }
                if tips || no_tips {
                    settings.include_tips = tips;
                }
                searches.update_notifications(&id, settings);
                preferences.set::<SavedSearchesKey>(&searches)?;
                println!("Notifications: {}", notifications_label(settings));
            }
            SearchesCommand::Delete { id, yes } => {
                let searches = preferences.get::<SavedSearchesKey>();
                let Some(search) = searches.get(&id) else {
                    not_found(&id);
                    return Ok(());
                };
                if !yes && !prompt_to_proceed(&format!("Delete saved search '{}'?", search.name))? {
                    println!("Cancelled");
                    return Ok(());
                }
                preferences.update::<SavedSearchesKey, _>(|searches| searches.delete(&id))?;
                println!("{}", format!("Deleted saved search {id}").success());
            }
            SearchesCommand::Load { id } => {
                let searches = preferences.get::<SavedSearchesKey>();
                let mut session = workspace.load_session()?;
                if session.apply_saved_search(&searches, &id) {
                    preferences.set::<SearchStateKey>(&session)?;
                    print_criteria("Active", session.active());
                } else {
                    not_found(&id);
                }
            }
            SearchesCommand::Link { id, base } => {
                if preferences.get::<SavedSearchesKey>().get(&id).is_none() {
                    not_found(&id);
                    return Ok(());
                }
                println!("{}", link_to(&base, &id));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Parser)]
pub struct Open {
    /// Link containing a `searchId` query parameter
    url: String,
}

impl Open {
    #[instrument(level = "debug", skip(workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let preferences = workspace.preferences();
        let mut link = DeepLink::from_url(&self.url);

        if link.search_id().is_none() {
            println!("{}", "Link does not name a saved search".warning());
            return Ok(());
        }

        let searches = preferences.get::<SavedSearchesKey>();
        let mut session = workspace.load_session()?;
        if session.apply_deep_link(&mut link, &searches) {
            preferences.set::<SearchStateKey>(&session)?;
            print_criteria("Active", session.active());
        } else {
            println!("{}", "Link names a saved search that no longer exists".warning());
        }
        println!("{}", link.cleaned_url().dim());
        Ok(())
    }
}
