use std::{fmt, num::NonZeroUsize};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tenders_core::{
    engine::{sort, SortConfig, Summary},
    storage::{SavedTendersKey, SearchStateKey},
    FilterCriteria, SavedTenders, Tender, Workspace,
};
use tracing::instrument;

use super::{
    format,
    terminal::{self, Colorize},
};

const SAVED_MARKER: &str = "★";

/// Command arguments for `tenders list`.
#[derive(Debug, Default, Parser)]
#[command(about = "List tenders matching the active filters")]
pub struct List {
    /// Page to show (1-based). Remembered for the next listing.
    #[arg(long, value_name = "N")]
    page: Option<NonZeroUsize>,

    /// Tenders per page. Changing it returns to page one.
    #[arg(long, value_name = "N")]
    page_size: Option<NonZeroUsize>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers, summary and footer for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let tenders = workspace
            .load_tenders()
            .context("failed to load tenders")?;
        let preferences = workspace.preferences();

        let paging = self.page.is_some() || self.page_size.is_some();
        let mut session = if paging {
            workspace.load_session()?
        } else {
            workspace.session()
        };
        if let Some(size) = self.page_size {
            session.set_items_per_page(size);
        }
        if let Some(page) = self.page {
            session.go_to_page(page);
        }
        if paging {
            preferences.set::<SearchStateKey>(&session)?;
        }

        let saved = preferences.get::<SavedTendersKey>();
        let results = session.results(&tenders);

        match self.output {
            OutputFormat::Table => {
                if !self.quiet {
                    print_summary(&results.summary, session.active());
                }
                render_table(&results.items, &saved, self.quiet);
                if !self.quiet {
                    if results.items.is_empty() && results.page > results.total_pages {
                        println!(
                            "{}",
                            format!("Page {} is past the last page.", results.page).warning()
                        );
                    }
                    println!(
                        "{}",
                        format!(
                            "Page {} of {} ({} per page)",
                            results.page,
                            results.total_pages,
                            session.page().items_per_page()
                        )
                        .dim()
                    );
                }
            }
            OutputFormat::Json => {
                let output = ListOutput {
                    summary: results.summary,
                    page: results.page.get(),
                    total_pages: results.total_pages.get(),
                    items: rows(&results.items, &saved),
                };
                print_json(&output)?;
            }
            OutputFormat::Csv => render_csv(&results.items, &saved, self.quiet),
        }

        Ok(())
    }
}

/// Command arguments for `tenders save`.
#[derive(Debug, Parser)]
pub struct Save {
    /// Id of the tender to save or unsave
    id: u32,
}

impl Save {
    #[instrument(level = "debug", skip(workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let tenders = workspace
            .load_tenders()
            .context("failed to load tenders")?;
        let preferences = workspace.preferences();

        let known = tenders.iter().any(|t| t.id == self.id);
        if !known && !preferences.get::<SavedTendersKey>().is_saved(self.id) {
            anyhow::bail!("No tender with id {}", self.id);
        }

        let now_saved = preferences.update::<SavedTendersKey, _>(|saved| saved.toggle(self.id))?;
        if now_saved {
            println!("{}", format!("{SAVED_MARKER} Saved tender {}", self.id).success());
        } else {
            println!("Removed tender {} from saved tenders", self.id);
        }
        Ok(())
    }
}

/// Command arguments for `tenders saved`.
#[derive(Debug, Default, Parser)]
pub struct Saved {
    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers for scripting.
    #[arg(long)]
    quiet: bool,
}

impl Saved {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let tenders = workspace
            .load_tenders()
            .context("failed to load tenders")?;
        let saved = workspace.preferences().get::<SavedTendersKey>();
        let items = saved_in_order(&tenders, &saved, workspace.session().sort());

        match self.output {
            OutputFormat::Table => {
                if items.is_empty() && !self.quiet {
                    println!("No saved tenders.");
                    println!("{}", "Save one with: tenders save <ID>".dim());
                    return Ok(());
                }
                if !self.quiet {
                    println!("{}\n", format!("Saved tenders ({})", items.len()).heading());
                }
                render_table(&items, &saved, self.quiet);
                let missing = saved.len().saturating_sub(items.len());
                if missing > 0 && !self.quiet {
                    println!(
                        "{}",
                        format!("{missing} saved id(s) are not in the current tender list").dim()
                    );
                }
            }
            OutputFormat::Json => print_json(&rows(&items, &saved))?,
            OutputFormat::Csv => render_csv(&items, &saved, self.quiet),
        }
        Ok(())
    }
}

/// Saved tenders present in `tenders`, in `order`.
fn saved_in_order<'a>(
    tenders: &'a [Tender],
    saved: &SavedTenders,
    order: SortConfig,
) -> Vec<&'a Tender> {
    sort(&saved.resolve(tenders), order)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    summary: Summary,
    page: usize,
    total_pages: usize,
    items: Vec<Row<'a>>,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    tender: &'a Tender,
    saved: bool,
}

fn rows<'a>(items: &[&'a Tender], saved: &SavedTenders) -> Vec<Row<'a>> {
    items
        .iter()
        .map(|tender| Row {
            tender,
            saved: saved.is_saved(tender.id),
        })
        .collect()
}

pub(super) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

fn print_summary(summary: &Summary, active: &FilterCriteria) {
    if summary.count == 0 {
        println!("{}", "No tenders match the active filters.".warning());
    } else {
        let deadlines = match (summary.earliest_deadline, summary.latest_deadline) {
            (Some(first), Some(last)) => format!(
                " · deadlines {} - {}",
                format::deadline(Some(first)),
                format::deadline(Some(last))
            ),
            _ => String::new(),
        };
        println!(
            "{} · {} - {}{deadlines}",
            format!("{} tenders", summary.count).heading(),
            format::amount_short(summary.total_min),
            format::amount_short(summary.total_max),
        );
    }

    let chips = active.describe();
    if !chips.is_empty() {
        println!("{}", format!("Filters: {}", chips.join(", ")).info());
    }
    println!();
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Column {
    Saved,
    Id,
    Title,
    Funding,
    Deadline,
    Category,
    FundingType,
}

impl Column {
    const fn header(self) -> &'static str {
        match self {
            Self::Saved => "",
            Self::Id => "ID",
            Self::Title => "Title",
            Self::Funding => "Funding",
            Self::Deadline => "Deadline",
            Self::Category => "Category",
            Self::FundingType => "Type",
        }
    }

    fn value(self, tender: &Tender, saved: &SavedTenders, title_width: usize) -> String {
        match self {
            Self::Saved => {
                if saved.is_saved(tender.id) {
                    SAVED_MARKER.to_string()
                } else {
                    String::new()
                }
            }
            Self::Id => tender.id.to_string(),
            Self::Title => format::truncate(&tender.title, title_width),
            Self::Funding => format::funding_range(tender),
            Self::Deadline => format::deadline(tender.deadline),
            Self::Category => tender.category.to_string(),
            Self::FundingType => tender.funding_type.to_string(),
        }
    }
}

fn render_table(items: &[&Tender], saved: &SavedTenders, quiet: bool) {
    if quiet {
        for tender in items {
            println!("{}\t{}", tender.id, tender.title);
        }
        return;
    }

    let (columns, title_width) = if terminal::is_narrow() {
        (
            vec![Column::Saved, Column::Id, Column::Title, Column::Deadline],
            32,
        )
    } else {
        (
            vec![
                Column::Saved,
                Column::Id,
                Column::Title,
                Column::Funding,
                Column::Deadline,
                Column::Category,
                Column::FundingType,
            ],
            48,
        )
    };

    let data: Vec<Vec<String>> = items
        .iter()
        .map(|tender| {
            columns
                .iter()
                .map(|column| column.value(tender, saved, title_width))
                .collect()
        })
        .collect();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(column.header().chars().count())
        })
        .collect::<Vec<_>>();

    for (column, width) in columns.iter().zip(&widths) {
        print!("{:<width$}  ", column.header());
    }
    println!();
    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in data {
        for (value, width) in row.iter().zip(&widths) {
            print!("{value:<width$}  ");
        }
        println!();
    }
}

fn render_csv(items: &[&Tender], saved: &SavedTenders, quiet: bool) {
    if !quiet {
        println!("id,title,institution,fundingMin,fundingMax,deadline,fundingType,category,saved");
    }
    for tender in items {
        let deadline = tender
            .deadline
            .map(|d| d.to_string())
            .unwrap_or_default();
        println!(
            "{},{},{},{},{},{},{},{},{}",
            tender.id,
            csv_escape(&tender.title),
            csv_escape(&tender.institution),
            tender.funding_min,
            tender.funding_max,
            deadline,
            csv_escape(tender.funding_type.label()),
            csv_escape(tender.category.label()),
            saved.is_saved(tender.id),
        );
    }
}

pub(super) fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}
