use anyhow::Context;
use clap::{Parser, ValueEnum};
use tenders_core::{
    storage::{SavedTendersKey, SearchStateKey},
    Tender, Workspace,
};
use tracing::instrument;

use super::{format, list::print_json, terminal::Colorize};

#[derive(Debug, Parser)]
pub struct Show {
    /// Id of the tender
    id: u32,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    output: ShowFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShowFormat {
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let tenders = workspace
            .load_tenders()
            .context("failed to load tenders")?;
        let Some(tender) = tenders.iter().find(|t| t.id == self.id) else {
            anyhow::bail!("No tender with id {}", self.id);
        };

        let preferences = workspace.preferences();
        let mut session = workspace.load_session()?;
        session.select(Some(tender.id));
        preferences.set::<SearchStateKey>(&session)?;

        match self.output {
            ShowFormat::Json => print_json(tender)?,
            ShowFormat::Pretty => {
                let saved = preferences.get::<SavedTendersKey>().is_saved(tender.id);
                print_pretty(tender, saved, chrono::Local::now().date_naive());
            }
        }
        Ok(())
    }
}

fn print_pretty(tender: &Tender, saved: bool, today: chrono::NaiveDate) {
    let marker = if saved { " ★" } else { "" };
    println!("{}{marker}", tender.title.heading());
    println!("{}", tender.institution.dim());
    println!();

    println!(
        "  Funding:     {} - {}",
        format::amount(tender.funding_min),
        format::amount(tender.funding_max)
    );
    let remaining = tender
        .deadline
        .map(|date| format!(" ({})", format::days_left(date, today)))
        .unwrap_or_default();
    println!("  Deadline:    {}{remaining}", format::deadline(tender.deadline));
    println!("  Type:        {}", tender.funding_type);
    println!("  Category:    {}", tender.category);
    if !tender.eligible_entities.is_empty() {
        println!("  Eligible:    {}", tender.eligible_entities.join(", "));
    }
    println!();

    if !tender.summary.is_empty() {
        println!("{}", tender.summary);
        println!();
    }
    if !tender.full_description.is_empty() {
        println!("{}", "Description".heading());
        println!("{}", tender.full_description);
        println!();
    }
    if !tender.conclusion_points.is_empty() {
        println!("{}", "Key points".heading());
        for point in &tender.conclusion_points {
            println!("  • {point}");
        }
    }
}
