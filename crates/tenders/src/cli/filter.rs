use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, ValueEnum};
use tenders_core::{
    domain::criteria::parse_date_bound,
    engine::{eligible_entities, institutions, SortConfig, SortDirection, SortKey},
    storage::SearchStateKey,
    Category, FilterCriteria, FundingType, Workspace,
};
use tracing::instrument;

use super::terminal::Colorize;

/// A choice that `all` (or an empty value) clears.
#[derive(Debug, Clone)]
struct Choice<T>(Option<T>);

fn parse_choice<T>(s: &str) -> Result<Choice<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("all") {
        return Ok(Choice(None));
    }
    s.parse().map(|value| Choice(Some(value))).map_err(|e: T::Err| e.to_string())
}

#[derive(Debug, Clone, Copy)]
struct DateBound(Option<NaiveDate>);

fn parse_bound(s: &str) -> Result<DateBound, String> {
    parse_date_bound(s).map(DateBound).map_err(|e| e.to_string())
}

/// Criteria flags shared by `filter edit` and `searches edit`.
///
/// Only the flags given are changed.
#[derive(Debug, Default, Args)]
pub struct CriteriaArgs {
    /// Free-text keyword matched against title and summary
    #[arg(long)]
    keyword: Option<String>,

    /// Funding type, by slug or label ("all" clears)
    #[arg(long, value_parser = parse_choice::<FundingType>)]
    funding_type: Option<Choice<FundingType>>,

    /// Category, by slug or label ("all" clears)
    #[arg(long, value_parser = parse_choice::<Category>)]
    category: Option<Choice<Category>>,

    /// Exact institution name ("all" clears)
    #[arg(long, value_parser = parse_choice::<String>)]
    institution: Option<Choice<String>>,

    /// Eligible entity ("all" clears)
    #[arg(long, value_parser = parse_choice::<String>)]
    eligible_entity: Option<Choice<String>>,

    /// Earliest deadline, YYYY-MM-DD ("" clears)
    #[arg(long, value_name = "DATE", value_parser = parse_bound)]
    deadline_start: Option<DateBound>,

    /// Latest deadline, YYYY-MM-DD ("" clears)
    #[arg(long, value_name = "DATE", value_parser = parse_bound)]
    deadline_end: Option<DateBound>,

    /// Minimum funding in euro, recorded with the search (0 clears)
    #[arg(long, value_name = "EUR")]
    min_funding: Option<u64>,

    /// Maximum funding in euro, recorded with the search (0 clears)
    #[arg(long, value_name = "EUR")]
    max_funding: Option<u64>,

    /// Start from empty criteria before applying the other flags
    #[arg(long)]
    clear: bool,
}

impl CriteriaArgs {
    /// Applies the given flags to `criteria`.
    pub fn apply_to(self, criteria: &mut FilterCriteria) {
        if self.clear {
            *criteria = FilterCriteria::default();
        }
        if let Some(keyword) = self.keyword {
            criteria.keyword = keyword;
        }
        if let Some(Choice(value)) = self.funding_type {
            criteria.funding_type = value;
        }
        if let Some(Choice(value)) = self.category {
            criteria.category = value;
        }
        if let Some(Choice(value)) = self.institution {
            criteria.institution = value;
        }
        if let Some(Choice(value)) = self.eligible_entity {
            criteria.eligible_entity = value;
        }
        if let Some(DateBound(value)) = self.deadline_start {
            criteria.deadline_start = value;
        }
        if let Some(DateBound(value)) = self.deadline_end {
            criteria.deadline_end = value;
        }
        if let Some(value) = self.min_funding {
            criteria.min_funding = (value > 0).then_some(value);
        }
        if let Some(value) = self.max_funding {
            criteria.max_funding = (value > 0).then_some(value);
        }
    }
}

/// Prints criteria as chips, or `none` when unconstrained.
pub fn print_criteria(label: &str, criteria: &FilterCriteria) {
    let chips = criteria.describe();
    if chips.is_empty() {
        println!("{label}: {}", "none".dim());
    } else {
        println!("{label}: {}", chips.join(", ").info());
    }
}

#[derive(Debug, Parser)]
pub struct Filter {
    #[command(subcommand)]
    command: FilterCommand,
}

#[derive(Debug, Parser)]
enum FilterCommand {
    /// Show the draft and active filters
    Show,

    /// Change the draft filters
    ///
    /// Edits take effect on `tenders filter apply`.
    Edit(CriteriaArgs),

    /// Make the draft filters active and return to page one
    Apply,

    /// Clear the draft filters
    Reset,

    /// List the values the filters accept
    Options,
}

impl Filter {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let preferences = workspace.preferences();
        let mut session = workspace.load_session()?;

        match self.command {
            FilterCommand::Show => {
                print_criteria("Active", session.active());
                print_criteria("Draft", session.draft());
                if session.has_pending_changes() {
                    println!(
                        "{}",
                        "Draft has unapplied changes. Run: tenders filter apply".warning()
                    );
                }
            }
            FilterCommand::Edit(args) => {
                args.apply_to(session.draft_mut());
                preferences.set::<SearchStateKey>(&session)?;
                print_criteria("Draft", session.draft());
                if session.has_pending_changes() {
                    println!("{}", "Run `tenders filter apply` to search.".dim());
                }
            }
            FilterCommand::Apply => {
                let tenders = workspace
                    .load_tenders()
                    .context("failed to load tenders")?;
                session.commit();
                preferences.set::<SearchStateKey>(&session)?;
                let count = session.results(&tenders).summary.count;
                print_criteria("Active", session.active());
                println!("{}", format!("{count} tenders match").success());
            }
            FilterCommand::Reset => {
                session.reset_draft();
                preferences.set::<SearchStateKey>(&session)?;
                println!("Draft filters cleared");
                if session.has_pending_changes() {
                    println!("{}", "Run `tenders filter apply` to show all tenders.".dim());
                }
            }
            FilterCommand::Options => {
                let tenders = workspace
                    .load_tenders()
                    .context("failed to load tenders")?;
                println!("{}", "Funding types".heading());
                for value in FundingType::ALL {
                    println!("  {:<24} {}", value.slug(), value.label().dim());
                }
                println!("{}", "Categories".heading());
                for value in Category::ALL {
                    println!("  {:<24} {}", value.slug(), value.label().dim());
                }
                println!("{}", "Institutions".heading());
                for value in institutions(&tenders) {
                    println!("  {value}");
                }
                println!("{}", "Eligible entities".heading());
                for value in eligible_entities(&tenders) {
                    println!("  {value}");
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKeyArg {
    Deadline,
    FundingMax,
}

impl From<SortKeyArg> for SortKey {
    fn from(value: SortKeyArg) -> Self {
        match value {
            SortKeyArg::Deadline => Self::Deadline,
            SortKeyArg::FundingMax => Self::FundingMax,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum DirectionArg {
    #[default]
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(value: DirectionArg) -> Self {
        match value {
            DirectionArg::Asc => Self::Asc,
            DirectionArg::Desc => Self::Desc,
        }
    }
}

#[derive(Debug, Parser)]
pub struct Sort {
    /// Field to sort by
    #[arg(value_enum)]
    key: SortKeyArg,

    /// Sort direction
    #[arg(value_enum, default_value = "asc")]
    direction: DirectionArg,
}

impl Sort {
    #[instrument(level = "debug", skip(workspace))]
    pub fn run(self, workspace: &Workspace) -> anyhow::Result<()> {
        let sort = SortConfig {
            key: self.key.into(),
            direction: self.direction.into(),
        };
        let mut session = workspace.load_session()?;
        session.set_sort(sort);
        workspace.preferences().set::<SearchStateKey>(&session)?;

        let direction = match sort.direction {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        };
        println!("{}", format!("Sorting by {} ({direction})", sort.key).success());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;
    use test_case::test_case;

    use super::*;

    fn workspace() -> (tempfile::TempDir, Workspace) {
        let tmp = tempdir().unwrap();
        let workspace = Workspace::open(tmp.path().to_path_buf());
        (tmp, workspace)
    }

    fn run(workspace: &Workspace, command: FilterCommand) {
        Filter { command }.run(workspace).unwrap();
    }

    #[test_case("all", None)]
    #[test_case("", None)]
    #[test_case("grant", Some(FundingType::Grant))]
    fn choice_accepts_all_as_clear(input: &str, expected: Option<FundingType>) {
        assert_eq!(parse_choice::<FundingType>(input).unwrap().0, expected);
    }

    #[test]
    fn choice_rejects_unknown_values() {
        assert!(parse_choice::<Category>("space-travel").is_err());
    }

    #[test]
    fn date_bound_rejects_garbage() {
        assert!(parse_bound("tomorrow").is_err());
        assert_eq!(parse_bound("").unwrap().0, None);
    }

    #[test]
    fn edit_then_apply_activates_the_draft() {
        let (_tmp, workspace) = workspace();

        run(
            &workspace,
            FilterCommand::Edit(CriteriaArgs {
                keyword: Some("digital".to_string()),
                category: Some(Choice(Some(Category::Digitalization))),
                ..CriteriaArgs::default()
            }),
        );

        let session = workspace.session();
        assert_eq!(session.draft().keyword, "digital");
        assert!(session.active().is_unconstrained());

        run(&workspace, FilterCommand::Apply);

        let session = workspace.session();
        assert_eq!(session.active().category, Some(Category::Digitalization));
        assert!(!session.has_pending_changes());
    }

    #[test]
    fn reset_clears_only_the_draft() {
        let (_tmp, workspace) = workspace();
        run(
            &workspace,
            FilterCommand::Edit(CriteriaArgs {
                keyword: Some("energy".to_string()),
                ..CriteriaArgs::default()
            }),
        );
        run(&workspace, FilterCommand::Apply);

        run(&workspace, FilterCommand::Reset);

        let session = workspace.session();
        assert!(session.draft().is_unconstrained());
        assert_eq!(session.active().keyword, "energy");
    }

    #[test]
    fn unreadable_session_is_not_overwritten() {
        let (_tmp, workspace) = workspace();
        let dir = workspace.preferences().dir().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("searchPageState.json");
        std::fs::write(&path, "42").unwrap();

        let result = Filter {
            command: FilterCommand::Reset,
        }
        .run(&workspace);

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "42");
    }

    #[test]
    fn zero_funding_clears_the_bound() {
        let mut criteria = FilterCriteria {
            min_funding: Some(10_000),
            ..FilterCriteria::default()
        };

        CriteriaArgs {
            min_funding: Some(0),
            max_funding: Some(50_000),
            ..CriteriaArgs::default()
        }
        .apply_to(&mut criteria);

        assert_eq!(criteria.min_funding, None);
        assert_eq!(criteria.max_funding, Some(50_000));
    }

    #[test]
    fn clear_starts_from_empty_criteria() {
        let mut criteria = FilterCriteria {
            keyword: "old".to_string(),
            ..FilterCriteria::default()
        };

        CriteriaArgs {
            clear: true,
            ..CriteriaArgs::default()
        }
        .apply_to(&mut criteria);

        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn sort_is_remembered() {
        let (_tmp, workspace) = workspace();

        Sort {
            key: SortKeyArg::FundingMax,
            direction: DirectionArg::Desc,
        }
        .run(&workspace)
        .unwrap();

        assert_eq!(
            workspace.session().sort(),
            SortConfig {
                key: SortKey::FundingMax,
                direction: SortDirection::Desc,
            }
        );
    }
}
