use std::{collections::HashSet, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A public funding opportunity.
///
/// Tenders are created by a [`TenderSource`](crate::storage::TenderSource)
/// when the list is loaded and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// Identifier, unique within a loaded list.
    pub id: u32,
    /// Headline of the call.
    pub title: String,
    /// Short description shown in result lists.
    pub summary: String,
    /// Name of the funding body.
    pub institution: String,
    /// Lower bound of the funding on offer.
    pub funding_min: u64,
    /// Upper bound of the funding on offer.
    pub funding_max: u64,
    /// Application deadline.
    ///
    /// `None` when the source supplied a value that is not a calendar date.
    #[serde(with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
    /// How the funding is paid out.
    pub funding_type: FundingType,
    /// Kinds of applicants that may apply, in display order.
    pub eligible_entities: Vec<String>,
    /// Thematic area of the call.
    pub category: Category,
    /// Long-form markdown description.
    pub full_description: String,
    /// Short highlights, in display order.
    pub conclusion_points: Vec<String>,
}

impl Tender {
    /// Whether the given applicant type is listed as eligible.
    #[must_use]
    pub fn is_eligible(&self, entity: &str) -> bool {
        self.eligible_entities.iter().any(|e| e == entity)
    }
}

/// A problem with a tender list as a whole.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidTender {
    /// Two tenders share an id.
    #[error("duplicate tender id {0}")]
    DuplicateId(u32),

    /// The funding bounds are inverted.
    #[error("tender {id} has funding minimum {min} above maximum {max}")]
    FundingRange {
        /// Offending tender.
        id: u32,
        /// Stated minimum.
        min: u64,
        /// Stated maximum.
        max: u64,
    },
}

/// Checks the invariants a loaded list must hold before it is used.
///
/// # Errors
///
/// Returns the first duplicate id or inverted funding range found.
pub fn validate(tenders: &[Tender]) -> Result<(), InvalidTender> {
    let mut seen = HashSet::with_capacity(tenders.len());
    for tender in tenders {
        if !seen.insert(tender.id) {
            return Err(InvalidTender::DuplicateId(tender.id));
        }
        if tender.funding_min > tender.funding_max {
            return Err(InvalidTender::FundingRange {
                id: tender.id,
                min: tender.funding_min,
                max: tender.funding_max,
            });
        }
    }
    Ok(())
}

/// Generates the closed label enums used for tender classification.
///
/// Each variant has a kebab-case slug for the command line and the label
/// used by the tender data itself.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($slug:literal, $label:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All values, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The label used in tender data.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// The short command-line name.
            #[must_use]
            pub const fn slug(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            /// Accepts either the slug or the label, ignoring case.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| {
                        value.slug().eq_ignore_ascii_case(needle)
                            || value.label().to_lowercase() == needle.to_lowercase()
                    })
                    .ok_or_else(|| UnknownLabel {
                        kind: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }
    };
}

labelled_enum! {
    /// How a tender's funding is paid out.
    pub enum FundingType {
        /// Non-repayable grant.
        Grant => ("grant", "Nepovratna sredstva"),
        /// Operating or investment subsidy.
        Subsidy => ("subsidy", "Subvencija"),
        /// Public co-investment alongside private capital.
        CoInvestment => ("co-investment", "So-investicija"),
        /// Aid that must be paid back.
        RepayableAid => ("repayable-aid", "Vračljiva pomoč"),
        /// Loan with a subsidised interest rate.
        SubsidizedLoan => ("subsidized-loan", "Subvencioniran kredit"),
    }
}

labelled_enum! {
    /// Thematic area of a tender.
    pub enum Category {
        /// Technology and innovation.
        TechnologyInnovation => ("technology", "Tehnologija in inovacije"),
        /// Green transition.
        GreenTransition => ("green-transition", "Zeleni prehod"),
        /// Agriculture.
        Agriculture => ("agriculture", "Kmetijstvo"),
        /// Tourism.
        Tourism => ("tourism", "Turizem"),
        /// Digitalization.
        Digitalization => ("digitalization", "Digitalizacija"),
        /// Social entrepreneurship.
        SocialEntrepreneurship => ("social-entrepreneurship", "Socialno podjetništvo"),
    }
}

/// A label that does not name any known value.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

/// Parses a calendar date the way tender data writes it.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (the date part is kept).
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    })
}

mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => s.collect_str(&date.format("%Y-%m-%d")),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(d)?;
        let date = super::parse_date(&raw);
        if date.is_none() {
            tracing::warn!("ignoring unparseable tender deadline '{raw}'");
        }
        Ok(date)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use test_case::test_case;

    use super::*;

    /// Builds a tender with neutral values for the fields a test does not
    /// care about.
    pub fn tender(id: u32, deadline: &str, funding_max: u64, category: Category) -> Tender {
        Tender {
            id,
            title: format!("Tender {id}"),
            summary: String::new(),
            institution: "Slovenski podjetniški sklad".to_string(),
            funding_min: funding_max / 10,
            funding_max,
            deadline: parse_date(deadline),
            funding_type: FundingType::Grant,
            eligible_entities: vec!["MSP".to_string()],
            category,
            full_description: String::new(),
            conclusion_points: Vec::new(),
        }
    }

    #[test]
    fn deserializes_camel_case_wire_format() {
        let json = r#"{
            "id": 3,
            "title": "Inovativni turizem 2024",
            "summary": "Podpora razvoju",
            "institution": "SPIRIT Slovenija",
            "fundingMin": 20000,
            "fundingMax": 150000,
            "deadline": "2024-11-30",
            "fundingType": "So-investicija",
            "eligibleEntities": ["MSP", "Startupi"],
            "category": "Turizem",
            "fullDescription": "Predmet razpisa",
            "conclusionPoints": ["Poudarek"]
        }"#;

        let tender: Tender = serde_json::from_str(json).unwrap();

        assert_eq!(tender.funding_type, FundingType::CoInvestment);
        assert_eq!(tender.category, Category::Tourism);
        assert_eq!(tender.deadline, NaiveDate::from_ymd_opt(2024, 11, 30));
        assert!(tender.is_eligible("Startupi"));
        assert!(!tender.is_eligible("Občine"));
    }

    #[test]
    fn unparseable_deadline_is_kept_as_none() {
        let mut value = serde_json::to_value(tender(1, "2024-01-01", 10, Category::Tourism)).unwrap();
        value["deadline"] = serde_json::Value::from("end of march");

        let tender: Tender = serde_json::from_value(value).unwrap();

        assert_eq!(tender.deadline, None);
    }

    #[test_case("grant", FundingType::Grant; "slug")]
    #[test_case("Nepovratna sredstva", FundingType::Grant; "label")]
    #[test_case("vračljiva pomoč", FundingType::RepayableAid; "label ignoring case")]
    #[test_case("SUBSIDIZED-LOAN", FundingType::SubsidizedLoan; "slug ignoring case")]
    fn funding_type_parses(input: &str, expected: FundingType) {
        assert_eq!(input.parse::<FundingType>().unwrap(), expected);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let error = "space".parse::<Category>().unwrap_err();
        assert_eq!(error.to_string(), "unknown Category 'space'");
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let tenders = vec![
            tender(1, "2024-01-01", 10, Category::Tourism),
            tender(1, "2024-02-01", 20, Category::Tourism),
        ];
        assert_eq!(validate(&tenders), Err(InvalidTender::DuplicateId(1)));
    }

    #[test]
    fn validate_rejects_inverted_funding() {
        let mut bad = tender(7, "2024-01-01", 10, Category::Tourism);
        bad.funding_min = 11;
        assert_eq!(
            validate(&[bad]),
            Err(InvalidTender::FundingRange {
                id: 7,
                min: 11,
                max: 10
            })
        );
    }

    #[test_case("2024-10-31", Some((2024, 10, 31)); "plain date")]
    #[test_case("2024-10-31T12:00:00Z", Some((2024, 10, 31)); "timestamp")]
    #[test_case("31.10.2024", None; "local format")]
    #[test_case("", None; "empty")]
    fn parse_date_accepts_iso_forms(input: &str, expected: Option<(i32, u32, u32)>) {
        let expected = expected.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        assert_eq!(parse_date(input), expected);
    }
}
