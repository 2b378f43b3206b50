use std::fmt;

use serde::{Deserialize, Serialize};

/// Free-text description of the user's company.
///
/// Only the assistant reads it, as context for its answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    /// Registered company name.
    pub company_name: String,
    /// Sector the company works in.
    pub industry: String,
    /// Head-count bracket, e.g. "10-49".
    pub company_size: String,
    /// What the company wants to achieve with funding.
    pub main_goals: String,
    /// The project funding is sought for.
    pub project_description: String,
}

impl Profile {
    /// Field names paired with their values, in form order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("company_name", &self.company_name),
            ("industry", &self.industry),
            ("company_size", &self.company_size),
            ("main_goals", &self.main_goals),
            ("project_description", &self.project_description),
        ]
    }

    /// Names of the fields that are blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Renders the profile as a context block for the assistant.
    ///
    /// Blank fields are written as `N/A`.
    #[must_use]
    pub fn context(&self) -> String {
        let or_na = |value: &str| {
            if value.trim().is_empty() {
                "N/A".to_string()
            } else {
                value.trim().to_string()
            }
        };
        format!(
            "Company context:\n- Name: {}\n- Industry: {}\n- Size: {}\n- Main goals: {}\n- Project: {}",
            or_na(&self.company_name),
            or_na(&self.industry),
            or_na(&self.company_size),
            or_na(&self.main_goals),
            or_na(&self.project_description),
        )
    }
}

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}
