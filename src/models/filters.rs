use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::IntentError;

/// Categories offered by the category selector, in display order.
///
/// Records may carry other categories; those get no selector option.
pub const KNOWN_CATEGORIES: [&str; 4] = ["Education", "Technologie", "Science", "Marketing"];

/// First-stage projection of the collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Original order
    #[default]
    All,
    /// Only records flagged as trending
    Trending,
    /// Most recent first
    Recent,
    /// Highest rated first
    Top,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::All, Tab::Trending, Tab::Recent, Tab::Top];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::All => "all",
            Tab::Trending => "trending",
            Tab::Recent => "recent",
            Tab::Top => "top",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::All => "Tout",
            Tab::Trending => "Tendances",
            Tab::Recent => "Récents",
            Tab::Top => "Mieux notés",
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s)
            .ok_or_else(|| format!("unknown tab: {}", s))
    }
}

/// Category selector value: everything, or exactly one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parses a selector value, accepting only `all` and the known categories
    pub fn parse_known(value: &str) -> Result<Self, IntentError> {
        match value {
            "all" => Ok(CategoryFilter::All),
            known if KNOWN_CATEGORIES.contains(&known) => Ok(CategoryFilter::Only(known.to_string())),
            other => Err(IntentError::UnknownCategory(other.to_string())),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => "all".to_string(),
            CategoryFilter::Only(category) => category,
        }
    }
}
