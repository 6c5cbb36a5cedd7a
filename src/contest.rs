use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A name that is not part of the fixed contest vocabulary.
#[derive(Debug, Error)]
pub enum ParseContestError {
    #[error("unknown division {0:?}")]
    Division(String),
    #[error("unknown contest month {0:?}")]
    Month(String),
}

/// The four USACO difficulty tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Division {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }

    /// The form used in solution filenames.
    pub fn lowercase(self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }
}

impl FromStr for Division {
    type Err = ParseContestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bronze" => Ok(Self::Bronze),
            "Silver" => Ok(Self::Silver),
            "Gold" => Ok(Self::Gold),
            "Platinum" => Ok(Self::Platinum),
            _ => Err(ParseContestError::Division(s.to_string())),
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The month a contest ran in. USACO holds three regular contests plus the
/// season-ending US Open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContestMonth {
    December,
    January,
    February,
    UsOpen,
}

impl ContestMonth {
    /// The spelling used on usaco.org and in `div_to_probs.json` periods.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::December => "December",
            Self::January => "January",
            Self::February => "February",
            Self::UsOpen => "US Open",
        }
    }

    /// The short form used in solution filenames.
    pub fn abbrev(self) -> &'static str {
        match self {
            Self::December => "dec",
            Self::January => "jan",
            Self::February => "feb",
            Self::UsOpen => "open",
        }
    }
}

impl FromStr for ContestMonth {
    type Err = ParseContestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "December" => Ok(Self::December),
            "January" => Ok(Self::January),
            "February" => Ok(Self::February),
            "US Open" => Ok(Self::UsOpen),
            _ => Err(ParseContestError::Month(s.to_string())),
        }
    }
}

impl fmt::Display for ContestMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem record in the site's `EXTRA_PROBLEMS` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemInfo {
    pub unique_id: String,
    pub name: String,
    pub url: String,
    pub source: Division,
    pub difficulty: String,
    pub is_starred: bool,
    pub tags: Vec<String>,
    pub solution_metadata: SolutionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionMetadata {
    pub kind: String,
    pub usaco_id: String,
}

impl ProblemInfo {
    /// Builds the record for a freshly scraped problem. Tags and starring
    /// are curated by hand later, so they start out empty.
    pub fn new(cpid: &str, title: &str, division: Division) -> Self {
        Self {
            unique_id: format!("usaco-{}", cpid),
            name: title.to_string(),
            url: crate::scrape::problem_url(cpid),
            source: division,
            difficulty: "Easy".to_string(),
            is_starred: false,
            tags: vec![],
            solution_metadata: SolutionMetadata {
                kind: "USACO".to_string(),
                usaco_id: cpid.to_string(),
            },
        }
    }
}

/// Editorial filename convention, e.g. `sol_prob3_gold_dec23.html`.
pub fn solution_filename(
    number: u32,
    division: Division,
    month: ContestMonth,
    year: u32,
) -> String {
    format!(
        "sol_prob{}_{}_{}{:02}.html",
        number,
        division.lowercase(),
        month.abbrev(),
        year % 100
    )
}
