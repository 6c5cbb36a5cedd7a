use crate::contest::{ContestMonth, Division};
use reqwest::blocking::Client;
use select::document::Document;
use select::predicate::Name;
use thiserror::Error;

/// The five fields read off a problem page's headings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedProblem {
    pub number: u32,
    pub title: String,
    pub year: u32,
    pub month: ContestMonth,
    pub division: Division,
}

/// Why a problem page could not be turned into a `ScrapedProblem`.
/// The two headings each distinguish "absent" from "present but unreadable",
/// so a failed run can name its exact cause.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to usaco.org failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no \"Problem <number>. <title>\" heading on the page")]
    ProblemHeadingNotFound,
    #[error("malformed problem heading {0:?}")]
    MalformedProblemHeading(String),
    #[error("no \"USACO <year> <month> Contest, <division>\" heading on the page")]
    ContestHeadingNotFound,
    #[error("malformed contest heading {0:?}")]
    MalformedContestHeading(String),
}

pub fn problem_url(cpid: &str) -> String {
    format!("http://usaco.org/index.php?page=viewproblem2&cpid={}", cpid)
}

/// Fetches the problem page for `cpid` and reads its headings.
pub fn fetch_problem(client: &Client, cpid: &str) -> Result<ScrapedProblem, ScrapeError> {
    let response = client.get(problem_url(cpid)).send()?.error_for_status()?;
    let page_text = response.text()?;
    scrape_problem(&Document::from(page_text.as_str()))
}

/// Reads the problem and contest headings from a parsed problem page.
pub fn scrape_problem(page: &Document) -> Result<ScrapedProblem, ScrapeError> {
    let headings: Vec<String> = page
        .find(Name("h2"))
        .map(|node| node.text().trim().to_string())
        .collect();

    let problem = headings
        .iter()
        .find(|text| text.starts_with("Problem "))
        .ok_or(ScrapeError::ProblemHeadingNotFound)?;
    let (number, title) = parse_problem_heading(&problem["Problem ".len()..])
        .ok_or_else(|| ScrapeError::MalformedProblemHeading(problem.clone()))?;

    let contest = headings
        .iter()
        .find(|text| text.starts_with("USACO "))
        .ok_or(ScrapeError::ContestHeadingNotFound)?;
    let (year, month, division) = parse_contest_heading(&contest["USACO ".len()..])
        .ok_or_else(|| ScrapeError::MalformedContestHeading(contest.clone()))?;

    Ok(ScrapedProblem {
        number,
        title,
        year,
        month,
        division,
    })
}

/// Parses `<number>. <title>`.
fn parse_problem_heading(rest: &str) -> Option<(u32, String)> {
    let (number, title) = rest.split_once(". ")?;
    let number = number.parse().ok()?;
    Some((number, title.trim().to_string()))
}

/// Parses `<year> <month> Contest, <division>`, where the month may be the
/// two-word "US Open".
fn parse_contest_heading(rest: &str) -> Option<(u32, ContestMonth, Division)> {
    let (period, division) = rest.split_once(" Contest, ")?;
    let (year, month) = period.split_once(' ')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    let division = division.trim().parse().ok()?;
    Some((year, month, division))
}
