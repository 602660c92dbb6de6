//! Roster ingestion from a spreadsheet published as CSV.
//!
//! The clan leadership maintains requirements in a sheet with one row per
//! clan. Column headers vary between sheet revisions, so they are resolved
//! by case-insensitive substring match rather than fixed position. Numeric
//! cells are free text ("15 members", "~10") and degrade to defaults rather
//! than failing the row.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use clashdash_api::normalize_tag;

#[derive(thiserror::Error, Debug)]
pub enum RosterError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status}")]
    HttpStatus { status: StatusCode },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column: {0}")]
    MissingColumn(&'static str),
}

/// One clan's requirements as declared in the roster sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    /// Canonical clan tag (normalized on ingest).
    pub tag: String,

    /// Roster format, e.g. "serious" or "lazy". Compared case-insensitively;
    /// any other value behaves as unknown.
    #[serde(default)]
    pub format: String,

    /// Member quota for the clan; 0 when the cell is unparseable.
    #[serde(default)]
    pub required_members: i64,

    /// Free-text town-hall requirement, e.g. "TH17, TH16 and below".
    #[serde(default)]
    pub town_hall_rule: String,

    /// League name as declared in the sheet; `None` falls back to the
    /// live-fetched war league.
    #[serde(default)]
    pub league: Option<String>,

    /// Ordering key within the league; unranked clans sort last.
    #[serde(default = "default_rank")]
    pub occupancy_rank: i64,
}

pub(crate) fn default_rank() -> i64 {
    999
}

/// Fetches and parses the published roster sheet.
pub struct RosterClient {
    url: String,
}

impl RosterClient {
    /// Creates a client for the given published-CSV URL.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    /// Downloads the sheet and returns one row per clan with a usable tag.
    /// Each fetch carries a 30-second bound.
    pub async fn fetch_roster(&self) -> Result<Vec<RosterRow>, RosterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let resp = http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::error!("roster fetch failed with status {}", status);
            return Err(RosterError::HttpStatus { status });
        }
        let body = resp.text().await?;
        parse_roster(&body)
    }
}

/// Parses published-CSV content into roster rows. Rows without a clan tag
/// are skipped.
pub fn parse_roster(csv_text: &str) -> Result<Vec<RosterRow>, RosterError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let tag_col = find_column(&headers, &["tag"]).ok_or(RosterError::MissingColumn("tag"))?;
    let format_col = find_column(&headers, &["format"]);
    let required_col = find_column(&headers, &["required", "members"]);
    let rule_col = find_column(&headers, &["th", "town hall", "townhall"]);
    let league_col = find_column(&headers, &["league"]);
    let rank_col = find_column(&headers, &["rank", "order"]);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw_tag = record.get(tag_col).unwrap_or("").trim();
        if raw_tag.is_empty() {
            continue;
        }
        rows.push(RosterRow {
            tag: normalize_tag(raw_tag),
            format: field(&record, format_col),
            required_members: first_int(&field(&record, required_col)).unwrap_or(0),
            town_hall_rule: field(&record, rule_col),
            league: Some(field(&record, league_col)).filter(|l| !l.is_empty()),
            occupancy_rank: first_int(&field(&record, rank_col)).unwrap_or_else(default_rank),
        });
    }
    Ok(rows)
}

fn field(record: &csv::StringRecord, col: Option<usize>) -> String {
    col.and_then(|i| record.get(i))
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Returns the first header whose name contains any of the candidates.
fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        if let Some(i) = headers.iter().position(|h| h.contains(candidate)) {
            return Some(i);
        }
    }
    None
}

/// Extracts the first run of digits from free text, e.g. "15 members" -> 15.
fn first_int(text: &str) -> Option<i64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
