//! Contribution calendar fetcher
//!
//! Retrieves a user's public contribution calendar for one year and turns it
//! into a `date -> (level, count)` mapping. GitHub has served two markup
//! shapes for the calendar: the current table layout
//! (`td.ContributionCalendar-day`) and the older SVG layout
//! (`rect[data-date]`). Both are recognized; the first non-empty match set
//! wins and the two are never merged.
//!
//! Parsing is a pure function over the document text so it can be tested
//! offline against captured fixtures.

use lol_html::{RewriteStrSettings, element, rewrite_str};
use regex::Regex;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::levels::MAX_LEVEL;

const GITHUB_BASE: &str = "https://github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error raised when the calendar request itself fails. Malformed markup is
/// never an error: unreadable entries are defaulted or skipped instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP problem while fetching contributions: {0}")]
    Http(#[from] reqwest::Error),
}

/// Activity recorded for a single day: the 0–4 intensity tier and the raw
/// contribution count. The count is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    pub level: u8,
    pub count: u32,
}

/// Per-day mapping keyed by `YYYY-MM-DD` date strings.
pub type Contributions = BTreeMap<String, DayActivity>;

/// Build the HTTP client used for calendar requests.
///
/// The calendar endpoint only returns the bare fragment when asked the way a
/// browser's XHR would, hence the pinned desktop user agent and
/// `X-Requested-With` header.
pub fn http_client() -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
             AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/124.0 Safari/537.36",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Fetch the contribution calendar for `username` over `year`.
///
/// A failed primary request is fatal. If the document defers the calendar
/// behind an `<include-fragment>`, one follow-up request resolves it; a
/// failed follow-up is non-fatal and parsing proceeds with the initial
/// document.
///
/// # Arguments
/// * `client` - HTTP client from [`http_client`]
/// * `username` - GitHub login whose calendar is fetched
/// * `year` - Calendar year, fetched from January 1 through December 31
///
/// # Returns
/// Mapping from `YYYY-MM-DD` date strings to the day's activity
pub async fn fetch_contributions(
    client: &Client,
    username: &str,
    year: i32,
) -> Result<Contributions, FetchError> {
    let url = format!(
        "{GITHUB_BASE}/users/{username}/contributions?from={year}-01-01&to={year}-12-31"
    );
    log::info!("fetching contribution calendar: {url}");
    let mut document = get_text(client, &url).await?;

    if let Some(src) = fragment_src(&document) {
        let fragment_url = if src.starts_with('/') {
            format!("{GITHUB_BASE}{src}")
        } else {
            src
        };
        match get_text(client, &fragment_url).await {
            Ok(fragment) => document = fragment,
            Err(e) => {
                log::debug!("include-fragment request failed, using the initial document: {e}");
            }
        }
    }

    Ok(parse_contributions(&document))
}

async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Extract per-day activity from calendar markup.
///
/// Entries without a `data-date` never match. The level comes from
/// `data-level` or `data-activity-level` and defaults to 0 when absent or
/// non-integer; the count comes from `data-count` when present, otherwise
/// from the human-readable description. The last entry wins on duplicate
/// dates.
pub fn parse_contributions(html: &str) -> Contributions {
    let mut cells = collect_day_cells(html, "td.ContributionCalendar-day[data-date]");
    if cells.is_empty() {
        cells = collect_day_cells(html, "rect[data-date]");
    }

    let mut contributions = Contributions::new();
    for cell in cells {
        let level = cell.level.as_deref().map_or(0, parse_level);
        let count = match cell.count {
            Some(raw) => raw.trim().parse().unwrap_or(0),
            None => cell
                .label
                .as_deref()
                .and_then(count_from_description)
                .unwrap_or(0),
        };
        contributions.insert(cell.date, DayActivity { level, count });
    }
    contributions
}

/// Pull the contribution count out of a description attribute such as
/// `"17 contributions on January 6"`. Returns `None` when the description
/// does not carry a count (e.g. `"No contributions on ..."`).
pub fn count_from_description(label: &str) -> Option<u32> {
    let caps = description_count_regex().captures(label)?;
    caps[1].parse().ok()
}

fn description_count_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+) contributions? on").expect("valid regex"))
}

fn parse_level(raw: &str) -> u8 {
    raw.trim()
        .parse::<u8>()
        .map(|level| level.min(MAX_LEVEL))
        .unwrap_or(0)
}

struct RawDayCell {
    date: String,
    level: Option<String>,
    count: Option<String>,
    label: Option<String>,
}

fn collect_day_cells(html: &str, selector: &str) -> Vec<RawDayCell> {
    let mut cells = Vec::new();
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(selector, |el| {
                if let Some(date) = el.get_attribute("data-date") {
                    cells.push(RawDayCell {
                        date,
                        level: el
                            .get_attribute("data-level")
                            .or_else(|| el.get_attribute("data-activity-level")),
                        count: el.get_attribute("data-count"),
                        label: el
                            .get_attribute("aria-label")
                            .or_else(|| el.get_attribute("title")),
                    });
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );
    if let Err(e) = result {
        log::warn!("markup scan failed for `{selector}`: {e}");
    }
    cells
}

fn fragment_src(html: &str) -> Option<String> {
    let mut src = None;
    let result = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("include-fragment[src]", |el| {
                if src.is_none() {
                    src = el.get_attribute("src");
                }
                Ok(())
            })],
            ..RewriteStrSettings::new()
        },
    );
    if let Err(e) = result {
        log::debug!("include-fragment scan failed: {e}");
    }
    src
}
