use crate::error::{decode, response_text, LookupError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::fmt::{Display, Formatter};

const STATUS_QUERY: &str = "\
query ($id: Int) {
  Media (id: $id, type: ANIME) {
    id
    title {
      romaji
      english
    }
    status
  }
}";

const SEARCH_QUERY: &str = "\
query ($search: String) {
  Page {
    media (search: $search, type: ANIME) {
      id
      title {
        romaji
        english
      }
    }
  }
}";

/// Label shown for any status code missing from [`STATUS_LABELS`].
pub const UNKNOWN_STATUS_LABEL: &str = "Unknown status";

pub const STATUS_LABELS: [(&str, &str); 5] = [
    ("FINISHED", "Finished Airing"),
    ("RELEASING", "Currently Airing"),
    ("NOT_YET_RELEASED", "Not Yet Released"),
    ("CANCELLED", "Cancelled"),
    ("HIATUS", "On Hiatus"),
];

pub fn status_label(code: &str) -> &'static str {
    STATUS_LABELS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_STATUS_LABEL)
}

#[derive(Deserialize)]
struct SearchResponse {
    data: SearchData,
}

#[derive(Deserialize)]
struct SearchData {
    #[serde(rename = "Page")]
    page: SearchPage,
}

#[derive(Deserialize)]
struct SearchPage {
    media: Vec<AnilistMedia>,
}

#[derive(Deserialize)]
struct StatusResponse {
    data: StatusData,
}

#[derive(Deserialize)]
struct StatusData {
    #[serde(rename = "Media")]
    media: Option<AnilistMedia>,
}

#[derive(Deserialize)]
struct AnilistMedia {
    id: u32,
    title: AnilistTitle,
    #[serde(default)]
    status: Option<MediaStatus>,
}

#[derive(Deserialize)]
struct AnilistTitle {
    romaji: Option<String>,
    english: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MediaStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
    /// A code AniList sent that is not handled, kept verbatim.
    Other(String),
}

impl From<String> for MediaStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "FINISHED" => MediaStatus::Finished,
            "RELEASING" => MediaStatus::Releasing,
            "NOT_YET_RELEASED" => MediaStatus::NotYetReleased,
            "CANCELLED" => MediaStatus::Cancelled,
            "HIATUS" => MediaStatus::Hiatus,
            _ => MediaStatus::Other(code),
        }
    }
}

impl MediaStatus {
    pub fn code(&self) -> &str {
        match self {
            MediaStatus::Finished => "FINISHED",
            MediaStatus::Releasing => "RELEASING",
            MediaStatus::NotYetReleased => "NOT_YET_RELEASED",
            MediaStatus::Cancelled => "CANCELLED",
            MediaStatus::Hiatus => "HIATUS",
            MediaStatus::Other(code) => code,
        }
    }

    pub fn label(&self) -> &'static str {
        status_label(self.code())
    }
}

impl Display for MediaStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub id: u32,
    pub title_romaji: String,
    pub title_english: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub id: u32,
    pub title_romaji: String,
    pub title_english: Option<String>,
    pub status: MediaStatus,
}

impl Display for SearchResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "AniList ID: {}", self.id)?;
        writeln!(f, "   Title (Romaji): {}", self.title_romaji)?;
        write!(
            f,
            "   Title (English): {}",
            self.title_english.as_deref().unwrap_or("None")
        )
    }
}

impl AnilistMedia {
    fn into_search_result(self) -> Option<SearchResult> {
        Some(SearchResult {
            id: self.id,
            title_romaji: self.title.romaji?,
            title_english: self.title.english,
        })
    }

    fn into_status_info(self) -> Option<StatusInfo> {
        Some(StatusInfo {
            id: self.id,
            title_romaji: self.title.romaji?,
            title_english: self.title.english,
            status: self
                .status
                .unwrap_or_else(|| MediaStatus::Other("null".into())),
        })
    }
}

/// Hits without a romaji title are dropped, the rest keep AniList's order.
fn parse_search(body: &str) -> Result<Vec<SearchResult>> {
    let resp: SearchResponse = decode(body)?;
    Ok(resp
        .data
        .page
        .media
        .into_iter()
        .filter_map(|media| {
            let id = media.id;
            let result = media.into_search_result();
            if result.is_none() {
                tracing::debug!(id, "Skipping search hit without romaji title");
            }
            result
        })
        .collect())
}

fn parse_status(body: &str, id: u32) -> Result<StatusInfo> {
    let resp: StatusResponse = decode(body)?;
    let media = resp.data.media.ok_or(LookupError::NotFound(id))?;
    media
        .into_status_info()
        .ok_or(LookupError::MissingTitle(id))
}

/// Title search and status lookup against the metadata service.
pub trait MediaLookup {
    fn search_anime(&self, title: &str) -> Result<Vec<SearchResult>>;

    fn anime_status(&self, id: u32) -> Result<StatusInfo>;
}

pub struct AnilistClient {
    client: Client,
    endpoint: String,
}

impl AnilistClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    fn send_query(&self, query: &str, variables: serde_json::Value) -> Result<String> {
        let json = json!({"query": query, "variables": variables});

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .body(json.to_string())
            .send()?;

        response_text(resp)
    }
}

impl MediaLookup for AnilistClient {
    /// Search AniList for anime matching `title`, in the order AniList ranks them.
    fn search_anime(&self, title: &str) -> Result<Vec<SearchResult>> {
        tracing::debug!(%title, endpoint = %self.endpoint, "Searching AniList");
        let body = self.send_query(SEARCH_QUERY, json!({ "search": title }))?;
        let results = parse_search(&body)?;
        tracing::debug!(count = results.len(), "AniList search finished");
        Ok(results)
    }

    fn anime_status(&self, id: u32) -> Result<StatusInfo> {
        tracing::debug!(id, endpoint = %self.endpoint, "Fetching AniList status");
        let body = self.send_query(STATUS_QUERY, json!({ "id": id }))?;
        let info = parse_status(&body, id)?;
        tracing::debug!(
            id = info.id,
            english = ?info.title_english,
            status = %info.status,
            "AniList status resolved"
        );
        Ok(info)
    }
}
