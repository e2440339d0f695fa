use crate::error::{decode, response_text, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

/// Something that can tell whether a curated release entry exists for an AniList id.
pub trait CatalogCheck {
    fn has_entry(&self, anilist_id: u32) -> Result<bool>;

    /// Page for the curated entry of `anilist_id`.
    fn entry_url(&self, anilist_id: u32) -> String;
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(rename = "totalItems")]
    total_items: u64,
}

fn parse_total_items(body: &str) -> Result<u64> {
    let resp: RecordsResponse = decode(body)?;
    Ok(resp.total_items)
}

pub struct SeadexClient {
    client: Client,
    api_url: String,
    base_url: String,
}

impl SeadexClient {
    pub fn new(client: Client, api_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            base_url: base_url.into(),
        }
    }
}

impl CatalogCheck for SeadexClient {
    fn has_entry(&self, anilist_id: u32) -> Result<bool> {
        let filter = format!("alID={}", anilist_id);
        tracing::debug!(url = %self.api_url, %filter, "Checking SeaDex");

        let resp = self
            .client
            .get(&self.api_url)
            .query(&[("filter", filter.as_str())])
            .header("Accept", "application/json")
            .send()?;

        let total = parse_total_items(&response_text(resp)?)?;
        tracing::debug!(anilist_id, total, "SeaDex records found");
        Ok(total > 0)
    }

    fn entry_url(&self, anilist_id: u32) -> String {
        format!("{}{}", self.base_url, anilist_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;

    #[test]
    fn parse_total_items_reads_count() {
        let body = r#"{"items": [{"alID": 20}], "page": 1, "perPage": 30, "totalItems": 1, "totalPages": 1}"#;
        assert_eq!(parse_total_items(body).unwrap(), 1);

        let body = r#"{"items": [], "page": 1, "perPage": 30, "totalItems": 0, "totalPages": 0}"#;
        assert_eq!(parse_total_items(body).unwrap(), 0);
    }

    #[test]
    fn parse_total_items_requires_field() {
        let body = r#"{"items": []}"#;
        assert!(matches!(
            parse_total_items(body),
            Err(LookupError::Json { .. })
        ));
    }

    #[test]
    fn entry_url_appends_id() {
        let seadex = SeadexClient::new(
            Client::new(),
            "https://releases.moe/api/collections/entries/records",
            "https://releases.moe/",
        );
        assert_eq!(seadex.entry_url(154587), "https://releases.moe/154587");
    }
}
