use crate::anilist::MediaStatus;
use crate::seadex::CatalogCheck;

const QUALITY: &str = "1080p";

/// Where to look for a release, or why there is nowhere to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    Url(String),
    Unavailable(String),
}

/// Spaces become `+`; every other character is left untouched.
pub fn encode_title(title: &str) -> String {
    title.replace(' ', "+")
}

pub struct SourceDeriver<'a, C: CatalogCheck> {
    catalog: &'a C,
    nyaa_url: &'a str,
}

impl<'a, C: CatalogCheck> SourceDeriver<'a, C> {
    pub fn new(catalog: &'a C, nyaa_url: &'a str) -> Self {
        Self { catalog, nyaa_url }
    }

    fn search_url(&self, title_romaji: &str, batch: bool) -> String {
        let batch = if batch { "+batch" } else { "" };
        format!(
            "{}?f=0&c=1_2&q={}+{}{}&o=desc&p=1",
            self.nyaa_url,
            encode_title(title_romaji),
            QUALITY,
            batch
        )
    }

    pub fn derive_url(&self, id: u32, status: &MediaStatus, title_romaji: &str) -> Derivation {
        match status {
            MediaStatus::Finished => match self.catalog.has_entry(id) {
                Ok(true) => Derivation::Url(self.catalog.entry_url(id)),
                Ok(false) => {
                    tracing::debug!(id, "No SeaDex entry, using batch search");
                    Derivation::Url(self.search_url(title_romaji, true))
                }
                Err(e) => {
                    tracing::warn!(id, error = %e, "SeaDex check failed, using batch search");
                    Derivation::Url(self.search_url(title_romaji, true))
                }
            },
            MediaStatus::Releasing => Derivation::Url(self.search_url(title_romaji, false)),
            MediaStatus::NotYetReleased => Derivation::Unavailable(format!(
                "The show '{}' has not been released yet.",
                title_romaji
            )),
            other => Derivation::Unavailable(format!("Unknown anime status: {}", other)),
        }
    }
}
