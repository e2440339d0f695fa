use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "animeid";
const CONFIG_NAME: &str = "config";

const DEFAULT_ANILIST_URL: &str = "https://graphql.anilist.co";
const DEFAULT_SEADEX_API_URL: &str = "https://releases.moe/api/collections/entries/records";
const DEFAULT_SEADEX_BASE_URL: &str = "https://releases.moe/";
const DEFAULT_NYAA_URL: &str = "https://nyaa.land/user/subsplease";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// GraphQL endpoint used for search and status queries.
    pub anilist_url: String,
    /// SeaDex records collection, filtered by AniList id.
    pub seadex_api_url: String,
    /// Prefix of a SeaDex entry page, the AniList id is appended as is.
    pub seadex_base_url: String,
    /// nyaa mirror listing for SubsPlease releases.
    pub nyaa_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            anilist_url: DEFAULT_ANILIST_URL.into(),
            seadex_api_url: DEFAULT_SEADEX_API_URL.into(),
            seadex_base_url: DEFAULT_SEADEX_BASE_URL.into(),
            nyaa_url: DEFAULT_NYAA_URL.into(),
        }
    }
}

impl LookupConfig {
    /// Replace every empty field with its default.
    fn with_defaults(self) -> Self {
        let defaults = Self::default();
        let or_default = |value: String, default: String| {
            if value.trim().is_empty() {
                default
            } else {
                value
            }
        };

        Self {
            anilist_url: or_default(self.anilist_url, defaults.anilist_url),
            seadex_api_url: or_default(self.seadex_api_url, defaults.seadex_api_url),
            seadex_base_url: or_default(self.seadex_base_url, defaults.seadex_base_url),
            nyaa_url: or_default(self.nyaa_url, defaults.nyaa_url),
        }
    }
}

pub fn get_config() -> Result<LookupConfig> {
    let cfg: LookupConfig =
        confy::load(APP_NAME, CONFIG_NAME).context("Failed to load configuration")?;
    if let Ok(path) = confy::get_configuration_file_path(APP_NAME, CONFIG_NAME) {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }

    Ok(cfg.with_defaults())
}
