#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status_code}): {message}")]
    Api { status_code: u16, message: String },

    #[error("Failed to decode response at '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("No anime found with id {0}")]
    NotFound(u32),

    #[error("Anime {0} has no romaji title")]
    MissingTitle(u32),
}

pub type Result<T> = std::result::Result<T, LookupError>;

/// Read the body of a blocking response, failing on a non-success status.
pub(crate) fn response_text(response: reqwest::blocking::Response) -> Result<String> {
    let status = response.status();
    let body = response.text()?;
    if !status.is_success() {
        return Err(LookupError::Api {
            status_code: status.as_u16(),
            message: body,
        });
    }
    Ok(body)
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer).map_err(|e| LookupError::Json {
        path: e.path().to_string(),
        source: e.into_inner(),
    })
}
