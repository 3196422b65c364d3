/// Errors that can occur while converting a table or maintaining a name map.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Missing map file: {0}")]
    MissingMap(String),

    #[error("Invalid map file: {0}")]
    InvalidMap(String),
}

impl ExtractError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn missing_map(msg: impl Into<String>) -> Self {
        Self::MissingMap(msg.into())
    }

    pub fn invalid_map(msg: impl Into<String>) -> Self {
        Self::InvalidMap(msg.into())
    }
}
