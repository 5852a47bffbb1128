use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmblemError {
    #[error("No status parser registered for provider '{0}'")]
    UnknownProvider(String),

    #[error("Status fetch failed: {0}")]
    FetchFailed(String),

    #[error("Provider returned an empty response body")]
    EmptyPayload,

    #[error("Malformed provider payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Provider returned no builds")]
    NoBuildsFound,

    #[error("Badge background could not be loaded: {0}")]
    BackgroundUnavailable(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EmblemError>;
