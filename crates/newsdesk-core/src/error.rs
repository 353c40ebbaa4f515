use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Fetch of {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Malformed article id: {0:?}")]
    MalformedId(String),

    #[error("No article id or URL provided")]
    MissingId,

    #[error("Feed source not found: {0}")]
    SourceNotFound(usize),

    #[error("Article not found: {0}")]
    EntryNotFound(String),

    #[error("Error fetching feed '{source_name}': {message}")]
    Upstream { source_name: String, message: String },
}

impl Error {
    /// HTTP-style status a consumer can surface for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MalformedId(_) | Error::MissingId => 400,
            Error::SourceNotFound(_) | Error::EntryNotFound(_) => 404,
            Error::Upstream { .. } | Error::Http(_) | Error::FeedParse(_) | Error::Timeout { .. } => 502,
            Error::Config(_) | Error::Io(_) | Error::UrlParse(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() == 400
    }
}

pub type Result<T> = std::result::Result<T, Error>;
