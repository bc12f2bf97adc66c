use thiserror::Error;

#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {code} {text}")]
    Status { code: u16, text: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SitemapError {
    /// Transport-level failures: the request never produced a usable body.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SitemapError::HttpError(_) | SitemapError::Status { .. } | SitemapError::InvalidUrl(_)
        )
    }
}

impl From<quick_xml::Error> for SitemapError {
    fn from(err: quick_xml::Error) -> Self {
        SitemapError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SitemapError>;
