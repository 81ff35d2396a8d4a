use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("catalog responded with status {0}")]
    Status(u16),

    #[error("malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid catalog url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<CatalogError> for mealdeck_shared::Error {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value.to_string())
    }
}
