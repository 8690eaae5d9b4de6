use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapabilitiesError {
    // XML level
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),

    #[error("capabilities document carries no version attribute")]
    MissingVersion,

    #[error("missing element <{0}>")]
    MissingElement(&'static str),

    #[error("invalid value in <{element}>: '{value}'")]
    InvalidValue {
        element: &'static str,
        value: String,
    },

    // Server answered, but with an exception instead of capabilities.
    #[error("WMS service exception: {0}")]
    ServiceException(String),

    // URL level
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Projection(#[from] projection::ProjectionError),
}
