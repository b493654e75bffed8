use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("record is missing required field: {0}")]
    MissingField(&'static str),

    #[error("can't parse field {field} as a genomic position: {value}")]
    InvalidPosition {
        field: &'static str,
        value: String,
    },

    #[error("malformed bin key: {0}")]
    MalformedBinKey(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
