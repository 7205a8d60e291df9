#![forbid(unsafe_code)]

use rp_core::AssemblyError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("corrupt row: {0}")]
    CorruptRow(&'static str),
    #[error("roadmap assembly failed: {0}")]
    Assembly(#[from] AssemblyError),
    #[error("unknown node")]
    UnknownNode,
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQLITE",
            Self::Json(_) => "CORRUPT_ROW",
            Self::InvalidInput(message) if message.starts_with("RESET_REQUIRED") => {
                "RESET_REQUIRED"
            }
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::CorruptRow(_) => "CORRUPT_ROW",
            Self::Assembly(_) => "INVALID_ROADMAP",
            Self::UnknownNode => "UNKNOWN_NODE",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownNode)
    }
}
