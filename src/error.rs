use std::path::PathBuf;

/// Errors raised while building a board from an external grid.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("board has no rows or no columns")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("piece at row {row}, column {col} floats above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// Errors that can occur while reading a move request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("failed to parse move request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
