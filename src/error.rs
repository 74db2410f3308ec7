// Error types for each pipeline stage.
//
// Every stage fails with its own enum so the top-level message says which
// step of the run broke. Nothing here is recovered; `main` prints the chain
// and exits non-zero.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path} is missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no usable chart font found (searched: {searched})")]
    FontNotFound { searched: String },
    #[error("invalid font file {0}")]
    InvalidFont(PathBuf),
    #[error("chart drawing failed: {0}")]
    Draw(String),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to embed image {path}: {message}")]
    Image { path: PathBuf, message: String },
    #[error("failed to assemble document: {0}")]
    Pack(String),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Write(#[from] WriteError),
}
