use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Handler discovery ──
    #[error("failed to scan {path}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse handler manifest at {path}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("handler '{handler}' references missing source file {path}")]
    MissingSource { handler: String, path: PathBuf },

    #[error("handler '{name}' declared more than once — handler names must be unique")]
    DuplicateHandler { name: String },
}
