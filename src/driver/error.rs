use std::env;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("usage: load-driver <program> [args...]")]
    Usage,

    #[error("reading {name}: {source}")]
    Env { name: &'static str, source: env::VarError },

    #[error("invalid {name}: {value:?}")]
    Config { name: &'static str, value: String },

    #[error("installing signal handler: {source}")]
    Signal { source: io::Error },

    #[error("writing lost packet report to {path:?}: {source}")]
    Report { path: PathBuf, source: io::Error },

    #[error("writing progress: {source}")]
    Output {
        #[from]
        source: io::Error,
    },
}
