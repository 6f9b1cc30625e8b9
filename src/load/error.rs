use std::io;
use thiserror::Error;

pub const USAGE: &str = "Invalid use of program.Try ./<name> <float>";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("expected exactly one argument, got {count}")]
    Usage { count: usize },

    #[error("writing report: {source}")]
    Output {
        #[from]
        source: io::Error,
    },
}
