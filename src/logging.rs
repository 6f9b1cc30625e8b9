//! Diagnostics go to stderr, or to the file named by `LOAD_LOG_PATH`.
//! Stdout belongs to the program's own output and is never logged to.

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use simplelog::{Config, LevelFilter, WriteLogger};
use thiserror::Error;
use crate::config::read_var;

pub const LEVEL_VAR: &str = "LOAD_LOG_LEVEL";
pub const PATH_VAR: &str = "LOAD_LOG_PATH";

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("reading {name}: {source}")]
    Env { name: &'static str, source: env::VarError },

    #[error("invalid log level {0:?}")]
    Level(String),

    #[error("opening log file {path:?}: {source}")]
    File { path: PathBuf, source: io::Error },

    #[error("installing logger: {0}")]
    Install(#[from] log::SetLoggerError),
}

#[derive(Debug, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub path: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env() -> Result<LogSettings, LogInitError> {
        let level = read_var(LEVEL_VAR).map_err(|e| LogInitError::Env { name: LEVEL_VAR, source: e })?;
        let path = read_var(PATH_VAR).map_err(|e| LogInitError::Env { name: PATH_VAR, source: e })?;
        Self::from_values(level, path)
    }

    pub fn from_values(level: Option<String>, path: Option<String>) -> Result<LogSettings, LogInitError> {
        let level = match level {
            Some(l) => l.trim().parse::<LevelFilter>().map_err(|_| LogInitError::Level(l))?,
            None => LevelFilter::Warn,
        };
        let path = path.filter(|p| !p.is_empty()).map(PathBuf::from);

        Ok(LogSettings { level, path })
    }
}

pub fn init() -> Result<(), LogInitError> {
    let settings = LogSettings::from_env()?;
    if settings.level == LevelFilter::Off {
        return Ok(());
    }

    match settings.path {
        Some(path) => {
            let file = OpenOptions::new().append(true).create(true).open(&path)
                .map_err(|e| LogInitError::File { path: path.clone(), source: e })?;
            WriteLogger::init(settings.level, Config::default(), file)?;
        },
        None => {
            WriteLogger::init(settings.level, Config::default(), io::stderr())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_warn_on_stderr() {
        let s = LogSettings::from_values(None, None).unwrap();
        assert_eq!(s, LogSettings { level: LevelFilter::Warn, path: None });
    }

    #[test]
    fn level_names_are_case_insensitive() {
        let s = LogSettings::from_values(Some(String::from("DEBUG")), None).unwrap();
        assert_eq!(s.level, LevelFilter::Debug);
        let s = LogSettings::from_values(Some(String::from(" off ")), None).unwrap();
        assert_eq!(s.level, LevelFilter::Off);
    }

    #[test]
    fn bad_level_is_rejected() {
        let err = LogSettings::from_values(Some(String::from("loud")), None).unwrap_err();
        assert!(matches!(err, LogInitError::Level(ref l) if l == "loud"));
    }

    #[test]
    fn empty_path_means_stderr() {
        let s = LogSettings::from_values(None, Some(String::new())).unwrap();
        assert_eq!(s.path, None);
        let s = LogSettings::from_values(None, Some(String::from("/tmp/load.log"))).unwrap();
        assert_eq!(s.path, Some(PathBuf::from("/tmp/load.log")));
    }
}
