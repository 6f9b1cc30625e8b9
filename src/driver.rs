mod arrivals;
mod sighandler;
pub(crate) mod error;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::select;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use log::{debug, info, warn};
use crate::config::read_var;

pub use arrivals::Arrivals;
pub use error::DriverError;

pub const MEAN_VAR: &str = "LOAD_DRIVER_MEAN";
pub const REPORT_VAR: &str = "LOAD_DRIVER_REPORT";
pub const LIMIT_VAR: &str = "LOAD_DRIVER_LIMIT";

pub const DEFAULT_MEAN_SECS: f64 = 2.0;
pub const DEFAULT_REPORT_PATH: &str = "lost_packets.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub program: String,
    pub args: Vec<String>,
    pub mean: f64,
    pub report_path: PathBuf,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    Interrupted,
    LimitReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub launched: u64,
    pub lost: u64,
    pub stop: Stop,
}

impl DriverConfig {
    pub fn from_env<I: IntoIterator<Item = String>>(args: I) -> Result<DriverConfig, DriverError> {
        let var = |name: &'static str| read_var(name).map_err(|e| DriverError::Env { name, source: e });
        Self::from_values(args, var(MEAN_VAR)?, var(REPORT_VAR)?, var(LIMIT_VAR)?)
    }

    pub fn from_values<I: IntoIterator<Item = String>>(
        args: I,
        mean: Option<String>,
        report_path: Option<String>,
        limit: Option<String>,
    ) -> Result<DriverConfig, DriverError> {
        let mut args = args.into_iter();
        let program = args.next().ok_or(DriverError::Usage)?;

        let mean = match mean {
            Some(m) => match m.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => v,
                _ => return Err(DriverError::Config { name: MEAN_VAR, value: m }),
            },
            None => DEFAULT_MEAN_SECS,
        };

        let limit = match limit {
            Some(l) => Some(l.trim().parse::<u64>().map_err(|_| DriverError::Config { name: LIMIT_VAR, value: l })?),
            None => None,
        };

        Ok(DriverConfig {
            program,
            args: args.collect(),
            mean,
            report_path: PathBuf::from(report_path.unwrap_or_else(|| String::from(DEFAULT_REPORT_PATH))),
            limit,
        })
    }
}

/// Runs the driver until SIGINT/SIGTERM or the configured limit, then
/// appends the lost launch count to the report file.
pub async fn start(cfg: DriverConfig) -> Result<Summary, DriverError> {
    let cancel = CancellationToken::new();
    let sighandler_cancel = cancel.clone();
    let exit = CancellationToken::new();
    let sighandler_exit = exit.clone();

    // registered before the first launch so an early SIGINT still gets a report
    let signals = sighandler::Signals::register()?;
    let handler = tokio::spawn(async move {
        sighandler::sighandler(signals, sighandler_cancel, sighandler_exit).await
    });

    let arrivals = Arrivals::new(cfg.mean, StdRng::from_entropy());
    let mut out = std::io::stdout();
    let summary = drive(&cfg, arrivals, &mut out, cancel).await;

    exit.cancel();
    match handler.await {
        Ok(res) => res?,
        Err(e) => warn!("signal handler task: {}", e),
    }

    let summary = summary?;
    write_report(&cfg.report_path, summary.lost)?;
    if summary.stop == Stop::Interrupted {
        writeln!(out, "Interrupted.")?;
    }

    Ok(summary)
}

pub async fn drive<R: Rng, W: Write>(
    cfg: &DriverConfig,
    mut arrivals: Arrivals<R>,
    out: &mut W,
    cancel: CancellationToken,
) -> Result<Summary, DriverError> {
    let mut launched: u64 = 0;
    let mut lost: u64 = 0;

    'drive: loop {
        if cfg.limit.is_some_and(|l| launched >= l) {
            return Ok(Summary { launched, lost, stop: Stop::LimitReached });
        }

        launched += 1;
        let delay = arrivals.next_delay();
        writeln!(out, "No {} ({:?})", launched, delay)?;
        out.flush()?;

        select! {
            () = sleep(arrivals::to_duration(delay)) => {},
            _ = cancel.cancelled() => {
                break 'drive;
            }
        }

        debug!("launching {} {:?}", cfg.program, cfg.args);
        let mut child = match Command::new(&cfg.program).args(&cfg.args).spawn() {
            Ok(c) => c,
            Err(e) => {
                warn!("spawning {}: {}", cfg.program, e);
                lost += 1;
                writeln!(out, "Lost packets: {}", lost)?;
                continue 'drive;
            }
        };

        select! {
            result = child.wait() => {
                match result {
                    Ok(status) => debug!("{} exited with {}", cfg.program, status),
                    Err(e) => {
                        warn!("waiting for {}: {}", cfg.program, e);
                        lost += 1;
                        writeln!(out, "Lost packets: {}", lost)?;
                    }
                }
            },
            _ = cancel.cancelled() => {
                if let Err(e) = child.kill().await {
                    warn!("killing {}: {}", cfg.program, e);
                }
                break 'drive;
            }
        }
    }

    info!("interrupted after {} launches, {} lost", launched, lost);
    Ok(Summary { launched, lost, stop: Stop::Interrupted })
}

pub fn write_report(path: &Path, lost: u64) -> Result<(), DriverError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)
        .map_err(|e| DriverError::Report { path: path.to_path_buf(), source: e })?;
    writeln!(file, "Packets lost: {}", lost)
        .map_err(|e| DriverError::Report { path: path.to_path_buf(), source: e })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::time::Duration;

    fn config(program: &str, limit: Option<u64>) -> DriverConfig {
        DriverConfig {
            program: String::from(program),
            args: Vec::new(),
            mean: 0.001,
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            limit,
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| String::from(*s)).collect()
    }

    #[test]
    fn config_defaults() {
        let cfg = DriverConfig::from_values(strings(&["./load", "1.5"]), None, None, None).unwrap();
        assert_eq!(cfg.program, "./load");
        assert_eq!(cfg.args, strings(&["1.5"]));
        assert_eq!(cfg.mean, DEFAULT_MEAN_SECS);
        assert_eq!(cfg.report_path, PathBuf::from("lost_packets.txt"));
        assert_eq!(cfg.limit, None);
    }

    #[test]
    fn config_overrides() {
        let cfg = DriverConfig::from_values(
            strings(&["true"]),
            Some(String::from("0.5")),
            Some(String::from("/tmp/lost.txt")),
            Some(String::from("3")),
        ).unwrap();
        assert_eq!(cfg.mean, 0.5);
        assert_eq!(cfg.report_path, PathBuf::from("/tmp/lost.txt"));
        assert_eq!(cfg.limit, Some(3));
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(matches!(DriverConfig::from_values(Vec::new(), None, None, None), Err(DriverError::Usage)));
        for mean in ["0", "-1", "inf", "NaN", "fast"] {
            let res = DriverConfig::from_values(strings(&["true"]), Some(String::from(mean)), None, None);
            assert!(matches!(res, Err(DriverError::Config { name: MEAN_VAR, .. })), "mean {}", mean);
        }
        let res = DriverConfig::from_values(strings(&["true"]), None, None, Some(String::from("-2")));
        assert!(matches!(res, Err(DriverError::Config { name: LIMIT_VAR, .. })));
    }

    #[tokio::test]
    async fn limit_stops_the_driver() {
        let cfg = config("true", Some(3));
        let mut out = Vec::new();
        let arrivals = Arrivals::new(cfg.mean, StdRng::seed_from_u64(1));
        let summary = drive(&cfg, arrivals, &mut out, CancellationToken::new()).await.unwrap();

        assert_eq!(summary, Summary { launched: 3, lost: 0, stop: Stop::LimitReached });
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("No 1 ("));
        assert!(lines[2].starts_with("No 3 ("));
    }

    #[tokio::test]
    async fn missing_program_counts_as_lost() {
        let cfg = config("/nonexistent/load-rs-missing-program", Some(2));
        let mut out = Vec::new();
        let arrivals = Arrivals::new(cfg.mean, StdRng::seed_from_u64(2));
        let summary = drive(&cfg, arrivals, &mut out, CancellationToken::new()).await.unwrap();

        assert_eq!(summary.lost, 2);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Lost packets: 1\n"));
        assert!(text.contains("Lost packets: 2\n"));
    }

    #[tokio::test]
    async fn cancellation_interrupts_a_running_child() {
        let mut cfg = config("sleep", None);
        cfg.args = strings(&["30"]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let mut out = Vec::new();
        let arrivals = Arrivals::new(cfg.mean, StdRng::seed_from_u64(3));
        let summary = tokio::time::timeout(Duration::from_secs(10), drive(&cfg, arrivals, &mut out, cancel))
            .await
            .expect("driver did not stop")
            .unwrap();

        assert_eq!(summary.stop, Stop::Interrupted);
        assert_eq!(summary.lost, 0);
    }

    #[test]
    fn report_is_appended() {
        let path = env::temp_dir().join(format!("load-rs-report-{}.txt", std::process::id()));
        let _ = fs::remove_file(&path);
        write_report(&path, 2).unwrap();
        write_report(&path, 5).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Packets lost: 2\nPackets lost: 5\n");
        fs::remove_file(&path).unwrap();
    }
}
