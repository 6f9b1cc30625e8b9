use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::select;
use tokio_util::sync::CancellationToken;
use log::info;
use crate::driver::error::DriverError;

pub struct Signals {
    sigint: Signal,
    sigterm: Signal,
}

impl Signals {
    /// Replaces the default SIGINT/SIGTERM disposition from this point on.
    pub fn register() -> Result<Signals, DriverError> {
        let sigint = signal(SignalKind::interrupt()).map_err(|e| { DriverError::Signal { source: e } })?;
        let sigterm = signal(SignalKind::terminate()).map_err(|e| { DriverError::Signal { source: e } })?;
        Ok(Signals { sigint, sigterm })
    }
}

/// Cancels `cancel` on SIGINT or SIGTERM. Returns once `exit` is cancelled.
pub async fn sighandler(mut signals: Signals, cancel: CancellationToken, exit: CancellationToken) -> Result<(), DriverError> {
    'signal: loop {
        select! {
            _ = signals.sigint.recv() => {
                info!("got SIGINT");
                cancel.cancel();
            },
            _ = signals.sigterm.recv() => {
                info!("got SIGTERM");
                cancel.cancel();
            },
            _ = exit.cancelled() => {
                break 'signal;
            }
        }
    }

    Ok(())
}
